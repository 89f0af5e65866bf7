//! Line-oriented text format for the most recent turns.
//!
//! Each turn is a 9-line block, newest first:
//!
//! ```text
//! <turn count>,<is black turn>,<pass occurred>
//! <r0c0>,<r0c1>,...,<r0c7>
//! ...
//! <r7c0>,<r7c1>,...,<r7c7>
//! ```
//!
//! Board tokens are 0=empty, 1=black, 2=white.

use crate::board::Board;
use crate::error::FormatError;
use crate::history::Snapshot;
use crate::types::{BOARD_WIDTH, Cell, Move, Player};

/// Upper bound on the number of turns written to or read from a document.
pub const MAX_SAVED_TURNS: usize = 4;
const BLOCK_LINES: usize = BOARD_WIDTH + 1;
const HEADER_FIELDS: usize = 3;

/// Serializes snapshots, newest first, keeping at most [`MAX_SAVED_TURNS`].
pub fn encode(snapshots: &[Snapshot]) -> String {
    let mut out = String::new();
    for snapshot in snapshots.iter().take(MAX_SAVED_TURNS) {
        out.push_str(&format!(
            "{},{},{}\n",
            snapshot.turn_count(),
            snapshot.current_player().is_black(),
            snapshot.pass_occurred()
        ));

        let board = snapshot.board();
        for row in board.rows() {
            let tokens: Vec<String> = row.iter().map(|cell| cell.token().to_string()).collect();
            out.push_str(&tokens.join(","));
            out.push('\n');
        }
    }
    out
}

/// Parses a whole document. Any structural violation rejects the document outright.
pub fn decode(text: &str) -> Result<Vec<Snapshot>, FormatError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Err(FormatError::Empty);
    }

    let blocks = lines.len().div_ceil(BLOCK_LINES);
    if blocks > MAX_SAVED_TURNS {
        return Err(FormatError::TooManyTurns {
            found: blocks,
            max: MAX_SAVED_TURNS,
        });
    }

    lines
        .chunks(BLOCK_LINES)
        .enumerate()
        .map(|(block, chunk)| decode_block(chunk, block * BLOCK_LINES + 1))
        .collect()
}

fn decode_block(lines: &[&str], first_line: usize) -> Result<Snapshot, FormatError> {
    if lines.len() != BLOCK_LINES {
        return Err(FormatError::TruncatedBlock {
            line: first_line,
            found: lines.len(),
        });
    }

    let header: Vec<&str> = lines[0].split(',').collect();
    if header.len() != HEADER_FIELDS {
        return Err(FormatError::HeaderFieldCount {
            line: first_line,
            found: header.len(),
        });
    }

    let turn_count = header[0]
        .parse::<u32>()
        .map_err(|_| FormatError::InvalidTurnCount {
            line: first_line,
            token: header[0].to_string(),
        })?;
    let is_black = parse_bool(header[1], first_line)?;
    let pass_occurred = parse_bool(header[2], first_line)?;

    let mut board = Board::empty();
    for (row, line) in lines[1..].iter().enumerate() {
        let line_no = first_line + 1 + row;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != BOARD_WIDTH {
            return Err(FormatError::RowFieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        for (col, field) in fields.iter().enumerate() {
            let cell = parse_cell(field, line_no)?;
            board.set_cell(Move::from_index(row * BOARD_WIDTH + col), cell);
        }
    }

    Ok(Snapshot::new(
        board,
        turn_count,
        Player::from_is_black(is_black),
        pass_occurred,
    ))
}

fn parse_bool(token: &str, line: usize) -> Result<bool, FormatError> {
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(FormatError::InvalidBool {
            line,
            token: token.to_string(),
        }),
    }
}

fn parse_cell(token: &str, line: usize) -> Result<Cell, FormatError> {
    let value = token
        .parse::<i64>()
        .map_err(|_| FormatError::InvalidCellToken {
            line,
            token: token.to_string(),
        })?;

    u8::try_from(value)
        .ok()
        .and_then(Cell::from_token)
        .ok_or(FormatError::CellOutOfRange { line, value })
}
