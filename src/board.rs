use std::fmt;

use crate::types::{BOARD_WIDTH, Cell, Move, Player, ValidMoveSet};

const NUM_SQUARES: usize = BOARD_WIDTH * BOARD_WIDTH;
/// Scan offsets shared by move generation and flipping.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Othello board state represented by two bitboards, bit = `row * 8 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the opening position:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks. Squares set in both masks are treated as black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    pub fn from_cells(rows: &[[Cell; BOARD_WIDTH]; BOARD_WIDTH]) -> Self {
        let mut board = Self::empty();
        for (row, cells) in rows.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                board.set_cell(Move::from_index(row * BOARD_WIDTH + col), cell);
            }
        }
        board
    }

    pub fn cell(&self, mv: Move) -> Cell {
        let square = bit(mv.index());
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    pub fn set_cell(&mut self, mv: Move, cell: Cell) {
        let square = bit(mv.index());
        self.black &= !square;
        self.white &= !square;
        match cell {
            Cell::Black => self.black |= square,
            Cell::White => self.white |= square,
            Cell::Empty => {}
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, player: Player) -> u64 {
        let (me, opp) = self.sides(player);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves for `player`, ordered by `(row, col)`.
    pub fn valid_moves(&self, player: Player) -> ValidMoveSet {
        let mut bits = self.legal_moves(player);
        let mut moves = ValidMoveSet::new();

        while bits != 0 {
            moves.insert(Move::from_index(bits.trailing_zeros() as usize));
            bits &= bits - 1;
        }

        moves
    }

    /// Places one stone and flips captured stones.
    /// Returns flipped bit mask. Returns 0 and leaves the board untouched when the move is illegal.
    pub fn place(&mut self, mv: Move, player: Player) -> u64 {
        let pos = mv.index();
        let (me, opp) = self.sides(player);

        let flips = Self::collect_flips(pos, me, opp);
        if flips == 0 {
            return 0;
        }

        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;

        match player {
            Player::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Player::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        flips
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Copies the board out as an 8x8 grid.
    pub fn rows(&self) -> [[Cell; BOARD_WIDTH]; BOARD_WIDTH] {
        let mut rows = [[Cell::Empty; BOARD_WIDTH]; BOARD_WIDTH];
        for (pos, cell) in rows.iter_mut().flatten().enumerate() {
            *cell = self.cell(Move::from_index(pos));
        }
        rows
    }

    /// Converts board to row-major tokens where 0=empty, 1=black, 2=white.
    pub fn to_tokens(&self) -> [u8; NUM_SQUARES] {
        let mut tokens = [0u8; NUM_SQUARES];
        for (pos, token) in tokens.iter_mut().enumerate() {
            *token = self.cell(Move::from_index(pos)).token();
        }
        tokens
    }

    fn sides(&self, player: Player) -> (u64, u64) {
        match player {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let row = (pos / BOARD_WIDTH) as i32;
        let col = (pos % BOARD_WIDTH) as i32;
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;

            while in_bounds(r, c) {
                let square = bit((r as usize) * BOARD_WIDTH + c as usize);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    // An own stone closes the line; it only captures if something lies between.
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.rows().iter().enumerate() {
            let line: Vec<String> = cells.iter().map(|cell| cell.token().to_string()).collect();
            f.write_str(&line.join(" | "))?;
            if row + 1 < BOARD_WIDTH {
                f.write_str("\n-----------------------------\n")?;
            }
        }
        Ok(())
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_WIDTH as i32).contains(&row) && (0..BOARD_WIDTH as i32).contains(&col)
}
