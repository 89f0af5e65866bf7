use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

pub const BOARD_WIDTH: usize = 8;

/// Contents of one square. The discriminants are the persisted tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cell {
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Cell {
    pub fn token(self) -> u8 {
        self as u8
    }

    pub fn from_token(token: u8) -> Option<Self> {
        match token {
            0 => Some(Self::Empty),
            1 => Some(Self::Black),
            2 => Some(Self::White),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn from_is_black(is_black: bool) -> Self {
        if is_black { Self::Black } else { Self::White }
    }

    pub fn is_black(self) -> bool {
        self == Self::Black
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// The cell value this player's stones occupy.
    pub fn cell(self) -> Cell {
        match self {
            Self::Black => Cell::Black,
            Self::White => Cell::White,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("Black"),
            Self::White => f.write_str("White"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Winner {
    Black,
    White,
    Draw,
    InProgress,
}

impl Winner {
    /// Decides the result from final stone counts.
    pub fn from_scores(black: u8, white: u8) -> Self {
        if black > white {
            Self::Black
        } else if white > black {
            Self::White
        } else {
            Self::Draw
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("Black"),
            Self::White => f.write_str("White"),
            Self::Draw => f.write_str("Draw"),
            Self::InProgress => f.write_str("In Progress"),
        }
    }
}

/// A board coordinate. Ordered by row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Move {
    pub row: u8,
    pub col: u8,
}

impl Move {
    /// Returns `None` when either coordinate falls outside the board.
    pub fn new(row: i32, col: i32) -> Option<Self> {
        let range = 0..BOARD_WIDTH as i32;
        if range.contains(&row) && range.contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub(crate) fn index(self) -> usize {
        self.row as usize * BOARD_WIDTH + self.col as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            row: (index / BOARD_WIDTH) as u8,
            col: (index % BOARD_WIDTH) as u8,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Legal moves for one side, in ascending `(row, col)` order.
pub type ValidMoveSet = BTreeSet<Move>;

/// Public game state handed to the UI.
/// Every field is a copy; mutating it never touches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Row-major cell tokens (0=empty, 1=black, 2=white).
    pub board: Vec<u8>,
    pub current_player: Player,
    pub turn_count: u32,
    pub pass_occurred: bool,
    pub is_game_over: bool,
    pub winner: Winner,
    pub black_count: u8,
    pub white_count: u8,
    pub valid_moves: Vec<Move>,
}

/// What the status line should say about the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Turn(Player),
    Passed { passed: Player, to_move: Player },
    GameOver(Winner),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turn(player) => write!(f, "{player}'s Turn"),
            Self::Passed { passed, to_move } => {
                write!(f, "{passed}'s turn passed. {to_move}'s Turn")
            }
            Self::GameOver(Winner::Draw) => f.write_str("Game Over: Draw!"),
            Self::GameOver(winner) => write!(f, "Game Over: {winner} wins!"),
        }
    }
}
