use std::path::PathBuf;

/// Structural problems found while decoding a saved game.
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("saved game is empty")]
    Empty,

    #[error("saved game holds {found} turns, at most {max} are allowed")]
    TooManyTurns { found: usize, max: usize },

    #[error("turn block starting at line {line} has {found} of 9 lines")]
    TruncatedBlock { line: usize, found: usize },

    #[error("line {line}: header has {found} fields, expected 3")]
    HeaderFieldCount { line: usize, found: usize },

    #[error("line {line}: turn count {token:?} is not a non-negative integer")]
    InvalidTurnCount { line: usize, token: String },

    #[error("line {line}: {token:?} is not true or false")]
    InvalidBool { line: usize, token: String },

    #[error("line {line}: board row has {found} fields, expected 8")]
    RowFieldCount { line: usize, found: usize },

    #[error("line {line}: board token {token:?} is not an integer")]
    InvalidCellToken { line: usize, token: String },

    #[error("line {line}: board token {value} is outside 0..=2")]
    CellOutOfRange { line: usize, value: i64 },
}

/// Failures of save/load.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The file could not be read or written. Game state is untouched.
    #[error("i/o failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was structurally invalid. The game has been reset.
    #[error("malformed saved game, board reset: {0}")]
    Malformed(#[from] FormatError),
}
