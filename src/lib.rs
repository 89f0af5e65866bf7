pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod shared;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::GameConfig;
pub use error::{FormatError, PersistError};
pub use game::Game;
pub use history::{History, Snapshot};
pub use shared::SharedGame;
pub use types::{Cell, GameState, Move, Player, Status, ValidMoveSet, Winner};
