use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAVE_PATH: &str = "files/saved_othello.csv";

/// Settings owned by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// File used by `Game::save` and `Game::load`.
    pub save_path: PathBuf,
}

impl GameConfig {
    pub fn with_save_path(path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: path.into(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
}
