use std::sync::{Arc, Mutex, PoisonError};

use crate::config::GameConfig;
use crate::game::Game;

/// Cloneable handle for callers on several threads.
///
/// Each command runs entirely under one lock, so no caller can observe a
/// board halfway through a flip.
#[derive(Debug, Clone, Default)]
pub struct SharedGame {
    inner: Arc<Mutex<Game>>,
}

impl SharedGame {
    pub fn new(config: GameConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Game::new(config))),
        }
    }

    /// Runs `f` with exclusive access to the game.
    pub fn with<R>(&self, f: impl FnOnce(&mut Game) -> R) -> R {
        // A poisoned lock still guards a consistent game.
        let mut game = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *game)
    }

    pub fn play_turn(&self, row: i32, col: i32) -> bool {
        self.with(|game| game.play_turn(row, col))
    }

    pub fn undo(&self) -> bool {
        self.with(Game::undo)
    }

    pub fn reset(&self) {
        self.with(Game::reset)
    }
}
