use std::collections::VecDeque;
use std::fmt;

use crate::board::Board;
use crate::types::Player;

/// Immutable record of a position after a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board: Board,
    turn_count: u32,
    current_player: Player,
    pass_occurred: bool,
}

impl Snapshot {
    pub fn new(board: Board, turn_count: u32, current_player: Player, pass_occurred: bool) -> Self {
        Self {
            board,
            turn_count,
            current_player,
            pass_occurred,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn pass_occurred(&self) -> bool {
        self.pass_occurred
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {}:", self.turn_count)?;
        writeln!(f, "{}", self.board)?;
        write!(f, " Whose Turn: {}", self.current_player)
    }
}

/// Newest-first list of snapshots. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<Snapshot>,
}

impl History {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: VecDeque::from([initial]),
        }
    }

    /// Builds a history from newest-first snapshots. Returns `None` for an empty list.
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Option<Self> {
        if snapshots.is_empty() {
            return None;
        }
        Some(Self {
            entries: snapshots.into(),
        })
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_front(snapshot);
    }

    /// Drops the newest snapshot. Refuses to remove the last remaining one.
    pub fn pop(&mut self) -> Option<Snapshot> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_front()
    }

    pub fn newest(&self) -> &Snapshot {
        &self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copies of the `limit` most recent snapshots, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Snapshot> {
        self.entries.iter().take(limit).cloned().collect()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.entries.iter().cloned().collect()
    }
}
