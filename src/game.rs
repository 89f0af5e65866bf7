use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::codec::{self, MAX_SAVED_TURNS};
use crate::config::GameConfig;
use crate::error::{FormatError, PersistError};
use crate::history::{History, Snapshot};
use crate::types::{Cell, GameState, Move, Player, Status, ValidMoveSet, Winner};

/// Othello rules engine: the live position plus its undo history.
///
/// Every accessor returns an owned copy; nothing hands out a reference into
/// live state. Commands report rejection with `false` and leave the
/// position as it was.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_player: Player,
    turn_count: u32,
    pass_occurred: bool,
    is_game_over: bool,
    winner: Winner,
    black_score: u8,
    white_score: u8,
    valid_moves: ValidMoveSet,
    history: History,
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let board = Board::new();
        let mut game = Self {
            board,
            current_player: Player::Black,
            turn_count: 0,
            pass_occurred: false,
            is_game_over: false,
            winner: Winner::InProgress,
            black_score: 0,
            white_score: 0,
            valid_moves: ValidMoveSet::new(),
            history: History::new(Snapshot::new(board, 0, Player::Black, false)),
            config,
        };
        game.reset();
        game
    }

    /// Attempts a move for the side to move.
    ///
    /// Out-of-bounds requests are refused before anything else. Otherwise a
    /// pending pass is resolved first, so the stone lands for whichever
    /// player is current after that resolution.
    pub fn play_turn(&mut self, row: i32, col: i32) -> bool {
        let Some(mv) = Move::new(row, col) else {
            debug!(row, col, "move rejected: out of bounds");
            return false;
        };

        self.check_pass();

        if self.is_game_over
            || self.board.cell(mv) != Cell::Empty
            || !self.valid_moves.contains(&mv)
        {
            debug!(%mv, player = %self.current_player, "move rejected");
            return false;
        }
        let Some(next_turn) = self.turn_count.checked_add(1) else {
            warn!(turn = self.turn_count, "move rejected: turn counter exhausted");
            return false;
        };

        let flips = self.board.place(mv, self.current_player);
        debug_assert_ne!(flips, 0, "valid move {mv} flipped nothing");

        self.turn_count = next_turn;
        self.refresh_scores();
        debug!(
            %mv,
            player = %self.current_player,
            flipped = flips.count_ones(),
            turn = self.turn_count,
            "move played"
        );
        self.current_player = self.current_player.opponent();
        self.valid_moves = self.board.valid_moves(self.current_player);
        self.history.push(self.snapshot());
        true
    }

    /// Resolves passes: clears the flag when the side to move has a move,
    /// hands the turn over when it has none, and ends the game on the
    /// second consecutive pass.
    pub fn check_pass(&mut self) {
        if self.is_game_over {
            return;
        }

        self.refresh_scores();
        self.valid_moves = self.board.valid_moves(self.current_player);
        if !self.valid_moves.is_empty() {
            self.pass_occurred = false;
            return;
        }

        if self.pass_occurred {
            self.is_game_over = true;
            self.winner = Winner::from_scores(self.black_score, self.white_score);
            info!(
                winner = %self.winner,
                black = self.black_score,
                white = self.white_score,
                "game over"
            );
            return;
        }

        debug!(player = %self.current_player, "no legal moves, passing");
        self.pass_occurred = true;
        self.current_player = self.current_player.opponent();
        self.valid_moves = self.board.valid_moves(self.current_player);
    }

    /// Restores the opening position. Black moves first.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::Black;
        self.turn_count = 0;
        self.pass_occurred = false;
        self.is_game_over = false;
        self.winner = Winner::InProgress;
        self.refresh_scores();
        self.history = History::new(self.snapshot());
        self.valid_moves = self.board.valid_moves(self.current_player);
        self.check_pass();
        info!("game reset");
    }

    /// Steps back one turn. Refused once the game is over or when only the
    /// initial snapshot remains.
    pub fn undo(&mut self) -> bool {
        // History::pop refuses to drop the initial snapshot.
        if self.is_game_over || self.history.pop().is_none() {
            return false;
        }

        self.restore_newest();
        self.check_pass();
        info!(turn = self.turn_count, "undo");
        true
    }

    /// Installs an arbitrary position as a new turn on top of the history.
    pub fn set_position(&mut self, board: Board, to_move: Player, pass_occurred: bool) {
        self.board = board;
        self.current_player = to_move;
        self.turn_count = self.turn_count.saturating_add(1);
        self.pass_occurred = pass_occurred;
        self.is_game_over = false;
        self.winner = Winner::InProgress;
        self.refresh_scores();
        self.history.push(self.snapshot());
        self.valid_moves = self.board.valid_moves(self.current_player);
    }

    /// Writes the most recent turns to the configured save path.
    pub fn save(&self) -> Result<(), PersistError> {
        self.save_to(&self.config.save_path)
    }

    /// Reads the configured save path. See [`Game::load_from`].
    pub fn load(&mut self) -> Result<(), PersistError> {
        let path = self.config.save_path.clone();
        self.load_from(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        let io_error = |source: std::io::Error| {
            warn!(path = %path.display(), error = %source, "save failed");
            PersistError::Io {
                path: path.to_path_buf(),
                source,
            }
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, self.save_document()).map_err(io_error)?;

        info!(
            path = %path.display(),
            turns = self.history.len().min(MAX_SAVED_TURNS),
            "game saved"
        );
        Ok(())
    }

    /// Replaces the game with the turns stored at `path`.
    ///
    /// An unreadable file leaves the game untouched. A malformed document
    /// resets the game before the error is returned.
    pub fn load_from(&mut self, path: &Path) -> Result<(), PersistError> {
        let text = fs::read_to_string(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "load failed");
            PersistError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.load_document(&text)?;
        info!(path = %path.display(), turns = self.history.len(), "game loaded");
        Ok(())
    }

    /// Encodes the most recent turns, newest first.
    pub fn save_document(&self) -> String {
        codec::encode(&self.history.recent(MAX_SAVED_TURNS))
    }

    /// Replaces history with the decoded turns and resumes from the newest.
    /// On any structural error the game is reset instead.
    pub fn load_document(&mut self, text: &str) -> Result<(), FormatError> {
        let history = codec::decode(text)
            .and_then(|snapshots| History::from_snapshots(snapshots).ok_or(FormatError::Empty));

        match history {
            Ok(history) => {
                self.history = history;
                self.restore_newest();
                self.check_pass();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "malformed saved game, resetting");
                self.reset();
                Err(err)
            }
        }
    }

    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        Move::new(row, col).map(|mv| self.board.cell(mv))
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn valid_moves(&self) -> ValidMoveSet {
        self.valid_moves.clone()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn current_player_is_black(&self) -> bool {
        self.current_player.is_black()
    }

    pub fn black_score(&self) -> u8 {
        self.black_score
    }

    pub fn white_score(&self) -> u8 {
        self.white_score
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn pass_occurred(&self) -> bool {
        self.pass_occurred
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn winner(&self) -> Winner {
        self.winner
    }

    /// Copies of every recorded snapshot, newest first.
    pub fn history_snapshots(&self) -> Vec<Snapshot> {
        self.history.snapshots()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        if self.is_game_over {
            Status::GameOver(self.winner)
        } else if self.pass_occurred {
            Status::Passed {
                passed: self.current_player.opponent(),
                to_move: self.current_player,
            }
        } else {
            Status::Turn(self.current_player)
        }
    }

    pub fn state(&self) -> GameState {
        GameState {
            board: self.board.to_tokens().to_vec(),
            current_player: self.current_player,
            turn_count: self.turn_count,
            pass_occurred: self.pass_occurred,
            is_game_over: self.is_game_over,
            winner: self.winner,
            black_count: self.black_score,
            white_count: self.white_score,
            valid_moves: self.valid_moves.iter().copied().collect(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.board,
            self.turn_count,
            self.current_player,
            self.pass_occurred,
        )
    }

    fn restore_newest(&mut self) {
        let newest = self.history.newest();
        self.board = newest.board();
        self.turn_count = newest.turn_count();
        self.current_player = newest.current_player();
        self.pass_occurred = newest.pass_occurred();
        self.is_game_over = false;
        self.winner = Winner::InProgress;
        self.refresh_scores();
        self.valid_moves = self.board.valid_moves(self.current_player);
    }

    fn refresh_scores(&mut self) {
        (self.black_score, self.white_score) = self.board.count();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BOARD: u64 = u64::MAX;

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * 8 + col)
    }

    fn mv(row: i32, col: i32) -> Move {
        Move::new(row, col).unwrap()
    }

    #[test]
    fn initial_state_is_correct() {
        let game = Game::default();
        let state = game.state();

        assert_eq!(state.current_player, Player::Black);
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert_eq!(state.turn_count, 0);
        assert!(!state.is_game_over);
        assert!(!state.pass_occurred);
        assert_eq!(state.winner, Winner::InProgress);
        assert_eq!(state.valid_moves, vec![mv(2, 3), mv(3, 2), mv(4, 5), mv(5, 4)]);
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.status(), Status::Turn(Player::Black));
    }

    #[test]
    fn t02_illegal_moves_return_false_and_keep_state() {
        let mut game = Game::default();
        let before = game.state();

        assert!(!game.play_turn(0, 0));
        assert!(!game.play_turn(4, 4));
        assert!(!game.play_turn(2, 2));
        assert!(!game.play_turn(-1, 3));
        assert!(!game.play_turn(3, 8));

        assert_eq!(game.state(), before);
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn white_replies_after_black_opening() {
        let mut game = Game::default();

        assert!(game.play_turn(2, 3));

        let moves: Vec<Move> = game.valid_moves().into_iter().collect();
        assert_eq!(moves, vec![mv(2, 2), mv(2, 4), mv(4, 2)]);
        assert_eq!(game.status(), Status::Turn(Player::White));
    }

    #[test]
    fn two_moves_alternate_players() {
        let mut game = Game::default();

        assert!(game.play_turn(3, 2));
        assert!(game.play_turn(2, 2));

        assert!(game.current_player_is_black());
        assert_eq!(game.cell(2, 2), Some(Cell::White));
        assert_eq!(game.cell(3, 2), Some(Cell::Black));
        assert_eq!(game.cell(3, 3), Some(Cell::White));
        assert_eq!(game.cell(3, 4), Some(Cell::Black));
        assert_eq!(game.turn_count(), 2);
        assert_eq!(game.history_len(), 3);
    }

    #[test]
    fn t03_pass_occurrence_switches_turn() {
        let mut game = Game::default();
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_position(Board::from_bitboards(black, white), Player::Black, false);

        assert!(game.valid_moves().is_empty());
        game.check_pass();

        assert_eq!(game.current_player(), Player::White);
        assert!(game.pass_occurred());
        assert!(!game.is_game_over());
        assert_eq!(game.valid_moves().into_iter().collect::<Vec<_>>(), vec![mv(0, 0)]);
        assert_eq!(
            game.status(),
            Status::Passed {
                passed: Player::Black,
                to_move: Player::White
            }
        );
    }

    #[test]
    fn play_turn_resolves_pending_pass_before_validating() {
        let mut game = Game::default();
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_position(Board::from_bitboards(black, white), Player::Black, false);

        // Black asked to move but has none, so the stone is White's.
        assert!(game.play_turn(0, 0));

        assert_eq!(game.cell(0, 0), Some(Cell::White));
        assert_eq!(game.cell(0, 1), Some(Cell::White));
        assert_eq!(game.current_player(), Player::Black);
    }

    #[test]
    fn out_of_bounds_move_leaves_pending_pass_unresolved() {
        let mut game = Game::default();
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_position(Board::from_bitboards(black, white), Player::Black, false);
        let before = game.state();

        assert!(!game.play_turn(-1, 0));
        assert!(!game.play_turn(0, 8));

        assert_eq!(game.state(), before);
        assert_eq!(game.current_player(), Player::Black);
        assert!(!game.pass_occurred());
    }

    #[test]
    fn move_at_maximum_turn_count_is_rejected() {
        let mut game = Game::default();
        let document = game
            .save_document()
            .replacen("0,true,false", "4294967295,true,false", 1);
        game.load_document(&document).unwrap();
        let before = game.state();
        let history = game.history_snapshots();

        assert!(!game.play_turn(2, 3));

        assert_eq!(game.state(), before);
        assert_eq!(game.history_snapshots(), history);
        assert_eq!(game.turn_count(), u32::MAX);
    }

    #[test]
    fn set_position_saturates_turn_count() {
        let mut game = Game::default();
        let document = game
            .save_document()
            .replacen("0,true,false", "4294967295,true,false", 1);
        game.load_document(&document).unwrap();

        game.set_position(Board::new(), Player::Black, false);

        assert_eq!(game.turn_count(), u32::MAX);
        assert_eq!(game.history_len(), 2);
    }

    #[test]
    fn t04_both_passes_end_game() {
        let mut game = Game::default();
        let black = FULL_BOARD ^ bit(0, 0);
        game.set_position(Board::from_bitboards(black, 0), Player::Black, false);

        game.check_pass();
        assert_eq!(game.current_player(), Player::White);
        assert!(!game.is_game_over());

        game.check_pass();
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Winner::Black);
        assert_eq!(game.status().to_string(), "Game Over: Black wins!");
    }

    #[test]
    fn t05_full_board_after_move_ends_game_on_following_checks() {
        let mut game = Game::default();
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_position(Board::from_bitboards(black, white), Player::White, false);

        assert!(game.play_turn(0, 0));
        game.check_pass();
        game.check_pass();

        let state = game.state();
        assert!(state.is_game_over);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(state.winner, Winner::White);
    }

    #[test]
    fn drawn_position_reports_draw() {
        let mut game = Game::default();
        let black = 0x0000_0000_FFFF_FFFF;
        let white = !black;
        game.set_position(Board::from_bitboards(black, white), Player::Black, true);

        game.check_pass();

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Winner::Draw);
        assert_eq!(game.status().to_string(), "Game Over: Draw!");
    }

    #[test]
    fn undo_restores_pre_move_values() {
        let mut game = Game::default();
        assert!(game.play_turn(3, 2));
        let before = game.state();
        let before_history = game.history_snapshots();

        assert!(game.play_turn(2, 2));
        assert!(game.undo());

        assert_eq!(game.state(), before);
        assert_eq!(game.history_snapshots(), before_history);
    }

    #[test]
    fn undo_is_refused_after_game_over() {
        let mut game = Game::default();
        let black = FULL_BOARD ^ bit(0, 0);
        game.set_position(Board::from_bitboards(black, 0), Player::White, true);
        game.check_pass();
        assert!(game.is_game_over());

        assert!(!game.undo());
        assert!(game.is_game_over());
    }

    #[test]
    fn undo_resolves_pass_in_restored_position() {
        let mut game = Game::default();
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_position(Board::from_bitboards(black, white), Player::Black, false);
        assert!(game.play_turn(0, 0));

        assert!(game.undo());

        // The restored snapshot has Black to move with no moves, so it passes again.
        assert_eq!(game.current_player(), Player::White);
        assert!(game.pass_occurred());
        assert_eq!(game.cell(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn load_document_replaces_history_and_normalizes() {
        let mut game = Game::default();
        assert!(game.play_turn(2, 3));
        assert!(game.play_turn(2, 2));
        let document = game.save_document();
        let expected = game.history_snapshots();

        game.reset();
        game.load_document(&document).unwrap();

        assert_eq!(game.history_snapshots(), expected);
        assert_eq!(game.turn_count(), 2);
        assert!(game.current_player_is_black());
        assert_eq!(game.black_score(), 3);
        assert_eq!(game.white_score(), 3);
    }

    #[test]
    fn malformed_document_resets_game() {
        let mut game = Game::default();
        assert!(game.play_turn(2, 3));

        let document = game.save_document().replacen("1,false,false", "1,false", 1);

        let err = game.load_document(&document).unwrap_err();

        assert_eq!(err, FormatError::HeaderFieldCount { line: 1, found: 2 });
        assert_eq!(game.board(), Board::new());
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.turn_count(), 0);
    }

    #[test]
    fn state_is_a_detached_copy() {
        let game = Game::default();
        let mut state = game.state();
        state.board[0] = 1;
        let mut moves = game.valid_moves();
        moves.clear();

        assert_eq!(game.cell(0, 0), Some(Cell::Empty));
        assert_eq!(game.valid_moves().len(), 4);
    }
}
