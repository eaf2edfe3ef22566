use crate::{
    Command, FullRowError, GRID_HEIGHT, GRID_WIDTH,
    core::{grid::Grid, piece::Piece},
};

use super::{
    game_stats::GameStats,
    piece_source::{PieceSeed, PieceSource, RandomPieceSource},
    session_state::SessionState,
    snapshot::BoardSnapshot,
};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const SPAWN_X: i32 = (GRID_WIDTH / 2) as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const SPAWN_TOP_ROW: i32 = GRID_HEIGHT as i32 - 1;

/// The game engine: settled grid, active and next piece, counters, and session state.
///
/// Every operation runs to completion synchronously and never fails. Moves that
/// are blocked by a wall or a settled block are silently ignored, and piece
/// moves are ignored unless the session is [`SessionState::Playing`]. The only
/// terminal condition, a blocked spawn, is observable through [`Self::state`].
///
/// Gravity is the caller's business: call [`Self::move_down_one_step`] on each
/// tick of an external timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<S = RandomPieceSource> {
    grid: Grid,
    current_piece: Option<Piece>,
    next_piece: Option<Piece>,
    stats: GameStats,
    high_score: u64,
    state: SessionState,
    ghost_enabled: bool,
    source: S,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board drawing pieces from a randomly seeded [`RandomPieceSource`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomPieceSource::new())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(RandomPieceSource::with_seed(seed))
    }
}

impl<S> Board<S>
where
    S: PieceSource,
{
    /// Creates a board in the [`SessionState::NotStarted`] state.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self {
            grid: Grid::EMPTY,
            current_piece: None,
            next_piece: None,
            stats: GameStats::new(),
            high_score: 0,
            state: SessionState::NotStarted,
            ghost_enabled: true,
            source,
        }
    }

    /// Sets the high score carried over from earlier games.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// The settled cells.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The falling piece, or `None` before the first start and after game over.
    #[must_use]
    pub fn current_piece(&self) -> Option<Piece> {
        self.current_piece
    }

    /// The piece that spawns after the current one locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<Piece> {
        self.next_piece
    }

    /// Score, level and line counters of the current game.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Score of the current game.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> u64 {
        self.stats.level()
    }

    /// Rows cleared in the current game.
    #[must_use]
    pub fn lines_cleared(&self) -> u64 {
        self.stats.lines_cleared()
    }

    /// Best score seen, including games before this board was created.
    ///
    /// Raised only when a game ends.
    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Lifecycle state of the session.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once a game has been started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    /// Returns `true` while the session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Returns `true` after a blocked spawn ended the game.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Whether the presentation layer should draw the ghost piece.
    #[must_use]
    pub fn is_ghost_enabled(&self) -> bool {
        self.ghost_enabled
    }

    /// The source the board draws piece kinds from.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Starts a new game from any state.
    ///
    /// Clears the grid, resets score, level and lines, draws the next piece
    /// and spawns the first one. If that spawn is blocked the game is over at
    /// once.
    pub fn start(&mut self) {
        self.restart(Grid::EMPTY);
    }

    /// Like [`Self::start`], but the grid begins with the given settled cells.
    ///
    /// The seeded grid must not contain full rows, since those could never be
    /// produced by play and would break the clear-count bound.
    pub fn start_with_grid(&mut self, grid: Grid) -> Result<(), FullRowError> {
        if let Some(row) = grid.full_rows().next() {
            return Err(FullRowError { row });
        }
        self.restart(grid);
        Ok(())
    }

    fn restart(&mut self, grid: Grid) {
        self.grid = grid;
        self.stats = GameStats::new();
        self.state = SessionState::Playing;
        self.current_piece = None;
        self.next_piece = Some(self.draw_piece());
        self.spawn_next_piece();
    }

    /// Shifts the piece one column left; a blocked move is discarded.
    pub fn move_left(&mut self) {
        self.try_place(|piece| piece.moved_by(-1, 0));
    }

    /// Shifts the piece one column right; a blocked move is discarded.
    pub fn move_right(&mut self) {
        self.try_place(|piece| piece.moved_by(1, 0));
    }

    /// Rotates counterclockwise in place; a blocked rotation is discarded.
    pub fn rotate_left(&mut self) {
        self.try_place(Piece::rotate_counterclockwise);
    }

    /// Rotates clockwise in place; a blocked rotation is discarded.
    pub fn rotate_right(&mut self) {
        self.try_place(Piece::rotate_clockwise);
    }

    /// Moves the piece down one row, or locks it when it cannot move.
    ///
    /// Locking merges the piece into the grid, clears full rows, updates the
    /// counters and spawns the next piece. This is both the soft drop and the
    /// gravity tick.
    pub fn move_down_one_step(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        if !self.try_place(|piece| piece.moved_by(0, -1)) {
            self.lock_current_piece();
        }
    }

    /// Drops the piece to the row reported by [`Self::ghost_piece_row`] and locks it.
    pub fn hard_drop(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        let Some(piece) = self.current_piece else {
            return;
        };
        self.current_piece = Some(self.drop_position(piece));
        self.lock_current_piece();
    }

    /// Switches between playing and paused. Ignored before start and after game over.
    pub fn toggle_pause(&mut self) {
        self.state = self.state.toggled_pause();
    }

    /// Flips the display-only ghost flag.
    pub fn toggle_ghost_piece(&mut self) {
        self.ghost_enabled = !self.ghost_enabled;
    }

    /// Anchor row the current piece would land on if dropped straight down.
    ///
    /// Returns `None` when there is no falling piece.
    #[must_use]
    pub fn ghost_piece_row(&self) -> Option<i32> {
        self.current_piece
            .map(|piece| self.drop_position(piece).position().y)
    }

    /// Applies one input command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.move_down_one_step(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateLeft => self.rotate_left(),
            Command::RotateRight => self.rotate_right(),
            Command::TogglePause => self.toggle_pause(),
            Command::ToggleGhost => self.toggle_ghost_piece(),
            Command::Start => self.start(),
        }
    }

    /// Read-only copy of everything a presentation layer draws.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(
            &self.grid,
            self.current_piece,
            self.next_piece,
            self.ghost_piece_row().filter(|_| self.ghost_enabled),
            &self.stats,
            self.high_score,
            self.state,
            self.ghost_enabled,
        )
    }

    fn draw_piece(&mut self) -> Piece {
        Piece::new(self.source.next_kind())
    }

    fn drop_position(&self, piece: Piece) -> Piece {
        let mut dropped = piece;
        loop {
            let below = dropped.moved_by(0, -1);
            if self.grid.is_colliding(&below) {
                return dropped;
            }
            dropped = below;
        }
    }

    /// Replaces the current piece by `f(piece)` if the session is playing and
    /// the result fits. Returns whether the piece changed.
    fn try_place(&mut self, f: impl FnOnce(&Piece) -> Piece) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(piece) = self.current_piece else {
            return false;
        };
        let candidate = f(&piece);
        if self.grid.is_colliding(&candidate) {
            return false;
        }
        self.current_piece = Some(candidate);
        true
    }

    fn lock_current_piece(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };
        self.grid.lock_piece(&piece);
        let cleared = self.grid.clear_full_rows();
        self.stats.complete_piece_drop(cleared.len());
        self.spawn_next_piece();
    }

    fn spawn_next_piece(&mut self) {
        let next = match self.next_piece {
            Some(piece) => piece,
            None => self.draw_piece(),
        };
        let piece = next.at(SPAWN_X, SPAWN_TOP_ROW + next.min_y());
        self.next_piece = Some(self.draw_piece());

        if self.grid.is_colliding(&piece) {
            self.current_piece = None;
            self.state = SessionState::GameOver;
            if self.stats.score() > self.high_score {
                self.high_score = self.stats.score();
            }
            return;
        }
        self.current_piece = Some(piece);
    }
}
