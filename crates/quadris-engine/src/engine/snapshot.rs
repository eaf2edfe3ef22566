use serde::{Deserialize, Serialize};

use crate::{GameStats, Grid, Piece, PieceKind};

use super::session_state::SessionState;

/// The falling piece as drawn: kind and absolute grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub cells: [(i32, i32); 4],
}

impl From<Piece> for PieceSnapshot {
    fn from(piece: Piece) -> Self {
        Self {
            kind: piece.kind(),
            cells: piece.cells(),
        }
    }
}

/// Read-only copy of a board for the presentation layer.
///
/// `grid` holds one string per row, top row first, in the text form of
/// [`Grid`]. `ghost_row` is the landing anchor row of the falling piece; it
/// is `None` when no piece is falling or the ghost display is off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardSnapshot {
    pub state: SessionState,
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
    pub ghost_enabled: bool,
    pub score: u64,
    pub high_score: u64,
    pub level: u64,
    pub lines_cleared: u64,
    pub grid: Vec<String>,
    pub current_piece: Option<PieceSnapshot>,
    pub next_piece: Option<PieceKind>,
    pub ghost_row: Option<i32>,
}

impl BoardSnapshot {
    #[expect(clippy::too_many_arguments)]
    pub(crate) fn new(
        grid: &Grid,
        current_piece: Option<Piece>,
        next_piece: Option<Piece>,
        ghost_row: Option<i32>,
        stats: &GameStats,
        high_score: u64,
        state: SessionState,
        ghost_enabled: bool,
    ) -> Self {
        let grid = grid
            .rows()
            .rev()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect();
        Self {
            state,
            started: state.is_started(),
            paused: state.is_paused(),
            game_over: state.is_game_over(),
            ghost_enabled,
            score: stats.score(),
            high_score,
            level: stats.level(),
            lines_cleared: stats.lines_cleared(),
            grid,
            current_piece: current_piece.map(PieceSnapshot::from),
            next_piece: next_piece.map(|piece| piece.kind()),
            ghost_row,
        }
    }
}
