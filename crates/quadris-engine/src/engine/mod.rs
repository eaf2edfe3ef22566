//! Game engine logic and state management.
//!
//! This module builds the game rules on top of the core data structures:
//!
//! - [`Board`] - Grid, falling and next piece, counters and session state
//! - [`SessionState`] - The `NotStarted`/`Playing`/`Paused`/`GameOver` lifecycle
//! - [`GameStats`] - Score, level and cleared lines
//! - [`PieceSource`] - Where spawned piece kinds come from
//! - [`Command`] - Input commands, one per board operation
//! - [`BoardSnapshot`] - Read-only view for a presentation layer
//!
//! # Game Flow
//!
//! 1. Create a [`Board`] and call [`Board::start`]
//! 2. Feed player commands and gravity ticks, one board call per event
//! 3. A piece that cannot fall further locks, full rows clear, the next piece spawns
//! 4. When a new piece cannot spawn, the session is over
//!
//! # Example
//!
//! ```
//! use quadris_engine::{Board, Command, PieceKind, SequencePieceSource};
//!
//! let mut board = Board::with_source(SequencePieceSource::new([PieceKind::T]));
//! board.start();
//!
//! board.apply(Command::MoveLeft);
//! board.apply(Command::RotateRight);
//! let landing_row = board.ghost_piece_row();
//! board.apply(Command::HardDrop);
//!
//! assert!(landing_row.is_some());
//! assert_eq!(board.grid().occupied_count(), 4);
//! assert!(board.state().is_playing());
//! ```

pub use self::{
    board::*, command::*, game_stats::*, gravity::*, piece_source::*, session_state::*,
    snapshot::*,
};

mod board;
mod command;
mod game_stats;
mod gravity;
mod piece_source;
mod session_state;
mod snapshot;
