use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shape::{Offset, PieceKind};

/// Anchor position of a piece in grid coordinates.
///
/// `x` is the column, `y` the row with row 0 at the bottom. Both may lie outside
/// the grid while a piece is being tested for a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A tetromino with kind, anchor position, and current cell offsets.
///
/// Pieces are immutable values: moving and rotating return new `Piece`s.
/// Rotation is applied to the offsets around the anchor, so a piece carries no
/// separate rotation state. The square piece is a fixed point of rotation.
///
/// # Example
///
/// ```
/// use quadris_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T).at(4, 10);
/// let rotated = piece.rotate_clockwise();
///
/// assert_eq!(rotated.position(), piece.position());
/// assert_eq!(rotated.rotate_counterclockwise(), piece);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    position: Position,
    offsets: [Offset; 4],
}

impl Piece {
    /// Creates a piece of `kind` in its canonical orientation, anchored at `(0, 0)`.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            position: Position::new(0, 0),
            offsets: kind.offsets(),
        }
    }

    /// Draws a piece kind uniformly from the seven kinds.
    ///
    /// The randomness comes entirely from `rng`; the engine owns no global
    /// generator.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random())
    }

    /// Replaces kind and offsets with the canonical shape of `kind`.
    ///
    /// The anchor position is kept.
    #[must_use]
    pub const fn with_shape(self, kind: PieceKind) -> Self {
        Self {
            kind,
            position: self.position,
            offsets: kind.offsets(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn offsets(&self) -> [Offset; 4] {
        self.offsets
    }

    /// Returns the same piece anchored at `(x, y)`.
    #[must_use]
    pub const fn at(self, x: i32, y: i32) -> Self {
        Self {
            position: Position::new(x, y),
            ..self
        }
    }

    /// Returns the same piece translated by `(dx, dy)`.
    #[must_use]
    pub const fn moved_by(self, dx: i32, dy: i32) -> Self {
        self.at(self.position.x + dx, self.position.y + dy)
    }

    /// Absolute grid coordinates of the four cells (anchor + offset).
    #[must_use]
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.offsets
            .map(|(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    /// Rotates 90° clockwise about the anchor: `(dx, dy) -> (dy, -dx)`.
    #[must_use]
    pub fn rotate_clockwise(&self) -> Self {
        self.map_offsets(|(dx, dy)| (dy, -dx))
    }

    /// Rotates 90° counterclockwise about the anchor: `(dx, dy) -> (-dy, dx)`.
    #[must_use]
    pub fn rotate_counterclockwise(&self) -> Self {
        self.map_offsets(|(dx, dy)| (-dy, dx))
    }

    fn map_offsets(&self, f: impl FnMut(Offset) -> Offset) -> Self {
        if self.kind == PieceKind::O {
            return *self;
        }
        Self {
            offsets: self.offsets.map(f),
            ..*self
        }
    }

    /// Smallest `dx` among the offsets.
    #[must_use]
    pub fn min_x(&self) -> i32 {
        self.offsets.iter().map(|(dx, _)| *dx).min().unwrap_or(0)
    }

    /// Smallest `dy` among the offsets.
    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.offsets.iter().map(|(_, dy)| *dy).min().unwrap_or(0)
    }

    /// Largest `dy` among the offsets.
    #[must_use]
    pub fn max_y(&self) -> i32 {
        self.offsets.iter().map(|(_, dy)| *dy).max().unwrap_or(0)
    }
}
