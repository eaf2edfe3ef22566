use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Relative `(dx, dy)` offset of one piece cell from the piece anchor.
///
/// `dy` grows upward, matching the grid where row 0 is the bottom row.
pub type Offset = (i32, i32);

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[repr(u8)]
pub enum PieceKind {
    /// Z-piece.
    #[display("Z")]
    Z = 0,
    /// S-piece.
    #[display("S")]
    S = 1,
    /// Line (I) piece.
    #[display("I")]
    I = 2,
    /// T-piece.
    #[display("T")]
    T = 3,
    /// Square (O) piece.
    #[display("O")]
    O = 4,
    /// L-piece.
    #[display("L")]
    L = 5,
    /// Mirrored L (J) piece.
    #[display("J")]
    J = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        let index = rng.random_range(0..PieceKind::LEN);
        PieceKind::from_index(index)
            .unwrap_or_else(|| unreachable!("piece index {index} out of range"))
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in table order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::Z,
        PieceKind::S,
        PieceKind::I,
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Returns the kind stored at `index` in [`Self::ALL`].
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Returns the four canonical offsets of this kind in its unrotated orientation.
    ///
    /// This table is the only place piece geometry is defined.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::O.offsets(), [(0, 0), (1, 0), (0, 1), (1, 1)]);
    /// ```
    #[must_use]
    pub const fn offsets(self) -> [Offset; 4] {
        SHAPE_TABLE[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::J.as_char(), 'J');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('T'), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'I' => Some(PieceKind::I),
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            _ => None,
        }
    }
}

const SHAPE_TABLE: [[Offset; 4]; PieceKind::LEN] = [
    // Z-piece
    [(0, -1), (0, 0), (-1, 0), (-1, 1)],
    // S-piece
    [(0, -1), (0, 0), (1, 0), (1, 1)],
    // I-piece
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    // T-piece
    [(-1, 0), (0, 0), (1, 0), (0, 1)],
    // O-piece
    [(0, 0), (1, 0), (0, 1), (1, 1)],
    // L-piece
    [(-1, -1), (0, -1), (0, 0), (0, 1)],
    // J-piece
    [(1, -1), (0, -1), (0, 0), (0, 1)],
];
