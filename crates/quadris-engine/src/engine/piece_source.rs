use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the kinds of the pieces the board spawns.
///
/// The board never touches a global random generator; every draw goes through
/// its `PieceSource`, so tests and replays can provide a fixed sequence.
pub trait PieceSource {
    /// Returns the kind of the next piece.
    fn next_kind(&mut self) -> PieceKind;
}

impl<S: PieceSource + ?Sized> PieceSource for &mut S {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

impl<S: PieceSource + ?Sized> PieceSource for Box<S> {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed for the [`RandomPieceSource`] generator.
/// The same seed always produces the same piece sequence. It serializes as a
/// 32-character hex string.
///
/// # Example
///
/// ```
/// use quadris_engine::{PieceSource as _, PieceSeed, RandomPieceSource};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut source1 = RandomPieceSource::with_seed(seed);
/// let mut source2 = RandomPieceSource::with_seed(seed);
/// assert_eq!(source1.next_kind(), source2.next_kind());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Parses a seed from its 32-character hex form.
    #[must_use]
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() != 32 || !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let num = u128::from_str_radix(hex_str, 16).ok()?;
        Some(Self(num.to_be_bytes()))
    }

    /// Returns the 32-character lowercase hex form of the seed.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap_or_else(|_| unreachable!());
        hex_str
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid hex: expected 32 hex characters, got '{hex_str}'"
            ))
        })
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Uniform random piece source.
///
/// Each draw picks one of the seven kinds with equal probability from a
/// [`Pcg32`] generator seeded by a [`PieceSeed`]. Draws are independent; there
/// is no bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomPieceSource {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for RandomPieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPieceSource {
    /// Creates a source seeded from the thread-local generator of `rand`.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl PieceSource for RandomPieceSource {
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Piece source that cycles through a fixed list of kinds.
///
/// # Example
///
/// ```
/// use quadris_engine::{PieceKind, PieceSource as _, SequencePieceSource};
///
/// let mut source = SequencePieceSource::new([PieceKind::I, PieceKind::O]);
/// assert_eq!(source.next_kind(), PieceKind::I);
/// assert_eq!(source.next_kind(), PieceKind::O);
/// assert_eq!(source.next_kind(), PieceKind::I);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePieceSource {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl SequencePieceSource {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, next: 0 }
    }

    /// Parses a sequence from piece characters such as `"IOTSZLJ"`.
    ///
    /// Returns `None` for an empty string or an unknown character.
    #[must_use]
    pub fn from_chars(s: &str) -> Option<Self> {
        let kinds = s
            .chars()
            .map(PieceKind::from_char)
            .collect::<Option<Vec<_>>>()?;
        if kinds.is_empty() {
            return None;
        }
        Some(Self::new(kinds))
    }
}

impl PieceSource for SequencePieceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_from_bytes(bytes: [u8; 16]) -> PieceSeed {
        PieceSeed(bytes)
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = seed_from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);

        let mut source1 = RandomPieceSource::with_seed(seed);
        let mut source2 = RandomPieceSource::with_seed(seed);
        assert_eq!(source1.seed(), seed);
        for _ in 0..50 {
            assert_eq!(source1.next_kind(), source2.next_kind());
        }
    }

    #[test]
    fn test_random_source_draws_every_kind() {
        let mut source = RandomPieceSource::with_seed(seed_from_bytes([3; 16]));
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[source.next_kind() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_seed_known_value_sequential_bytes() {
        let seed = seed_from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_from_hex_rejects_bad_input() {
        assert!(PieceSeed::from_hex("").is_none());
        assert!(PieceSeed::from_hex("0123456789abcdef0123456789abcde").is_none());
        assert!(PieceSeed::from_hex("ghijklmnopqrstuvwxyzghijklmnopqr").is_none());
        assert!(PieceSeed::from_hex("0123456789ABCDEFFEDCBA9876543210").is_some());
        // Sign prefixes are not hex digits even though integer parsing allows them.
        assert!(PieceSeed::from_hex("+123456789abcdef0123456789abcdef").is_none());
        assert!(PieceSeed::from_hex("-123456789abcdef0123456789abcdef").is_none());

        let result: Result<PieceSeed, _> = serde_json::from_str("\"abc\"");
        assert!(result.unwrap_err().to_string().contains("invalid hex"));
    }

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequencePieceSource::from_chars("ZSI").unwrap();
        let drawn: Vec<_> = (0..5).map(|_| source.next_kind()).collect();
        assert_eq!(
            drawn,
            [
                PieceKind::Z,
                PieceKind::S,
                PieceKind::I,
                PieceKind::Z,
                PieceKind::S
            ]
        );
    }

    #[test]
    fn test_sequence_source_from_chars_rejects_bad_input() {
        assert!(SequencePieceSource::from_chars("").is_none());
        assert!(SequencePieceSource::from_chars("IX").is_none());
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_sequence_source_empty_panics() {
        let _ = SequencePieceSource::new([]);
    }
}
