use serde::{Deserialize, Serialize};

use crate::MAX_CLEARED_ROWS;

/// Base points for line clears, indexed by the number of rows cleared at once.
///
/// The awarded score is the base value multiplied by the current level.
pub const SCORE_TABLE: [u64; MAX_CLEARED_ROWS + 1] = [0, 40, 100, 300, 1200];

/// Number of cleared lines needed for each level increment.
pub const LEVEL_UP_LINES: u64 = 10;

/// Score, level and line counters of one game.
///
/// # Scoring
///
/// - Clearing `n` rows with one piece earns `SCORE_TABLE[n] * level`
/// - The level used is the one in effect before this lock's level check
/// - The level rises by at most one per lock, once the total cleared lines
///   reach `10 * level`
///
/// # Example
///
/// ```
/// use quadris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.lines_cleared(), 4);
/// assert_eq!(stats.line_clear_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u64,
    level: u64,
    lines_cleared: u64,
    completed_pieces: u64,
    line_clear_counter: [u64; MAX_CLEARED_ROWS + 1],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates the statistics of a fresh game: score 0, level 1, no lines.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_cleared: 0,
            completed_pieces: 0,
            line_clear_counter: [0; MAX_CLEARED_ROWS + 1],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u64 {
        self.level
    }

    /// Total number of rows cleared in this game.
    #[must_use]
    pub const fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    /// Number of pieces locked into the grid.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Histogram of locks by rows cleared: index `n` counts locks that cleared `n` rows.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u64; MAX_CLEARED_ROWS + 1] {
        &self.line_clear_counter
    }

    /// Updates the statistics after a piece locked and cleared `cleared_lines` rows.
    ///
    /// # Panics
    ///
    /// Panics if `cleared_lines` exceeds 4. A four-cell piece cannot complete
    /// more rows, so a larger count means the grid logic is broken.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        assert!(
            cleared_lines <= MAX_CLEARED_ROWS,
            "{cleared_lines} rows cleared by a single piece"
        );
        self.completed_pieces += 1;
        self.line_clear_counter[cleared_lines] += 1;
        if cleared_lines == 0 {
            return;
        }

        self.score += SCORE_TABLE[cleared_lines] * self.level;
        self.lines_cleared += cleared_lines as u64;
        // One level per lock even if a count ever jumped over two thresholds.
        if self.lines_cleared / LEVEL_UP_LINES >= self.level {
            self.level += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.lines_cleared(), 0);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_score_table_per_line_count() {
        for (lines, expected) in [(0, 0), (1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut stats = GameStats::new();
            stats.complete_piece_drop(lines);
            assert_eq!(stats.score(), expected, "{lines} lines");
            assert_eq!(stats.completed_pieces(), 1);
        }
    }

    #[test]
    fn test_score_multiplied_by_level() {
        let mut stats = GameStats::new();
        for _ in 0..3 {
            stats.complete_piece_drop(3);
        }
        assert_eq!(stats.lines_cleared(), 9);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 900);

        // 9 -> 10 lines: scored at level 1, then level becomes 2.
        stats.complete_piece_drop(1);
        assert_eq!(stats.score(), 940);
        assert_eq!(stats.level(), 2);

        stats.complete_piece_drop(2);
        assert_eq!(stats.score(), 940 + 200);
    }

    #[test]
    fn test_level_up_at_most_once_per_lock() {
        let mut stats = GameStats::new();
        stats.lines_cleared = 19;
        stats.complete_piece_drop(4);
        assert_eq!(stats.lines_cleared(), 23);
        assert_eq!(stats.level(), 2);

        stats.complete_piece_drop(1);
        assert_eq!(stats.level(), 3);
    }

    #[test]
    fn test_empty_lock_does_not_level() {
        let mut stats = GameStats::new();
        stats.lines_cleared = 10;
        stats.complete_piece_drop(0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.line_clear_counter()[0], 1);
    }

    #[test]
    #[should_panic(expected = "5 rows cleared")]
    fn test_more_than_four_lines_panics() {
        GameStats::new().complete_piece_drop(5);
    }
}
