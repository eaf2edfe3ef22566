//! Persistent data kept between games.
//!
//! Both stores live in the data directory:
//!
//! - `highscore.json` - the best score seen so far ([`HighScoreStore`])
//! - `history.jsonl` - one [`GameRecord`] per finished game ([`HistoryStore`])

pub use self::{high_score::*, history::*};

mod high_score;
mod history;

#[cfg(test)]
pub(crate) fn test_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("quadris-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
