use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u64,
}

/// The single best score, stored as `{ "high_score": n }`.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub const FILE_NAME: &'static str = "highscore.json";

    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored high score. A missing file means no game was recorded yet.
    pub fn load(&self) -> anyhow::Result<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        let file: HighScoreFile = util::read_json_file("high score", &self.path)?;
        Ok(file.high_score)
    }

    pub fn save(&self, high_score: u64) -> anyhow::Result<()> {
        util::write_json_file("high score", &self.path, &HighScoreFile { high_score })
    }

    /// Stores `score` if it beats the stored value. Returns whether it did.
    pub fn update(&self, score: u64) -> anyhow::Result<bool> {
        if score <= self.load()? {
            return Ok(false);
        }
        self.save(score)?;
        Ok(true)
    }
}
