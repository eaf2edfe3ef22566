use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead as _, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use quadris_engine::{Board, PieceSource};
use serde::{Deserialize, Serialize};

use crate::util;

/// Result of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player: String,
    pub score: u64,
    pub level: u64,
    pub lines_cleared: u64,
    /// When the game ended (ISO 8601)
    pub played_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn from_board<S>(player: &str, board: &Board<S>, played_at: DateTime<Utc>) -> Self
    where
        S: PieceSource,
    {
        Self {
            player: player.to_owned(),
            score: board.score(),
            level: board.level(),
            lines_cleared: board.lines_cleared(),
            played_at,
        }
    }
}

/// Append-only game history, one JSON record per line.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub const FILE_NAME: &'static str = "history.jsonl";

    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in the order they were appended.
    pub fn load_all(&self) -> anyhow::Result<Vec<GameRecord>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;

        let mut records = vec![];
        for (i, line) in io::BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse history record at {}:{}",
                    self.path.display(),
                    i + 1
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn append(&self, record: &GameRecord) -> anyhow::Result<()> {
        util::create_parent_dir(&self.path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, record)
            .with_context(|| format!("Failed to write JSON to {}", self.path.display()))?;
        writeln!(writer)
            .with_context(|| format!("Failed to write newline to {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", self.path.display()))?;
        Ok(())
    }
}
