use std::path::Path;

use crate::store::{GameRecord, HistoryStore};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct HistoryArg {
    /// Show only the N best games, highest score first
    #[clap(long)]
    top: Option<usize>,
}

pub(crate) fn run(data_dir: &Path, arg: &HistoryArg) -> anyhow::Result<()> {
    let HistoryArg { top } = arg;

    let store = HistoryStore::in_dir(data_dir);
    let records = store.load_all()?;
    if records.is_empty() {
        eprintln!("No games recorded in {}", store.path().display());
        return Ok(());
    }

    for record in select_records(records, *top) {
        println!(
            "{}  {:<16} score={:>8} level={:>3} lines={:>4}",
            record.played_at.format("%Y-%m-%d %H:%M:%S"),
            record.player,
            record.score,
            record.level,
            record.lines_cleared
        );
    }
    Ok(())
}

/// Keeps all records in play order, or the `top` best ones by score.
///
/// Ties keep their play order.
fn select_records(mut records: Vec<GameRecord>, top: Option<usize>) -> Vec<GameRecord> {
    if let Some(top) = top {
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(top);
    }
    records
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn records(scores: &[u64]) -> Vec<GameRecord> {
        scores
            .iter()
            .zip(1..)
            .map(|(score, minute)| GameRecord {
                player: format!("p{minute}"),
                score: *score,
                level: 1,
                lines_cleared: 0,
                played_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_all_records_in_play_order() {
        let selected = select_records(records(&[40, 300, 100]), None);
        let scores: Vec<_> = selected.iter().map(|r| r.score).collect();
        assert_eq!(scores, [40, 300, 100]);
    }

    #[test]
    fn test_top_records_by_score() {
        let selected = select_records(records(&[40, 300, 100, 300]), Some(3));
        let players: Vec<_> = selected.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(players, ["p2", "p4", "p3"]);
    }
}
