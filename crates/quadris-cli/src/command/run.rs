use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::Utc;
use quadris_engine::{
    Board, BoardSnapshot, Command, PieceSeed, PieceSource, RandomPieceSource, SequencePieceSource,
};
use rand::Rng as _;

use crate::store::{GameRecord, HighScoreStore, HistoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Command script, one command per line (reads stdin when omitted)
    script: Option<PathBuf>,
    /// Seed for the random piece generator (32 hex characters)
    #[clap(long, value_parser = parse_seed, conflicts_with = "pieces")]
    seed: Option<PieceSeed>,
    /// Fixed piece sequence to cycle through, e.g. `IOTSZLJ`
    #[clap(long, value_parser = parse_pieces)]
    pieces: Option<SequencePieceSource>,
    /// Player name stored with the game record
    #[clap(long, default_value = "Player1")]
    player: String,
    /// Format of the final board printed to stdout
    #[clap(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Record the game even if the script ends before game over
    #[clap(long)]
    record: bool,
}

fn parse_seed(s: &str) -> Result<PieceSeed, String> {
    PieceSeed::from_hex(s).ok_or_else(|| format!("invalid seed {s:?}: expected 32 hex characters"))
}

fn parse_pieces(s: &str) -> Result<SequencePieceSource, String> {
    SequencePieceSource::from_chars(s)
        .ok_or_else(|| format!("invalid piece sequence {s:?}: expected characters of ZSITOLJ"))
}

pub(crate) fn run(data_dir: &Path, arg: &RunArg) -> anyhow::Result<()> {
    let RunArg {
        script,
        seed,
        pieces,
        player,
        format,
        record,
    } = arg;

    if player.trim().is_empty() {
        bail!("Player name must not be empty");
    }

    let source: Box<dyn PieceSource> = if let Some(pieces) = pieces {
        Box::new(pieces.clone())
    } else {
        let source = RandomPieceSource::with_seed(seed.unwrap_or_else(|| rand::rng().random()));
        eprintln!("Piece seed: {}", source.seed().to_hex());
        Box::new(source)
    };

    let mut session = ScriptSession::open(data_dir, source, player)?;

    let script_name = script
        .as_ref()
        .map_or_else(|| "stdin".to_owned(), |path| path.display().to_string());
    let reader: Box<dyn BufRead> = match script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script file: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read script from {script_name}"))?;
        let Some(command) = parse_script_line(&line)
            .with_context(|| format!("Invalid command at {script_name}:{}", i + 1))?
        else {
            continue;
        };
        session.apply(command)?;
    }

    if *record {
        session.record_unfinished()?;
    }

    let snapshot = session.board.snapshot();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize board")?
        ),
        OutputFormat::Text => print!("{}", TextBoard(&snapshot)),
    }

    Ok(())
}

/// A board driven by script commands.
///
/// Each game is written to the history, and the high score updated, as soon
/// as it ends, so a later script error cannot lose it.
struct ScriptSession<'a> {
    board: Board<Box<dyn PieceSource>>,
    player: &'a str,
    high_score_store: HighScoreStore,
    history_store: HistoryStore,
}

impl<'a> ScriptSession<'a> {
    fn open(
        data_dir: &Path,
        source: Box<dyn PieceSource>,
        player: &'a str,
    ) -> anyhow::Result<Self> {
        let high_score_store = HighScoreStore::in_dir(data_dir);
        let history_store = HistoryStore::in_dir(data_dir);
        let mut board = Board::with_source(source).with_high_score(high_score_store.load()?);
        board.start();
        Ok(Self {
            board,
            player,
            high_score_store,
            history_store,
        })
    }

    fn apply(&mut self, command: Command) -> anyhow::Result<()> {
        let was_over = self.board.is_game_over();
        self.board.apply(command);
        if !was_over && self.board.is_game_over() {
            self.record_game()?;
        }
        Ok(())
    }

    /// Records the game in progress, if any.
    fn record_unfinished(&self) -> anyhow::Result<()> {
        if self.board.is_started() && !self.board.is_game_over() {
            self.record_game()?;
        }
        Ok(())
    }

    fn record_game(&self) -> anyhow::Result<()> {
        let record = GameRecord::from_board(self.player, &self.board, Utc::now());
        self.history_store.append(&record)?;
        eprintln!(
            "Recorded game: player={} score={} level={} lines={}",
            record.player, record.score, record.level, record.lines_cleared
        );

        let best = self.board.high_score().max(record.score);
        if self.high_score_store.update(best)? {
            eprintln!(
                "New high score {best} saved to {}",
                self.high_score_store.path().display()
            );
        }
        Ok(())
    }
}

/// Parses one script line. Blank lines and `#` comments yield `None`.
fn parse_script_line(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.split_once('#').map_or(line, |(code, _)| code).trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(line.parse()?))
}

/// Plain-text board: status lines, then the grid with the falling piece in
/// lowercase.
struct TextBoard<'a>(&'a BoardSnapshot);

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let mut rows: Vec<Vec<char>> = snapshot
            .grid
            .iter()
            .map(|row| row.chars().collect())
            .collect();
        let height = rows.len();
        if let Some(piece) = &snapshot.current_piece {
            let c = piece.kind.as_char().to_ascii_lowercase();
            for (x, y) in piece.cells {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if y >= height {
                    continue;
                }
                if let Some(cell) = rows[height - 1 - y].get_mut(x) {
                    *cell = c;
                }
            }
        }

        writeln!(f, "state: {}", snapshot.state)?;
        writeln!(
            f,
            "score: {}  high score: {}",
            snapshot.score, snapshot.high_score
        )?;
        write!(
            f,
            "level: {}  lines: {}  next: ",
            snapshot.level, snapshot.lines_cleared
        )?;
        match snapshot.next_piece {
            Some(kind) => writeln!(f, "{kind}")?,
            None => writeln!(f, "-")?,
        }

        let border = "-".repeat(rows.first().map_or(0, Vec::len));
        writeln!(f, "+{border}+")?;
        for row in rows {
            writeln!(f, "|{}|", row.into_iter().collect::<String>())?;
        }
        writeln!(f, "+{border}+")
    }
}
