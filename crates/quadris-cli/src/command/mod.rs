use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{history::HistoryArg, run::RunArg};

mod high_score;
mod history;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding the high score and the game history
    #[clap(long, global = true, default_value = "./data")]
    data_dir: PathBuf,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game by feeding commands from a script or stdin
    Run(#[clap(flatten)] RunArg),
    /// Show recorded games
    History(#[clap(flatten)] HistoryArg),
    /// Show the stored high score
    HighScore,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match &args.mode {
        Mode::Run(arg) => run::run(&args.data_dir, arg)?,
        Mode::History(arg) => history::run(&args.data_dir, arg)?,
        Mode::HighScore => high_score::run(&args.data_dir)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_data_dir_is_global() {
        let args =
            CommandArgs::try_parse_from(["quadris", "high-score", "--data-dir", "/tmp/q"]).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/tmp/q"));
        assert!(matches!(args.mode, Mode::HighScore));
    }
}
