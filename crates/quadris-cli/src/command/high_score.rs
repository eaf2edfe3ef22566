use std::path::Path;

use crate::store::HighScoreStore;

pub(crate) fn run(data_dir: &Path) -> anyhow::Result<()> {
    let store = HighScoreStore::in_dir(data_dir);
    println!("{}", store.load()?);
    Ok(())
}
