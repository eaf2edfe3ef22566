mod command;
mod store;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
