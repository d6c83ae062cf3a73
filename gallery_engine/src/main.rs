mod cli;
mod runtime;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let command = cli::parse()?;
    runtime::execute(command)
}
