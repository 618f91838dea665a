use anyhow::Context;

use hit_counter::{cli, process};

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    process::process_files(&cfg)
}
