use anyhow::Context;

use lfc_combiner::{cli, process};

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    process::process_results(&cfg)
}
