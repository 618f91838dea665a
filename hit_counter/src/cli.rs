use std::{num::NonZeroUsize, path::PathBuf};

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use anyhow::Context;

use utils::{add_log_args, init_log};

use crate::{config::*, input::get_input_files};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    add_log_args(
        Command::new(crate_name!())
            .about(crate_description!())
            .version(crate_version!())
            .author(crate_authors!()),
    )
    .arg(
        Arg::new("threads")
            .short('t')
            .long("threads")
            .value_parser(value_parser!(NonZeroUsize))
            .value_name("INT")
            .help("Set number of worker threads [default: available cores]"),
    )
    .arg(
        Arg::new("min_identity")
            .short('i')
            .long("min-identity")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("95")
            .help("Only count hits with % identity greater than this value"),
    )
    .arg(
        Arg::new("suffix")
            .short('s')
            .long("suffix")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .default_value(".tsv")
            .help("Set suffix for input file names"),
    )
    .arg(
        Arg::new("no_header")
            .short('N')
            .long("no-header")
            .action(ArgAction::SetTrue)
            .help("Input files have no header line"),
    )
    .arg(
        Arg::new("input_dir")
            .short('D')
            .long("input-dir")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .default_value("./data/")
            .help("Set input directory"),
    )
    .arg(
        Arg::new("output_dir")
            .short('d')
            .long("output-dir")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .default_value("./output/")
            .help("Set output directory"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let nt = m
        .get_one::<NonZeroUsize>("threads")
        .map(|x| usize::from(*x))
        .unwrap_or_else(num_cpus::get);

    let input_dir = m
        .get_one::<PathBuf>("input_dir")
        .expect("Missing default input dir");

    let suffix = m
        .get_one::<String>("suffix")
        .expect("Missing default suffix");

    let files = get_input_files(input_dir, suffix).with_context(|| "Error collecting input files")?;

    let output_dir = m
        .get_one::<PathBuf>("output_dir")
        .expect("Missing default output dir")
        .to_owned();

    let mut cfg = Config::new(files, output_dir);

    cfg.set_min_identity(
        *m.get_one::<f64>("min_identity")
            .expect("Missing default identity threshold"),
    )?;

    if m.get_flag("no_header") {
        cfg.set_no_header()
    }

    cfg.set_threads(nt);

    Ok(cfg)
}
