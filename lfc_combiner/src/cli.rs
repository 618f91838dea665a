use std::{num::NonZeroUsize, path::PathBuf};

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use anyhow::Context;

use utils::{add_log_args, init_log};

use crate::{condition::*, config::*};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    add_log_args(
        Command::new(crate_name!())
            .about(crate_description!())
            .version(crate_version!())
            .author(crate_authors!()),
    )
    .arg(
        Arg::new("input_prefix")
            .short('P')
            .long("input-prefix")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .default_value(DEFAULT_INPUT_PREFIX)
            .help("Set prefix for input file names"),
    )
    .arg(
        Arg::new("input_dir")
            .short('D')
            .long("input-dir")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .default_value("./")
            .help("Set input directory"),
    )
    .arg(
        Arg::new("condition")
            .short('r')
            .long("condition-regex")
            .value_parser(value_parser!(String))
            .value_name("REGEX")
            .default_value(DEFAULT_CONDITION_PATTERN)
            .help("Set pattern used to get the condition from input file names"),
    )
    .arg(
        Arg::new("locus_len")
            .short('L')
            .long("locus-length")
            .value_parser(value_parser!(NonZeroUsize))
            .value_name("INT")
            .default_value("5")
            .help("Set number of identifier characters used for the locus"),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output-file")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .default_value(DEFAULT_OUTPUT_FILE)
            .help("Set output file"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let input_dir = m
        .get_one::<PathBuf>("input_dir")
        .expect("Missing default input dir");

    let input_prefix = m
        .get_one::<String>("input_prefix")
        .expect("Missing default input prefix");

    let files = get_input_files(input_dir, input_prefix)
        .with_context(|| format!("Error checking input directory {}", input_dir.display()))?;

    let pattern = m
        .get_one::<String>("condition")
        .expect("Missing default condition pattern");

    let mut cfg = Config::new(files);

    cfg.set_condition_pattern(
        ConditionPattern::new(pattern)
            .with_context(|| format!("Invalid condition pattern {}", pattern))?,
    );

    cfg.set_locus_len(
        m.get_one::<NonZeroUsize>("locus_len")
            .map(|x| usize::from(*x))
            .expect("Missing default locus length"),
    );

    cfg.set_output_file(
        m.get_one::<PathBuf>("output")
            .expect("Missing default output file"),
    );

    Ok(cfg)
}
