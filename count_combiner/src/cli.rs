use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use utils::{add_log_args, init_log};

use crate::config::*;

/// Set up definition of command options for clap
fn cli_model() -> Command {
    add_log_args(
        Command::new(crate_name!())
            .about(crate_description!())
            .version(crate_version!())
            .author(crate_authors!()),
    )
    .arg(
        Arg::new("sample_prefix")
            .short('p')
            .long("sample-prefix")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .default_value(DEFAULT_SAMPLE_PREFIX)
            .help("Set prefix for sample names"),
    )
    .arg(
        Arg::new("no_header")
            .short('N')
            .long("no-header")
            .action(ArgAction::SetTrue)
            .help("Input files have no header line"),
    )
    .arg(
        Arg::new("output_dir")
            .short('d')
            .long("output-dir")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Set output directory [default: current directory]"),
    )
    .arg(
        Arg::new("counts_file")
            .short('o')
            .long("output")
            .value_parser(value_parser!(String))
            .value_name("NAME")
            .default_value(DEFAULT_COUNTS_FILE)
            .help("Set name of combined count file"),
    )
    .arg(
        Arg::new("metadata_file")
            .short('m')
            .long("metadata")
            .value_parser(value_parser!(String))
            .value_name("NAME")
            .default_value(DEFAULT_METADATA_FILE)
            .help("Set name of sample metadata file"),
    )
    .arg(
        Arg::new("files")
            .value_parser(value_parser!(PathBuf))
            .value_name("COUNT_FILE")
            .num_args(1..)
            .required(true)
            .help(
                "Input count files (one per sample).  The first line of each file is \
                 taken as a header; use --no-header for files written by hit_counter",
            ),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let files: Vec<PathBuf> = m
        .get_many::<PathBuf>("files")
        .expect("Missing input files")
        .cloned()
        .collect();

    info!("Files provided:");
    for f in files.iter() {
        info!("\t{}", f.display())
    }

    let mut cfg = Config::new(files);

    cfg.set_sample_prefix(
        m.get_one::<String>("sample_prefix")
            .expect("Missing default sample prefix"),
    );

    if m.get_flag("no_header") {
        cfg.set_no_header()
    }

    if let Some(p) = m.get_one::<PathBuf>("output_dir") {
        cfg.set_output_dir(p)
    }

    cfg.set_counts_file(
        m.get_one::<String>("counts_file")
            .expect("Missing default output name"),
    );
    cfg.set_metadata_file(
        m.get_one::<String>("metadata_file")
            .expect("Missing default metadata name"),
    );

    Ok(cfg)
}
