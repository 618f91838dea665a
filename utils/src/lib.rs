#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::{
    fmt,
    io::{BufRead, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use compress_io::compress::CompressIo;

pub mod error;
pub mod table;

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy)]
pub struct LogLevel {
    pub level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel { level: 0 }),
            "warn" => Ok(LogLevel { level: 1 }),
            "info" => Ok(LogLevel { level: 2 }),
            "debug" => Ok(LogLevel { level: 3 }),
            "trace" => Ok(LogLevel { level: 4 }),
            "none" => Ok(LogLevel { level: 5 }),
            _ => Err("no match"),
        }
    }
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        self.level > 4
    }
    pub fn get_level(&self) -> usize {
        if self.level > 4 {
            0
        } else {
            self.level
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level_str = ["error", "warn", "info", "debug", "trace", "none"];
        if self.level < 6 {
            write!(f, "{}", level_str[self.level])
        } else {
            write!(f, "unknown")
        }
    }
}

/// Add the logging options shared by all of the tools to a command
pub fn add_log_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("timestamp")
            .short('X')
            .long("timestamp")
            .value_parser(value_parser!(stderrlog::Timestamp))
            .value_name("GRANULARITY")
            .default_value("none")
            .help("Prepend log entries with a timestamp"),
    )
    .arg(
        Arg::new("loglevel")
            .short('l')
            .long("loglevel")
            .value_name("LOGLEVEL")
            .value_parser(value_parser!(LogLevel))
            .ignore_case(true)
            .default_value("info")
            .help("Set log level"),
    )
    .arg(
        Arg::new("quiet")
            .action(ArgAction::SetTrue)
            .long("quiet")
            .conflicts_with("loglevel")
            .help("Silence all output"),
    )
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) {
    let verbose = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .unwrap_or_else(|| LogLevel::from_str("info").expect("Could not set loglevel info"));
    let quiet = verbose.is_none() || m.get_flag("quiet");
    let ts = m
        .get_one::<stderrlog::Timestamp>("timestamp")
        .copied()
        .unwrap_or(stderrlog::Timestamp::Off);

    stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()
        .unwrap();
}

/// Read in next line and split on tabs after trimming white space
pub fn get_next_line<'a, R: BufRead>(
    rdr: &mut R,
    buf: &'a mut String,
) -> anyhow::Result<Option<Vec<&'a str>>> {
    buf.clear();
    if rdr.read_line(buf)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buf.trim().split('\t').collect()))
    }
}

/// Open a (possibly compressed) CSV file for reading
///
/// Records are not required to have equal lengths so that the caller can
/// check the column count itself and report it with the line number
pub fn open_csv_reader<P: AsRef<Path>>(
    p: P,
    has_header: bool,
) -> anyhow::Result<csv::Reader<impl Read>> {
    let p = p.as_ref();
    trace!("Opening CSV file {} for reading", p.display());
    let rdr = CompressIo::new()
        .path(p)
        .bufreader()
        .with_context(|| format!("Could not open {} for input", p.display()))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(rdr))
}

const COMPRESS_SUFFIXES: [&str; 5] = ["gz", "bz2", "xz", "zst", "lz4"];

/// File name with any compression suffix removed
pub fn uncompressed_name(p: &Path) -> anyhow::Result<&str> {
    let name = p
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Illegal file name {}", p.display()))?;
    Ok(match name.rsplit_once('.') {
        Some((s, ext)) if COMPRESS_SUFFIXES.contains(&ext) => s,
        _ => name,
    })
}

/// File name without compression suffix and without the final extension
/// i.e., both 12A1_counts.csv and 12A1_counts.csv.gz give 12A1_counts
pub fn file_stem(p: &Path) -> anyhow::Result<&str> {
    let name = uncompressed_name(p)?;
    Ok(match name.rsplit_once('.') {
        Some((s, _)) if !s.is_empty() => s,
        _ => name,
    })
}

/// Make sure output directory exists
pub fn setup_output_dir(d: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(d) = d {
        if !d.exists() {
            debug!("Creating output directory {}", d.display());
            std::fs::create_dir_all(d)
                .with_context(|| format!("Error creating output directory {}", d.display()))?;
        }
        Ok(d.to_owned())
    } else {
        Ok(PathBuf::new())
    }
}
