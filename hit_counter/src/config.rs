use std::path::{Path, PathBuf};

use crate::input::InputFile;

pub const DEFAULT_MIN_IDENTITY: f64 = 95.0;

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input_files - hit files to be processed
/// output_dir - directory for the count files
/// min_identity - hits must have % identity strictly greater than this
/// has_header - whether the first line of each input file should be skipped
/// threads - number of worker threads
///
pub struct Config {
    input_files: Vec<InputFile>,
    output_dir: PathBuf,
    min_identity: f64,
    has_header: bool,
    threads: usize,
}

impl Config {
    pub fn new(input_files: Vec<InputFile>, output_dir: PathBuf) -> Self {
        Self {
            input_files,
            output_dir,
            min_identity: DEFAULT_MIN_IDENTITY,
            has_header: true,
            threads: 1,
        }
    }

    pub fn set_min_identity(&mut self, x: f64) -> anyhow::Result<()> {
        if (0.0..=100.0).contains(&x) {
            self.min_identity = x;
            Ok(())
        } else {
            Err(anyhow!("Invalid % identity threshold {} - must be between 0 and 100", x))
        }
    }

    pub fn set_no_header(&mut self) {
        self.has_header = false
    }

    pub fn set_threads(&mut self, x: usize) {
        self.threads = x.max(1)
    }

    pub fn input_files(&self) -> &[InputFile] {
        &self.input_files
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn min_identity(&self) -> f64 {
        self.min_identity
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}
