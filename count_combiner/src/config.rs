use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_PREFIX: &str = "Syn7002";
pub const DEFAULT_COUNTS_FILE: &str = "All_conditions.csv";
pub const DEFAULT_METADATA_FILE: &str = "metadata.csv";

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input_files - count files, one per sample, in output column order
/// sample_prefix - sample names are <sample_prefix>_<file stem>
/// has_header - whether the first line of each count file is a header
/// output_dir - output directory (default: current directory)
/// counts_file, metadata_file - names of the output files
///
pub struct Config {
    input_files: Vec<PathBuf>,
    sample_prefix: String,
    has_header: bool,
    output_dir: Option<PathBuf>,
    counts_file: String,
    metadata_file: String,
}

impl Config {
    pub fn new(input_files: Vec<PathBuf>) -> Self {
        Self {
            input_files,
            sample_prefix: DEFAULT_SAMPLE_PREFIX.to_owned(),
            has_header: true,
            output_dir: None,
            counts_file: DEFAULT_COUNTS_FILE.to_owned(),
            metadata_file: DEFAULT_METADATA_FILE.to_owned(),
        }
    }

    pub fn set_sample_prefix(&mut self, s: &str) {
        self.sample_prefix = s.to_owned()
    }

    pub fn set_no_header(&mut self) {
        self.has_header = false
    }

    pub fn set_output_dir<P: AsRef<Path>>(&mut self, dir: P) {
        self.output_dir = Some(dir.as_ref().to_owned())
    }

    pub fn set_counts_file(&mut self, s: &str) {
        self.counts_file = s.to_owned()
    }

    pub fn set_metadata_file(&mut self, s: &str) {
        self.metadata_file = s.to_owned()
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn sample_prefix(&self) -> &str {
        &self.sample_prefix
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn counts_file(&self) -> &str {
        &self.counts_file
    }

    pub fn metadata_file(&self) -> &str {
        &self.metadata_file
    }
}
