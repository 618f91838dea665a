use std::path::{Path, PathBuf};

use crate::condition::ConditionPattern;

pub const DEFAULT_INPUT_PREFIX: &str = "DESeq2_results";
pub const DEFAULT_OUTPUT_FILE: &str = "combined_LFC_data.csv";
pub const DEFAULT_LOCUS_LEN: usize = 5;

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// input_files - DESeq2 result files, in output column order
/// condition - pattern used to get the condition from a file name
/// locus_len - number of characters of the identifier used for the locus
/// output_file - path of the combined table
///
pub struct Config {
    input_files: Vec<PathBuf>,
    condition: ConditionPattern,
    locus_len: usize,
    output_file: PathBuf,
}

impl Config {
    pub fn new(input_files: Vec<PathBuf>) -> Self {
        Self {
            input_files,
            condition: ConditionPattern::default(),
            locus_len: DEFAULT_LOCUS_LEN,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }

    pub fn set_condition_pattern(&mut self, c: ConditionPattern) {
        self.condition = c
    }

    pub fn set_locus_len(&mut self, x: usize) {
        self.locus_len = x
    }

    pub fn set_output_file<P: AsRef<Path>>(&mut self, p: P) {
        self.output_file = p.as_ref().to_owned()
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn condition(&self) -> &ConditionPattern {
        &self.condition
    }

    pub fn locus_len(&self) -> usize {
        self.locus_len
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
}

/// Collect the regular files in dir whose names start with prefix, sorted by path
pub fn get_input_files(dir: &Path, prefix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut v = Vec::new();
    if !dir.is_dir() {
        warn!("Input directory {} not found", dir.display());
        return Ok(v);
    }
    for f in dir.read_dir()? {
        let entry = f?;
        let path = entry.path();
        if path.is_file()
            && entry
                .file_name()
                .to_str()
                .map(|s| s.starts_with(prefix))
                .unwrap_or(false)
        {
            trace!("Adding input file {}", path.display());
            v.push(path)
        }
    }
    v.sort();
    debug!("{} input files found in {}", v.len(), dir.display());
    Ok(v)
}
