use std::path::Path;

use regex::Regex;
use utils::{error::ReconcileError, file_stem};

/// Default pattern for experimental conditions: two digits and an upper case letter (i.e., 12A)
pub const DEFAULT_CONDITION_PATTERN: &str = r"\d{2}[A-Z]";

/// Extracts the experimental condition from result file names
#[derive(Debug, Clone)]
pub struct ConditionPattern {
    reg: Regex,
}

impl Default for ConditionPattern {
    fn default() -> Self {
        Self::new(DEFAULT_CONDITION_PATTERN).expect("Invalid default condition pattern")
    }
}

impl ConditionPattern {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let reg = Regex::new(pattern)?;
        Ok(Self { reg })
    }

    /// First match of the pattern in s
    pub fn find<'a>(&self, s: &'a str) -> Option<&'a str> {
        self.reg.find(s).map(|m| m.as_str())
    }

    /// Condition for a result file, taken from the file stem
    pub fn condition(&self, p: &Path) -> anyhow::Result<String> {
        let stem = file_stem(p)?;
        match self.find(stem) {
            Some(c) => Ok(c.to_owned()),
            None => Err(ReconcileError::PatternMismatch(format!(
                "condition not found in file name {}",
                stem
            ))
            .into()),
        }
    }
}
