use thiserror::Error;

/// Errors raised while reading or reconciling per-sample tables
///
/// Apart from EmptyResult, which is informational, all of these are
/// confined to the file (or sample name) that raised them
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Format error: {0}")]
    Format(String),
    #[error("Pattern mismatch: {0}")]
    PatternMismatch(String),
    #[error("Empty result: {0}")]
    EmptyResult(String),
    #[error("Duplicate identifier {0}")]
    DuplicateKey(String),
    #[error("Duplicate column {0}")]
    DuplicateColumn(String),
    #[error("Key columns differ ({left} vs {right})")]
    KeyMismatch { left: String, right: String },
}

impl ReconcileError {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult(_))
    }
}

/// Report an error caught at a file boundary
///
/// Empty results are logged as warnings, everything else as errors.  The
/// full context chain is printed so the message names the file and the cause
pub fn report(e: &anyhow::Error) {
    let empty = e
        .chain()
        .filter_map(|c| c.downcast_ref::<ReconcileError>())
        .any(|r| r.is_empty_result());
    if empty {
        warn!("{:#}", e)
    } else {
        error!("{:#}", e)
    }
}
