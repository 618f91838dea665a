use std::{collections::HashSet, path::Path};

use utils::{
    error::{report, ReconcileError},
    table::{outer_join_all, KeyedTable},
};

use crate::{
    condition::ConditionPattern,
    config::Config,
    io::{output_effect_sizes, read_effect_sizes, WideEffectSizeTable},
};

/// Read the effect sizes from one result file as a table with columns ID and
/// <condition>.  Errors are reported and give None
pub fn process(p: &Path, pat: &ConditionPattern) -> Option<KeyedTable<f64>> {
    let res = pat
        .condition(p)
        .and_then(|c| read_effect_sizes(p, &c));
    match res {
        Ok(t) => Some(t),
        Err(e) => {
            report(&e.context(format!("Error processing file {}", p.display())));
            None
        }
    }
}

/// Process all input files in order, skipping those that fail and those whose
/// condition has already been seen
pub fn process_files(cfg: &Config) -> Vec<KeyedTable<f64>> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(cfg.input_files().len());
    for p in cfg.input_files() {
        if let Some(t) = process(p, cfg.condition()) {
            let cond = t.columns()[0].clone();
            if seen.contains(&cond) {
                report(
                    &anyhow::Error::new(ReconcileError::DuplicateColumn(cond))
                        .context(format!("Error processing file {}", p.display())),
                )
            } else {
                seen.insert(cond);
                tables.push(t)
            }
        }
    }
    tables
}

/// Fold tables with a full outer join (left to right) and add the locus
/// column.  Missing effect sizes are not filled.  Returns None if there are no tables
pub fn combine(
    tables: Vec<KeyedTable<f64>>,
    locus_len: usize,
) -> anyhow::Result<Option<WideEffectSizeTable>> {
    Ok(outer_join_all(tables)?.map(|t| WideEffectSizeTable::new(t, locus_len)))
}

/// Strategy
///
/// Get the effect size column from each DESeq2 result file, naming it after
/// the condition found in the file name.  Combine these into a single table
/// and write out if not empty
pub fn process_results(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");
    let tables = process_files(cfg);
    debug!(
        "Processed {} of {} result files",
        tables.len(),
        cfg.input_files().len()
    );

    let combined = match combine(tables, cfg.locus_len())? {
        Some(t) => t,
        None => {
            report(&anyhow::Error::new(ReconcileError::EmptyResult(
                "nothing to combine".to_owned(),
            )));
            return Ok(());
        }
    };

    if combined.is_empty() {
        report(&anyhow::Error::new(ReconcileError::EmptyResult(
            "combined table is empty, no output written".to_owned(),
        )));
    } else {
        info!(
            "Combined table has {} identifiers and {} conditions",
            combined.table().n_rows(),
            combined.table().columns().len()
        );
        output_effect_sizes(&combined, cfg.output_file())?;
        info!("Combined LFC data saved to {}", cfg.output_file().display());
    }
    Ok(())
}
