use std::{collections::HashSet, path::Path};

use utils::{
    error::{report, ReconcileError},
    file_stem, setup_output_dir,
    table::{outer_join_all, KeyedTable},
};

use crate::{
    config::Config,
    io::{output_counts, output_metadata, read_count_file},
    metadata::{derive_metadata, SampleMetadata},
};

/// Count matrix: one row per identifier, one column per sample
pub type WideCountTable = KeyedTable<u64>;

/// Sample (column) name for a count file
pub fn sample_name(prefix: &str, p: &Path) -> anyhow::Result<String> {
    Ok(format!("{}_{}", prefix, file_stem(p)?))
}

/// Load the count files given in cfg
///
/// Files that can not be read, and files that would give a sample name that
/// has already been used, are reported and skipped
pub fn load_tables(cfg: &Config) -> Vec<KeyedTable<u64>> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(cfg.input_files().len());
    for p in cfg.input_files() {
        let res = sample_name(cfg.sample_prefix(), p).and_then(|s| {
            if seen.contains(&s) {
                Err(ReconcileError::DuplicateColumn(s).into())
            } else {
                let t = read_count_file(p, &s, cfg.has_header())?;
                seen.insert(s);
                Ok(t)
            }
        });
        match res {
            Ok(t) => tables.push(t),
            Err(e) => report(&e.context(format!("Failed to load {}", p.display()))),
        }
    }
    tables
}

/// Fold tables with a full outer join (left to right) and set all absent
/// counts to zero.  Returns None if there are no tables
pub fn combine(tables: Vec<KeyedTable<u64>>) -> anyhow::Result<Option<WideCountTable>> {
    Ok(outer_join_all(tables)?.map(|t| t.fill_missing(0)))
}

/// Derive and write sample metadata from the columns of the combined table
///
/// This is all or nothing: if any sample name does not follow the naming
/// convention no metadata file is written
pub fn writemeta(cfg: &Config, table: &WideCountTable) -> anyhow::Result<Vec<SampleMetadata>> {
    let meta = derive_metadata(table.columns())?;
    let out_dir = setup_output_dir(cfg.output_dir())?;
    let opath = out_dir.join(cfg.metadata_file());
    output_metadata(&meta, &opath)?;
    info!("Metadata file {} created", opath.display());
    Ok(meta)
}

/// Strategy
///
/// Read in all count files, skipping those that can not be read.
/// Combine the counts from all samples into a single table, with zeros
/// where a sample has no count for an identifier, and write out.
/// Finally generate metadata for each sample from the sample names
pub fn process_samples(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");
    let tables = load_tables(cfg);
    debug!(
        "Loaded {} of {} count files",
        tables.len(),
        cfg.input_files().len()
    );

    let combined = match combine(tables)? {
        Some(t) => t,
        None => {
            report(&anyhow::Error::new(ReconcileError::EmptyResult(
                "no valid data to combine".to_owned(),
            )));
            return Ok(());
        }
    };
    info!(
        "Combined table has {} identifiers and {} samples",
        combined.n_rows(),
        combined.columns().len()
    );

    let out_dir = setup_output_dir(cfg.output_dir())?;
    let opath = out_dir.join(cfg.counts_file());
    output_counts(&combined, &opath)?;
    info!("Combined counts saved as {}", opath.display());

    if let Err(e) = writemeta(cfg, &combined) {
        report(&e.context("Error creating metadata"))
    }
    Ok(())
}
