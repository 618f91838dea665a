use std::path::Path;

use anyhow::Context;
use compress_io::compress::CompressIo;
use utils::{error::ReconcileError, open_csv_reader, table::KeyedTable};

use crate::metadata::{write_metadata, SampleMetadata};

/// Name of the identifier column in the combined table
pub const KEY_COLUMN: &str = "Locus_ID";

/// Read a two column count file (identifier, count) into a table with a
/// single column named after the sample
///
/// If has_header is set the first line is discarded; it must still have
/// two columns.  Counts must be non-negative integers and identifiers must be
/// unique within the file
pub fn read_count_file(
    p: &Path,
    sample: &str,
    has_header: bool,
) -> anyhow::Result<KeyedTable<u64>> {
    let mut rdr = open_csv_reader(p, has_header)?;
    if has_header {
        let n = rdr
            .headers()
            .with_context(|| format!("Error reading header from {}", p.display()))?
            .len();
        if n != 2 {
            return Err(ReconcileError::Format(format!(
                "{}: expected 2 columns in header, found {}",
                p.display(),
                n
            ))
            .into());
        }
    }

    let mut v = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| {
            format!("Error after reading {} records from {}", i, p.display())
        })?;
        let line = rec.position().map(|x| x.line()).unwrap_or(i as u64 + 1);
        if rec.len() != 2 {
            return Err(ReconcileError::Format(format!(
                "{}:{} expected 2 columns, found {}",
                p.display(),
                line,
                rec.len()
            ))
            .into());
        }
        let ct = rec[1].trim().parse::<u64>().map_err(|_| {
            ReconcileError::Format(format!(
                "{}:{} Error reading count '{}'",
                p.display(),
                line,
                &rec[1]
            ))
        })?;
        v.push((rec[0].to_owned(), Some(ct)))
    }
    let n = v.len();
    let table = KeyedTable::from_column(KEY_COLUMN, sample, v)
        .with_context(|| format!("Error reading counts from {}", p.display()))?;
    debug!("Read {} identifiers for sample {} from {}", n, sample, p.display());
    Ok(table)
}

pub fn output_counts(table: &KeyedTable<u64>, out_path: &Path) -> anyhow::Result<()> {
    trace!("Writing combined counts to {}", out_path.display());
    let wrt = CompressIo::new()
        .path(out_path)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", out_path.display()))?;
    table
        .write_csv(wrt)
        .with_context(|| format!("Error writing combined counts to {}", out_path.display()))
}

pub fn output_metadata(meta: &[SampleMetadata], out_path: &Path) -> anyhow::Result<()> {
    trace!("Writing sample metadata to {}", out_path.display());
    let wrt = CompressIo::new()
        .path(out_path)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", out_path.display()))?;
    write_metadata(meta, wrt)
        .with_context(|| format!("Error writing sample metadata to {}", out_path.display()))
}
