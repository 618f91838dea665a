use std::{collections::HashMap, io::Write, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use utils::error::ReconcileError;

use crate::{config::Config, hits::*};

/// Hit counts per target
///
/// Sorted on decreasing count.  Targets with the same count are kept in the
/// order they were first seen in the input
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountTable {
    counts: Vec<(String, u64)>,
}

impl CountTable {
    /// Count occurrences of each target id
    pub fn from_hits<'a, I: IntoIterator<Item = &'a HitRecord>>(hits: I) -> Self {
        let mut ix: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, u64)> = Vec::new();
        for h in hits {
            let t = h.target_id();
            match ix.get(t) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    ix.insert(t, counts.len());
                    counts.push((t.to_owned(), 1))
                }
            }
        }
        // Stable sort so ties stay in input order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self { counts }
    }

    pub fn counts(&self) -> &[(String, u64)] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, n)| *n).sum()
    }

    /// Write as CSV (target id, count) with no header line
    pub fn write_csv<W: Write>(&self, wrt: W) -> anyhow::Result<()> {
        let mut w = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(wrt);
        for (t, n) in self.counts.iter() {
            w.write_record([t.as_str(), n.to_string().as_str()])?
        }
        w.flush()?;
        Ok(())
    }
}

/// Keep hits with % identity strictly above the threshold
pub fn filter_identity(hits: &[HitRecord], min_identity: f64) -> impl Iterator<Item = &HitRecord> {
    hits.iter().filter(move |h| h.identity() > min_identity)
}

/// Read, filter and count the hits from one input file
///
/// An empty count table (no hits passing the identity filter) is reported as
/// an EmptyResult error
pub fn extract(p: &Path, cfg: &Config) -> anyhow::Result<CountTable> {
    let hits = read_hits(p, cfg.has_header())?;
    let table = CountTable::from_hits(filter_identity(&hits, cfg.min_identity()));
    debug!(
        "{}: {} of {} hits have identity > {}, {} targets",
        p.display(),
        table.total(),
        hits.len(),
        cfg.min_identity(),
        table.len()
    );
    if table.is_empty() {
        Err(ReconcileError::EmptyResult(format!(
            "no hits with % identity > {} in {}",
            cfg.min_identity(),
            p.display()
        ))
        .into())
    } else {
        Ok(table)
    }
}

/// Write count table to out_path
pub fn output_counts(table: &CountTable, out_path: &Path) -> anyhow::Result<()> {
    trace!("Writing counts to {}", out_path.display());
    let wrt = CompressIo::new()
        .path(out_path)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", out_path.display()))?;
    table
        .write_csv(wrt)
        .with_context(|| format!("Error writing counts to {}", out_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(target: &str, identity: f64) -> HitRecord {
        let line = format!("q\t{}\t{}\t20\t0\t0\t1\t20\t1\t20\t0.001\t40", target, identity);
        let f: Vec<_> = line.split('\t').collect();
        HitRecord::from_fields(&f).unwrap()
    }

    #[test]
    fn identity_threshold_is_strict() {
        let hits = vec![hit("a", 95.0), hit("b", 95.01), hit("c", 100.0), hit("d", 12.0)];
        let kept: Vec<_> = filter_identity(&hits, 95.0).map(|h| h.target_id()).collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn counts_sorted_with_stable_ties() {
        let hits: Vec<_> = ["t3", "t1", "t2", "t1", "t2", "t4", "t2"]
            .iter()
            .map(|t| hit(t, 99.0))
            .collect();
        let table = CountTable::from_hits(hits.iter());
        let v: Vec<_> = table
            .counts()
            .iter()
            .map(|(t, n)| (t.as_str(), *n))
            .collect();
        assert_eq!(v, vec![("t2", 3), ("t1", 2), ("t3", 1), ("t4", 1)]);
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn csv_has_no_header() {
        let hits = vec![hit("g1", 99.0), hit("g2", 99.0), hit("g1", 99.0)];
        let table = CountTable::from_hits(hits.iter());
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "g1,2\ng2,1\n");
    }
}
