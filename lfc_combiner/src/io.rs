use std::{io::Write, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;
use utils::{error::ReconcileError, open_csv_reader, table::KeyedTable};

/// Column layout of a DESeq2 results table.  The effect size column
/// (log2FoldChange) is renamed to the condition when read
pub const RESULT_COLUMNS: [&str; 7] = [
    "ID",
    "baseMean",
    "log2FoldChange",
    "lfcSE",
    "stat",
    "pvalue",
    "padj",
];

/// Name of the identifier column
pub const KEY_COLUMN: &str = "ID";

/// Index of the effect size column
const LFC_IDX: usize = 2;

/// Parse an effect size.  Empty fields and NA are missing values
fn parse_lfc(s: &str) -> Option<Result<f64, std::num::ParseFloatError>> {
    match s.trim() {
        "" | "NA" => None,
        t => Some(t.parse::<f64>()),
    }
}

/// Read the identifier and effect size columns from a DESeq2 result table
///
/// The file must have a header line and exactly 7 columns.  The effect size
/// column of the returned table is named after the condition
pub fn read_effect_sizes(p: &Path, condition: &str) -> anyhow::Result<KeyedTable<f64>> {
    let mut rdr = open_csv_reader(p, true)?;
    let n = rdr
        .headers()
        .with_context(|| format!("Error reading header from {}", p.display()))?
        .len();
    if n != RESULT_COLUMNS.len() {
        return Err(ReconcileError::Format(format!(
            "{}: expected {} columns, found {}",
            p.display(),
            RESULT_COLUMNS.len(),
            n
        ))
        .into());
    }

    let mut v = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| {
            format!("Error after reading {} records from {}", i, p.display())
        })?;
        let line = rec.position().map(|x| x.line()).unwrap_or(i as u64 + 2);
        if rec.len() != RESULT_COLUMNS.len() {
            return Err(ReconcileError::Format(format!(
                "{}:{} expected {} columns, found {}",
                p.display(),
                line,
                RESULT_COLUMNS.len(),
                rec.len()
            ))
            .into());
        }
        let lfc = parse_lfc(&rec[LFC_IDX])
            .transpose()
            .map_err(|_| {
                ReconcileError::Format(format!(
                    "{}:{} Error reading effect size '{}'",
                    p.display(),
                    line,
                    &rec[LFC_IDX]
                ))
            })?;
        v.push((rec[0].to_owned(), lfc))
    }
    let table = KeyedTable::from_column(KEY_COLUMN, condition, v)
        .with_context(|| format!("Error reading effect sizes from {}", p.display()))?;
    debug!(
        "Read {} identifiers for condition {} from {}",
        table.n_rows(),
        condition,
        p.display()
    );
    Ok(table)
}

/// Format an effect size for output
///
/// Values with magnitude outside [1e-4, 1e15) are written in scientific notation
fn format_lfc(x: f64) -> String {
    let a = x.abs();
    if a == 0.0 || (1e-4..1e15).contains(&a) || !a.is_finite() {
        format!("{}", x)
    } else {
        format!("{:e}", x)
    }
}

/// Locus for an identifier: the first len characters (or the whole
/// identifier if it is shorter)
pub fn locus(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

/// Effect sizes for all conditions with the locus for each identifier
///
/// Missing effect sizes are kept as missing
#[derive(Debug, Clone)]
pub struct WideEffectSizeTable {
    table: KeyedTable<f64>,
    locus: Vec<String>,
}

impl WideEffectSizeTable {
    pub fn new(table: KeyedTable<f64>, locus_len: usize) -> Self {
        let locus = table
            .keys()
            .iter()
            .map(|k| locus(k, locus_len).to_owned())
            .collect();
        Self { table, locus }
    }

    pub fn table(&self) -> &KeyedTable<f64> {
        &self.table
    }

    pub fn locus(&self) -> &[String] {
        &self.locus
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Write as CSV: ID, one column per condition, locus
    pub fn write_csv<W: Write>(&self, wrt: W) -> anyhow::Result<()> {
        let mut w = csv::Writer::from_writer(wrt);
        w.write_field(self.table.key_name())?;
        for c in self.table.columns() {
            w.write_field(c)?
        }
        w.write_field("locus")?;
        w.write_record(None::<&[u8]>)?;
        for ((k, row), l) in self.table.rows().zip(self.locus.iter()) {
            w.write_field(k)?;
            for c in row.iter() {
                match c {
                    Some(x) => w.write_field(format_lfc(*x))?,
                    None => w.write_field("")?,
                }
            }
            w.write_field(l)?;
            w.write_record(None::<&[u8]>)?;
        }
        w.flush()?;
        Ok(())
    }
}

pub fn output_effect_sizes(table: &WideEffectSizeTable, out_path: &Path) -> anyhow::Result<()> {
    trace!("Writing combined effect sizes to {}", out_path.display());
    let wrt = CompressIo::new()
        .path(out_path)
        .bufwriter()
        .with_context(|| format!("problem creating output file {}", out_path.display()))?;
    table
        .write_csv(wrt)
        .with_context(|| format!("Error writing combined effect sizes to {}", out_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn locus_is_prefix() {
        assert_eq!(locus("SP_0001extra", 5), "SP_00");
        assert_eq!(locus("SP_0", 5), "SP_0");
        assert_eq!(locus("A0001", 5), "A0001");
    }

    #[test]
    fn missing_effect_sizes() {
        assert_eq!(parse_lfc("NA"), None);
        assert_eq!(parse_lfc(""), None);
        assert_eq!(parse_lfc(" -1.25 "), Some(Ok(-1.25)));
        assert!(matches!(parse_lfc("abc"), Some(Err(_))));
    }

    #[rstest]
    #[case(1.5, "1.5")]
    #[case(-0.25, "-0.25")]
    #[case(0.0, "0")]
    #[case(2.0, "2")]
    #[case(1e-4, "0.0001")]
    #[case(1.5e-30, "1.5e-30")]
    #[case(-3.25e-7, "-3.25e-7")]
    #[case(2.5e20, "2.5e20")]
    #[case(f64::INFINITY, "inf")]
    fn effect_size_format(#[case] x: f64, #[case] s: &str) {
        assert_eq!(format_lfc(x), s);
    }

    #[test]
    fn write_small_effect_size() {
        let v = vec![("SP_0001".to_owned(), Some(1.5e-30))];
        let a = KeyedTable::from_column(KEY_COLUMN, "12A", v).unwrap();
        let wide = WideEffectSizeTable::new(a, 5);
        let mut out = Vec::new();
        wide.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID,12A,locus\nSP_0001,1.5e-30,SP_00\n"
        );
    }

    #[test]
    fn write_keeps_missing_cells() {
        let a = KeyedTable::from_column(
            KEY_COLUMN,
            "12A",
            vec![("SP_0001a".to_owned(), Some(1.5)), ("SP_0002b".to_owned(), None)],
        )
        .unwrap();
        let b = KeyedTable::from_column(KEY_COLUMN, "24C", vec![("XY".to_owned(), Some(-0.25))])
            .unwrap();
        let wide = WideEffectSizeTable::new(a.outer_join(&b).unwrap(), 5);
        let mut out = Vec::new();
        wide.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID,12A,24C,locus\nSP_0001a,1.5,,SP_00\nSP_0002b,,,SP_00\nXY,,-0.25,XY\n"
        );
    }
}
