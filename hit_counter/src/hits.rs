use std::{path::Path, str::FromStr};

use anyhow::Context;
use compress_io::compress::CompressIo;
use utils::{error::ReconcileError, get_next_line};

/// Column layout of the tabular (blast6out) hit files
pub const HIT_COLUMNS: [&str; 12] = [
    "Query ID",
    "Target ID",
    "% Identity",
    "Alignment Length",
    "Mismatches",
    "Gap Openings",
    "Query Start",
    "Query End",
    "Target Start",
    "Target End",
    "E-value",
    "Bit Score",
];

/// One alignment hit
///
/// Only the target id and the % identity are used for counting, but the
/// numeric columns of the whole line are checked so that malformed files
/// are detected
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    target_id: String,
    identity: f64,
}

fn parse_field<T: FromStr>(fields: &[&str], ix: usize) -> Result<T, ReconcileError> {
    fields[ix].parse::<T>().map_err(|_| {
        ReconcileError::Format(format!(
            "could not parse {} from '{}'",
            HIT_COLUMNS[ix], fields[ix]
        ))
    })
}

/// Integer columns: alignment length through target end
const INT_COLUMNS: std::ops::Range<usize> = 3..10;

/// E-value and bit score
const FLOAT_COLUMNS: std::ops::Range<usize> = 10..12;

impl HitRecord {
    /// Build record from the fields of an input line.  The number of fields
    /// must match HIT_COLUMNS
    pub fn from_fields(fields: &[&str]) -> Result<Self, ReconcileError> {
        if fields.len() != HIT_COLUMNS.len() {
            return Err(ReconcileError::Format(format!(
                "expected {} columns, found {}",
                HIT_COLUMNS.len(),
                fields.len()
            )));
        }
        let identity: f64 = parse_field(fields, 2)?;
        if !(0.0..=100.0).contains(&identity) {
            return Err(ReconcileError::Format(format!(
                "% Identity {} out of range",
                identity
            )));
        }
        for ix in INT_COLUMNS {
            parse_field::<u64>(fields, ix)?;
        }
        for ix in FLOAT_COLUMNS {
            parse_field::<f64>(fields, ix)?;
        }
        Ok(Self {
            target_id: fields[1].to_owned(),
            identity,
        })
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn identity(&self) -> f64 {
        self.identity
    }
}

/// Read all hits from a (possibly compressed) tab separated file
///
/// If has_header is set, the first line is skipped.  Blank lines are ignored.
/// Any other line must have exactly 12 columns
pub fn read_hits<P: AsRef<Path>>(p: P, has_header: bool) -> anyhow::Result<Vec<HitRecord>> {
    let p = p.as_ref();
    trace!("Opening hit file {} for reading", p.display());
    let mut rdr = CompressIo::new()
        .path(p)
        .bufreader()
        .with_context(|| format!("Could not open {} for input", p.display()))?;

    let mut buf = String::new();
    let mut line = 0;
    let mut v = Vec::new();

    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, p.display()))?
    {
        line += 1;
        if (line == 1 && has_header) || (fields.len() == 1 && fields[0].is_empty()) {
            continue;
        }
        let hit = HitRecord::from_fields(&fields)
            .with_context(|| format!("{}:{} Error reading hit", p.display(), line))?;
        v.push(hit)
    }
    debug!("Read {} hits from {}", v.len(), p.display());
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINE: &str = "q1\tSYNPCC7002_A0001_g1\t98.5\t20\t0\t0\t1\t20\t3\t22\t-1\t0";

    #[test]
    fn parse_line() {
        let f: Vec<_> = LINE.split('\t').collect();
        let h = HitRecord::from_fields(&f).unwrap();
        assert_eq!(h.target_id(), "SYNPCC7002_A0001_g1");
        assert_eq!(h.identity(), 98.5);
    }

    #[rstest]
    #[case(3, "20bp")]
    #[case(4, "-1")]
    #[case(9, "")]
    #[case(10, "small")]
    #[case(11, "x")]
    fn bad_numeric_column(#[case] ix: usize, #[case] val: &str) {
        let mut f: Vec<_> = LINE.split('\t').collect();
        f[ix] = val;
        let e = HitRecord::from_fields(&f).unwrap_err();
        assert!(matches!(e, ReconcileError::Format(_)));
        assert!(e.to_string().contains(HIT_COLUMNS[ix]));
    }

    #[test]
    fn wrong_column_count() {
        let f: Vec<_> = LINE.split('\t').take(11).collect();
        assert!(matches!(
            HitRecord::from_fields(&f),
            Err(ReconcileError::Format(_))
        ));
    }

    #[test]
    fn bad_identity() {
        let l = LINE.replace("98.5", "high");
        let f: Vec<_> = l.split('\t').collect();
        assert!(matches!(
            HitRecord::from_fields(&f),
            Err(ReconcileError::Format(_))
        ));
        let l = LINE.replace("98.5", "101");
        let f: Vec<_> = l.split('\t').collect();
        assert!(HitRecord::from_fields(&f).is_err());
    }
}
