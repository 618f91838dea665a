use std::io::Write;

use utils::error::ReconcileError;

/// SampleMetadata
///
/// Sample description in the form expected by DESeq2 (colData)
///
/// Derived entirely from the sample name, which follows the convention
/// <prefix>_<condition><replicate>[_<suffix>...], i.e., Syn7002_12A1_counts
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    sample: String,
    condition: String,
    replicate: u8,
}

impl SampleMetadata {
    /// Parse a sample name
    ///
    /// The condition is the second '_' delimited field with its last character
    /// removed.  The replicate is 1 if the second to last field contains a '1',
    /// otherwise 2.  Where the name has only two fields the second to last
    /// field is the prefix, so the second field is used instead.
    ///
    /// Note that this misclassifies conditions that themselves contain a '1'
    pub fn from_sample_name(name: &str) -> Result<Self, ReconcileError> {
        let fields: Vec<_> = name.split('_').collect();
        if fields.len() < 2 {
            return Err(ReconcileError::PatternMismatch(format!(
                "sample name {} does not have the form <prefix>_<condition><replicate>",
                name
            )));
        }

        let cond_field = fields[1];
        let condition = match cond_field.char_indices().last() {
            Some((i, _)) if i > 0 => &cond_field[..i],
            _ => {
                return Err(ReconcileError::PatternMismatch(format!(
                    "sample name {}: no condition found in '{}'",
                    name, cond_field
                )))
            }
        };

        let rep_field = if fields.len() > 2 {
            fields[fields.len() - 2]
        } else {
            cond_field
        };
        let replicate = if rep_field.contains('1') { 1 } else { 2 };

        Ok(Self {
            sample: name.to_owned(),
            condition: condition.to_owned(),
            replicate,
        })
    }

    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn replicate(&self) -> u8 {
        self.replicate
    }
}

/// Derive metadata for all samples.  Fails if any sample name can not be parsed
pub fn derive_metadata<S: AsRef<str>>(
    samples: &[S],
) -> Result<Vec<SampleMetadata>, ReconcileError> {
    samples
        .iter()
        .map(|s| SampleMetadata::from_sample_name(s.as_ref()))
        .collect()
}

/// Write metadata as CSV with header sample,condition,replicate
pub fn write_metadata<W: Write>(meta: &[SampleMetadata], wrt: W) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_writer(wrt);
    w.write_record(["sample", "condition", "replicate"])?;
    for m in meta.iter() {
        w.write_record([m.sample(), m.condition(), m.replicate.to_string().as_str()])?
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Syn7002_12A1", "12A", 1)]
    #[case("Syn7002_12A2", "12A", 2)]
    #[case("Syn7002_12A1_counts", "12A", 1)]
    #[case("Syn7002_24C2_counts", "24C", 2)]
    #[case("Syn7002_12A2_S1_counts", "12A", 1)]
    fn parse_sample_names(#[case] name: &str, #[case] condition: &str, #[case] replicate: u8) {
        let m = SampleMetadata::from_sample_name(name).unwrap();
        assert_eq!(m.sample(), name);
        assert_eq!(m.condition(), condition);
        assert_eq!(m.replicate(), replicate);
    }

    #[rstest]
    #[case("Syn7002")]
    #[case("Syn7002_A")]
    #[case("Syn7002_")]
    fn reject_bad_names(#[case] name: &str) {
        assert!(matches!(
            SampleMetadata::from_sample_name(name),
            Err(ReconcileError::PatternMismatch(_))
        ));
    }

    #[test]
    fn one_bad_name_fails_all() {
        assert!(derive_metadata(&["Syn7002_12A1", "bad", "Syn7002_12A2"]).is_err());
        let v = derive_metadata(&["Syn7002_12A1", "Syn7002_12A2"]).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn metadata_csv() {
        let v = derive_metadata(&["Syn7002_12A1", "Syn7002_12A2"]).unwrap();
        let mut out = Vec::new();
        write_metadata(&v, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "sample,condition,replicate\nSyn7002_12A1,12A,1\nSyn7002_12A2,12A,2\n"
        );
    }
}
