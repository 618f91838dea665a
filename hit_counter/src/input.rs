use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// An input hit file and the name of the count file it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    output_name: String,
}

impl InputFile {
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        let output_name = output_name(&path)?;
        Ok(Self { path, output_name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

/// Output file name for an input file: the part of the file stem before the
/// first underscore followed by _counts.csv
/// i.e., 12A1_S5_hits.tsv gives 12A1_counts.csv
pub fn output_name(p: &Path) -> anyhow::Result<String> {
    let stem = utils::file_stem(p)?;
    let base = stem.split('_').next().unwrap_or(stem);
    if base.is_empty() {
        Err(anyhow!(
            "Could not get sample name from input file {}",
            p.display()
        ))
    } else {
        Ok(format!("{}_counts.csv", base))
    }
}

/// Collect the regular files in dir whose name (ignoring any compression
/// suffix) ends with suffix, sorted by path
///
/// Files whose output name would clash with an earlier file are dropped with
/// an error message
pub fn get_input_files(dir: &Path, suffix: &str) -> anyhow::Result<Vec<InputFile>> {
    let mut v: Vec<PathBuf> = Vec::new();
    if !dir.is_dir() {
        warn!("Input directory {} not found", dir.display());
        return Ok(Vec::new());
    }
    for f in dir
        .read_dir()
        .with_context(|| format!("Error checking input directory {}", dir.display()))?
    {
        let entry =
            f.with_context(|| format!("Could not get directory entry from {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            match utils::uncompressed_name(&path) {
                Ok(name) if name.ends_with(suffix) => v.push(path),
                Ok(_) => trace!("Skipping {}", path.display()),
                Err(e) => warn!("{}", e),
            }
        }
    }
    v.sort();

    let mut out_names: HashMap<String, PathBuf> = HashMap::new();
    let mut files = Vec::with_capacity(v.len());
    for path in v.drain(..) {
        let f = match InputFile::new(path) {
            Ok(f) => f,
            Err(e) => {
                error!("{:#}", e);
                continue;
            }
        };
        if let Some(p) = out_names.get(f.output_name()) {
            error!(
                "Input files {} and {} would both be written to {}; skipping {}",
                p.display(),
                f.path().display(),
                f.output_name(),
                f.path().display()
            );
        } else {
            trace!("Adding input file {}", f.path().display());
            out_names.insert(f.output_name().to_owned(), f.path().to_owned());
            files.push(f)
        }
    }
    debug!(
        "{} input files found in {}",
        files.len(),
        dir.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_first_token() {
        assert_eq!(
            output_name(Path::new("data/12A1_S5_hits.tsv")).unwrap(),
            "12A1_counts.csv"
        );
        assert_eq!(
            output_name(Path::new("data/12A1.tsv.gz")).unwrap(),
            "12A1_counts.csv"
        );
        assert!(output_name(Path::new("data/_x.tsv")).is_err());
    }
}
