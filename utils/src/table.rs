use std::{collections::HashMap, fmt::Display, io::Write};

use crate::error::ReconcileError;

/// KeyedTable
///
/// A table with a single string key column and any number of named value
/// columns.  Row keys are unique and kept in insertion order.  Cells are
/// optional so that the result of an outer join can represent values that
/// were not measured in one of the inputs.
///
/// Tables are not modified once built: joins, fills and projections all
/// return a new table.
///
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable<T> {
    key_name: String,
    columns: Vec<String>,
    keys: Vec<String>,
    index: HashMap<String, usize>,
    // Row major, each row has columns.len() cells
    cells: Vec<Vec<Option<T>>>,
}

impl<T: Clone> KeyedTable<T> {
    /// Build a table with a single value column from (key, value) pairs.
    /// Pair order gives row order.  Repeated keys are rejected
    pub fn from_column<I>(key_name: &str, column: &str, data: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = (String, Option<T>)>,
    {
        let mut keys = Vec::new();
        let mut index = HashMap::new();
        let mut cells = Vec::new();
        for (k, v) in data {
            if index.contains_key(&k) {
                return Err(ReconcileError::DuplicateKey(k));
            }
            index.insert(k.clone(), keys.len());
            keys.push(k);
            cells.push(vec![v]);
        }
        Ok(Self {
            key_name: key_name.to_owned(),
            columns: vec![column.to_owned()],
            keys,
            index,
            cells,
        })
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn n_rows(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cell lookup by key and column name.  Returns None if the key or column
    /// does not exist or if the cell is absent
    pub fn get(&self, key: &str, column: &str) -> Option<&T> {
        let row = *self.index.get(key)?;
        let col = self.columns.iter().position(|c| c == column)?;
        self.cells[row][col].as_ref()
    }

    /// Iterate over rows as (key, cells)
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<T>])> {
        self.keys
            .iter()
            .zip(self.cells.iter())
            .map(|(k, r)| (k.as_str(), r.as_slice()))
    }

    /// Full outer join on the key column
    ///
    /// The result has the columns of self followed by the columns of other.
    /// Rows of self come first in their original order, followed by rows whose
    /// key is only present in other (in the order they appear in other).
    /// Cells for a key missing from one side are None.
    pub fn outer_join(&self, other: &Self) -> Result<Self, ReconcileError> {
        if self.key_name != other.key_name {
            return Err(ReconcileError::KeyMismatch {
                left: self.key_name.clone(),
                right: other.key_name.clone(),
            });
        }
        if let Some(c) = other.columns.iter().find(|c| self.has_column(c)) {
            return Err(ReconcileError::DuplicateColumn(c.clone()));
        }

        let nl = self.columns.len();
        let nr = other.columns.len();
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());

        let mut keys = self.keys.clone();
        let mut index = self.index.clone();
        let mut cells: Vec<Vec<Option<T>>> = Vec::with_capacity(self.n_rows() + other.n_rows());

        for (k, row) in self.rows() {
            let mut v = Vec::with_capacity(nl + nr);
            v.extend_from_slice(row);
            match other.index.get(k) {
                Some(&j) => v.extend_from_slice(&other.cells[j]),
                None => v.resize(nl + nr, None),
            }
            cells.push(v)
        }

        for (k, row) in other.rows().filter(|(k, _)| !self.index.contains_key(*k)) {
            let mut v = vec![None; nl];
            v.extend_from_slice(row);
            index.insert(k.to_owned(), keys.len());
            keys.push(k.to_owned());
            cells.push(v)
        }

        Ok(Self {
            key_name: self.key_name.clone(),
            columns,
            keys,
            index,
            cells,
        })
    }

    /// Replace every absent cell with x
    pub fn fill_missing(&self, x: T) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|r| {
                r.iter()
                    .map(|c| c.clone().or_else(|| Some(x.clone())))
                    .collect()
            })
            .collect();
        Self {
            cells,
            ..self.clone()
        }
    }

    /// Check whether any cell is absent
    pub fn has_missing(&self) -> bool {
        self.cells.iter().flatten().any(|c| c.is_none())
    }
}

/// Left to right fold of tables using KeyedTable::outer_join, starting from
/// the first table.  Returns Ok(None) if tables is empty.
pub fn outer_join_all<T, I>(tables: I) -> Result<Option<KeyedTable<T>>, ReconcileError>
where
    T: Clone,
    I: IntoIterator<Item = KeyedTable<T>>,
{
    let mut it = tables.into_iter();
    let first = match it.next() {
        Some(t) => t,
        None => return Ok(None),
    };
    it.try_fold(first, |acc, t| acc.outer_join(&t)).map(Some)
}

impl<T: Display> KeyedTable<T> {
    /// Write table as CSV with a header line.  Absent cells are written as empty fields
    pub fn write_csv<W: Write>(&self, wrt: W) -> anyhow::Result<()> {
        let mut w = csv::Writer::from_writer(wrt);
        w.write_record(std::iter::once(&self.key_name).chain(self.columns.iter()))?;
        for (k, row) in self.keys.iter().zip(self.cells.iter()) {
            w.write_field(k)?;
            for c in row.iter() {
                match c {
                    Some(x) => w.write_field(x.to_string())?,
                    None => w.write_field("")?,
                }
            }
            w.write_record(None::<&[u8]>)?;
        }
        w.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table(col: &str, v: &[(&str, u64)]) -> KeyedTable<u64> {
        KeyedTable::from_column(
            "Locus_ID",
            col,
            v.iter().map(|(k, x)| (k.to_string(), Some(*x))),
        )
        .unwrap()
    }

    #[test]
    fn join_keeps_union_of_keys() {
        let a = table("A", &[("g1", 5), ("g2", 3)]);
        let b = table("B", &[("g2", 7), ("g3", 2)]);
        let j = a.outer_join(&b).unwrap();
        assert_eq!(j.keys(), &["g1", "g2", "g3"]);
        assert_eq!(j.columns(), &["A", "B"]);
        assert_eq!(j.get("g1", "A"), Some(&5));
        assert_eq!(j.get("g1", "B"), None);
        assert_eq!(j.get("g2", "B"), Some(&7));
        assert_eq!(j.get("g3", "A"), None);
        assert!(j.has_missing());
        // Inputs are untouched
        assert_eq!(a.columns(), &["A"]);
        assert_eq!(b.n_rows(), 2);
    }

    #[test]
    fn fill_replaces_absent_cells() {
        let a = table("A", &[("g1", 5), ("g2", 3)]);
        let b = table("B", &[("g2", 7), ("g3", 2)]);
        let j = a.outer_join(&b).unwrap().fill_missing(0);
        assert!(!j.has_missing());
        let rows: Vec<_> = j
            .rows()
            .map(|(k, r)| (k.to_owned(), r.iter().map(|c| c.unwrap()).collect::<Vec<_>>()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("g1".to_owned(), vec![5, 0]),
                ("g2".to_owned(), vec![3, 7]),
                ("g3".to_owned(), vec![0, 2])
            ]
        );
    }

    #[rstest]
    #[case(&["A", "B", "C"])]
    #[case(&["C", "A", "B"])]
    fn fold_preserves_column_order(#[case] names: &[&str]) {
        let tables: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| table(n, &[("z", i as u64), ("a", 1)]))
            .collect();
        let j = outer_join_all(tables).unwrap().unwrap();
        assert_eq!(j.columns(), names);
        assert_eq!(j.n_rows(), 2);
    }

    #[test]
    fn fold_of_nothing_is_none() {
        let v: Vec<KeyedTable<u64>> = Vec::new();
        assert!(outer_join_all(v).unwrap().is_none());
    }

    #[test]
    fn every_key_appears_once() {
        let a = table("A", &[("x", 1), ("y", 1)]);
        let b = table("B", &[("y", 2), ("x", 2), ("w", 2)]);
        let c = table("C", &[("w", 3), ("v", 3)]);
        let j = outer_join_all(vec![a, b, c]).unwrap().unwrap();
        let mut k = j.keys().to_vec();
        k.sort();
        assert_eq!(k, vec!["v", "w", "x", "y"]);
    }

    #[test]
    fn duplicates_rejected() {
        let r = KeyedTable::from_column(
            "ID",
            "A",
            vec![("g1".to_owned(), Some(1)), ("g1".to_owned(), Some(2))],
        );
        assert_eq!(r, Err(ReconcileError::DuplicateKey("g1".to_owned())));

        let a = table("A", &[("g1", 1)]);
        assert_eq!(
            a.outer_join(&a),
            Err(ReconcileError::DuplicateColumn("A".to_owned()))
        );
    }

    #[test]
    fn key_columns_must_match() {
        let a = table("A", &[("g1", 1)]);
        let b = KeyedTable::from_column("ID", "B", vec![("g1".to_owned(), Some(1u64))]).unwrap();
        assert!(matches!(
            a.outer_join(&b),
            Err(ReconcileError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn csv_output_leaves_absent_cells_empty() {
        let a = table("A", &[("g1", 5)]);
        let b = table("B", &[("g2", 7)]);
        let j = a.outer_join(&b).unwrap();
        let mut out = Vec::new();
        j.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Locus_ID,A,B\ng1,5,\ng2,,7\n"
        );
    }
}
