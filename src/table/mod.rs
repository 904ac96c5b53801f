//! # Table Module
//!
//! A small column-oriented table holding a whole peptide or protein export in
//! memory. Every operation returns a new table; nothing is modified in place
//! except [`Table::with_column`], which takes `self` by value.
//!
//! Cells are either numeric (`Option<f64>`) or text (`Option<String>`). Column
//! types are inferred on load the way a dataframe reader does it, which is what
//! decides the reducer used by [`Table::group_by`].

mod column;
mod error;
mod io;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashSet};

pub use column::{Column, ColumnData, NumericColumn};
pub use error::TableError;
pub use io::convert_delimited;

/// What to do with rows whose grouping key is missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Leave such rows out of the grouped table
    #[default]
    Drop,
    /// Group such rows under the given label
    Sentinel(String),
}

/// In-memory table: named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns, checking lengths and header uniqueness
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != n_rows {
                return Err(TableError::LengthMismatch {
                    name: column.name.clone(),
                    expected: n_rows,
                    found: column.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Header names in column order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Numeric column by name
    pub fn numeric(&self, name: &str) -> Result<&NumericColumn, TableError> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| TableError::NotNumeric(name.to_string()))
    }

    /// Text cells of a column by name, rendering numeric cells as text
    pub fn text(&self, name: &str) -> Result<Vec<Option<String>>, TableError> {
        let column = self.column(name)?;
        Ok(match &column.data {
            ColumnData::Text(values) => values.clone(),
            data @ ColumnData::Numeric(_) => (0..self.n_rows)
                .map(|row| (!data.is_missing(row)).then(|| data.format_cell(row)))
                .collect(),
        })
    }

    /// Append a column, or replace the existing column of the same name in place
    pub fn with_column(mut self, column: Column) -> Result<Self, TableError> {
        let found = column.len();
        if !self.columns.is_empty() && found != self.n_rows {
            return Err(TableError::LengthMismatch {
                name: column.name,
                expected: self.n_rows,
                found,
            });
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        }
        match self.position(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    /// Keep the rows where `mask` is true, preserving their order
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self, TableError> {
        if mask.len() != self.n_rows {
            return Err(TableError::LengthMismatch {
                name: "<row mask>".to_string(),
                expected: self.n_rows,
                found: mask.len(),
            });
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(row, &keep)| keep.then_some(row))
            .collect();
        Ok(self.take_rows(&rows))
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.take(rows),
                })
                .collect(),
            n_rows: rows.len(),
        }
    }

    /// Copy of the table without the named columns; absent names are ignored
    pub fn drop_columns<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: HashSet<&str> = names.into_iter().collect();
        Self {
            columns: self
                .columns
                .iter()
                .filter(|c| !names.contains(c.name.as_str()))
                .cloned()
                .collect(),
            n_rows: self.n_rows,
        }
    }

    /// Merge rows sharing the value of `key` into one row per key
    ///
    /// Numeric columns are summed (missing cells count as zero), text columns
    /// take the value of the first row of the group in table order. Groups are
    /// emitted in ascending key order and `key` becomes the leading column.
    pub fn group_by(&self, key: &str, missing: &MissingKeyPolicy) -> Result<Self, TableError> {
        let keys = self.text(key)?;

        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (row, value) in keys.into_iter().enumerate() {
            let value = match (value, missing) {
                (Some(v), _) => v,
                (None, MissingKeyPolicy::Sentinel(label)) => label.clone(),
                (None, MissingKeyPolicy::Drop) => continue,
            };
            groups.entry(value).or_default().push(row);
        }

        let (labels, rows): (Vec<String>, Vec<Vec<usize>>) = groups.into_iter().unzip();

        let mut columns = Vec::with_capacity(self.columns.len());
        columns.push(Column::text(key, labels.into_iter().map(Some).collect()));
        columns.extend(self.columns.iter().filter(|c| c.name != key).map(|c| Column {
            name: c.name.clone(),
            data: c.data.reduce_groups(&rows),
        }));

        Self::new(columns)
    }
}
