//! One record of a tabular source: ordered `column -> raw value` pairs.

use std::slice;
use std::vec;

/// An ordered mapping of column name to raw cell value.
///
/// Columns keep the position of their first insertion; inserting an existing
/// column overwrites its value in place, so the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Returns the value of `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == column)
    }

    /// Sets `column` to `value`, returning the previous value when the column existed.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.cells.push((column, value));
                None
            },
        }
    }

    /// Removes `column`, preserving the order of the remaining cells.
    pub fn remove(&mut self, column: &str) -> Option<String> {
        let index = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(index).1)
    }

    /// Keeps only the cells for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.cells.retain(|(name, value)| keep(name, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        row.extend(iter);
        row
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Row {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (column, value) in iter {
            self.insert(column, value);
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, String);
    type IntoIter = vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a (String, String);
    type IntoIter = slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
