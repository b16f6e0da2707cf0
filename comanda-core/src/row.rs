use crate::{AsValue, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names, as returned by the store.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Exact (case sensitive) column lookup.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl From<Record> for RowLabeled {
    fn from(value: Record) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) = value.fields.into_iter().unzip();
        RowLabeled {
            labels: labels.into(),
            values: values.into(),
        }
    }
}

/// A caller supplied row: ordered column names with their values.
///
/// Keys keep their insertion order, which is the order of the generated column list and
/// of the bound parameters. Setting an existing key replaces its value in place. Keys are
/// matched ignoring ASCII case, as identifiers are folded to lower case when written.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set(mut self, column: impl Into<String>, value: impl AsValue) -> Self {
        self.insert(column, value);
        self
    }
    pub fn insert(&mut self, column: impl Into<String>, value: impl AsValue) {
        let column = column.into();
        let value = value.as_value();
        match self.fields.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&column)) {
            Some((_, v)) => *v = value,
            None => self.fields.push((column, value)),
        }
    }
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let i = self.fields.iter().position(|(k, _)| k.eq_ignore_ascii_case(column))?;
        Some(self.fields.remove(i).1)
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(column).then_some(v))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> + Clone {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> + Clone {
        self.fields.iter().map(|(_, v)| v)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: AsValue> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl From<RowLabeled> for Record {
    fn from(value: RowLabeled) -> Self {
        value
            .labels
            .iter()
            .cloned()
            .zip(value.values.into_vec())
            .collect()
    }
}
