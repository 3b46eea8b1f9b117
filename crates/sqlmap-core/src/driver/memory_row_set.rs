use super::{Column, RowSet};
use crate::{
    stmt::{Value, ValueRecord},
    Error, Result,
};

/// A row set fully buffered in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRowSet {
    columns: Vec<String>,
    rows: Vec<ValueRecord>,
    /// Position of the current row; `None` before the first `next()`.
    cursor: Option<usize>,
    was_null: bool,
}

impl MemoryRowSet {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> MemoryRowSet {
        MemoryRowSet {
            columns: columns.into_iter().map(Into::into).collect(),
            ..MemoryRowSet::default()
        }
    }

    /// Adds a row. The row must have one value per column.
    pub fn row(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.push_row(values.into_iter().collect());
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.columns.len(), "row width mismatch");
        self.rows.push(ValueRecord::from_vec(values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a copy positioned before the first row.
    pub fn rewind(&self) -> MemoryRowSet {
        MemoryRowSet {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            cursor: None,
            was_null: false,
        }
    }

    fn current(&self) -> Result<&ValueRecord> {
        self.cursor
            .and_then(|cursor| self.rows.get(cursor))
            .ok_or_else(|| Error::database_message("the result set has no current row"))
    }
}

impl RowSet for MemoryRowSet {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> Result<bool> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        // Park the cursor one past the end so `current()` fails after exhaustion
        self.cursor = Some(next.min(self.rows.len()));
        Ok(next < self.rows.len())
    }

    fn get_value(&mut self, column: Column<'_>) -> Result<Value> {
        let index = self.column_index(column)?;
        let value = self.current()?.get(index).cloned().unwrap_or_default();
        self.was_null = value.is_null();
        Ok(value)
    }

    fn was_null(&self) -> bool {
        self.was_null
    }
}
