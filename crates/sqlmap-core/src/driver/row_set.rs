use super::convert;
use crate::{stmt::Value, Error, Result};

use chrono::NaiveDateTime;
use std::fmt::Debug;

/// Addresses a column of the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    /// Column label, matched ignoring ASCII case
    Name(&'a str),

    /// 0-based position
    Index(usize),
}

impl core::fmt::Display for Column<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Column::Name(name) => f.write_str(name),
            Column::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// A forward cursor over the rows of a query result.
///
/// Implementations provide raw access; the typed getters follow the
/// convention of SQL call-level interfaces and return the type's default
/// (`false`, `0`, `None`) for SQL null. Callers that need to tell a null
/// from a default must check [`RowSet::was_null`] after the read.
pub trait RowSet: Debug + Send + 'static {
    /// Column labels, in order.
    fn columns(&self) -> &[String];

    /// Advances to the next row. Returns `false` once the rows are exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Reads a column of the current row as reported by the driver.
    fn get_value(&mut self, column: Column<'_>) -> Result<Value>;

    /// Returns `true` if the last column read was SQL null.
    fn was_null(&self) -> bool;

    /// Resolves a column to its 0-based position.
    fn column_index(&self, column: Column<'_>) -> Result<usize> {
        let columns = self.columns();
        match column {
            Column::Name(name) => columns
                .iter()
                .position(|label| label.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    Error::database_message(format!("column '{name}' not found in result set"))
                }),
            Column::Index(index) if index < columns.len() => Ok(index),
            Column::Index(index) => Err(Error::database_message(format!(
                "column index {index} out of range; result set has {} columns",
                columns.len()
            ))),
        }
    }

    fn get_bool(&mut self, column: Column<'_>) -> Result<bool> {
        convert::to_bool(&self.get_value(column)?)
    }

    fn get_i32(&mut self, column: Column<'_>) -> Result<i32> {
        convert::to_i32(&self.get_value(column)?)
    }

    fn get_i64(&mut self, column: Column<'_>) -> Result<i64> {
        convert::to_i64(&self.get_value(column)?)
    }

    fn get_f64(&mut self, column: Column<'_>) -> Result<f64> {
        convert::to_f64(&self.get_value(column)?)
    }

    fn get_string(&mut self, column: Column<'_>) -> Result<Option<String>> {
        convert::to_string(&self.get_value(column)?)
    }

    fn get_bytes(&mut self, column: Column<'_>) -> Result<Option<Vec<u8>>> {
        convert::to_bytes(&self.get_value(column)?)
    }

    fn get_timestamp(&mut self, column: Column<'_>) -> Result<Option<NaiveDateTime>> {
        convert::to_timestamp(&self.get_value(column)?)
    }

    fn get_object(&mut self, column: Column<'_>) -> Result<Value> {
        self.get_value(column)
    }
}
