use super::convert;
use crate::{stmt::Value, Error, Result};

use chrono::NaiveDateTime;

/// Output parameters of a procedure call, addressed by 0-based parameter
/// position. Positions the call did not report read as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutParams {
    values: Vec<Value>,
    was_null: bool,
}

impl OutParams {
    pub fn new() -> OutParams {
        OutParams::default()
    }

    pub fn from_vec(values: Vec<Value>) -> OutParams {
        OutParams {
            values,
            was_null: false,
        }
    }

    pub fn set(&mut self, index: usize, value: Value) {
        if self.values.len() <= index {
            self.values.resize(index + 1, Value::Null);
        }
        self.values[index] = value;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_value(&mut self, index: usize) -> Result<Value> {
        let value = self.values.get(index).cloned().ok_or_else(|| {
            Error::database_message(format!("no output parameter at position {index}"))
        })?;
        self.was_null = value.is_null();
        Ok(value)
    }

    pub fn was_null(&self) -> bool {
        self.was_null
    }

    pub fn get_bool(&mut self, index: usize) -> Result<bool> {
        convert::to_bool(&self.get_value(index)?)
    }

    pub fn get_i32(&mut self, index: usize) -> Result<i32> {
        convert::to_i32(&self.get_value(index)?)
    }

    pub fn get_i64(&mut self, index: usize) -> Result<i64> {
        convert::to_i64(&self.get_value(index)?)
    }

    pub fn get_f64(&mut self, index: usize) -> Result<f64> {
        convert::to_f64(&self.get_value(index)?)
    }

    pub fn get_string(&mut self, index: usize) -> Result<Option<String>> {
        convert::to_string(&self.get_value(index)?)
    }

    pub fn get_bytes(&mut self, index: usize) -> Result<Option<Vec<u8>>> {
        convert::to_bytes(&self.get_value(index)?)
    }

    pub fn get_timestamp(&mut self, index: usize) -> Result<Option<NaiveDateTime>> {
        convert::to_timestamp(&self.get_value(index)?)
    }

    pub fn get_object(&mut self, index: usize) -> Result<Value> {
        self.get_value(index)
    }
}
