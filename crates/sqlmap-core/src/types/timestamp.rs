use super::TypeHandler;
use crate::{
    driver::{Column, OutParams, RowSet},
    stmt::{Type, Value},
    Error, Result,
};

use chrono::NaiveDateTime;

/// The only textual form `value_of` accepts.
const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// SQL timestamps as `chrono::NaiveDateTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlTimestampTypeHandler;

impl TypeHandler for SqlTimestampTypeHandler {
    fn ty(&self) -> Type {
        Type::Timestamp
    }

    fn get_result(&self, rs: &mut dyn RowSet, column: Column<'_>) -> Result<Value> {
        let value = rs.get_timestamp(column)?;
        Ok(if rs.was_null() {
            Value::Null
        } else {
            value.into()
        })
    }

    fn get_call_result(&self, cs: &mut OutParams, index: usize) -> Result<Value> {
        let value = cs.get_timestamp(index)?;
        Ok(if cs.was_null() {
            Value::Null
        } else {
            value.into()
        })
    }

    fn value_of(&self, s: &str) -> Result<Value> {
        NaiveDateTime::parse_from_str(s, DATE_FORMAT)
            .map(Value::Timestamp)
            .map_err(|_| {
                Error::parse(
                    s,
                    "a default null value date; the format must be 'yyyy/MM/dd hh:mm:ss'",
                )
            })
    }
}
