//! Conversions from the raw values a driver reports to the typed values the
//! row-set getters return.
//!
//! Drivers report whatever their storage holds (SQLite returns every integer
//! as `I64`, every date as text), so each getter accepts the storage forms
//! that can represent its type.

use crate::{stmt::Value, Error, Result};

use chrono::NaiveDateTime;

/// Timestamp layouts accepted when a driver reports a timestamp as text.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

pub fn to_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(v) => Ok(*v),
        Value::I32(v) => Ok(*v != 0),
        Value::I64(v) => Ok(*v != 0),
        Value::String(v) => match v.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(Error::parse(v.as_str(), "a boolean")),
        },
        _ => Err(Error::type_conversion(value.clone(), "bool")),
    }
}

pub fn to_i32(value: &Value) -> Result<i32> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(v) => Ok(*v as i32),
        Value::I32(v) => Ok(*v),
        Value::I64(v) => i32::try_from(*v).map_err(|_| Error::type_conversion(value.clone(), "i32")),
        Value::F64(v) => Ok(*v as i32),
        Value::String(v) => Ok(v.trim().parse()?),
        _ => Err(Error::type_conversion(value.clone(), "i32")),
    }
}

pub fn to_i64(value: &Value) -> Result<i64> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(v) => Ok(*v as i64),
        Value::I32(v) => Ok((*v).into()),
        Value::I64(v) => Ok(*v),
        Value::F64(v) => Ok(*v as i64),
        Value::String(v) => Ok(v.trim().parse()?),
        _ => Err(Error::type_conversion(value.clone(), "i64")),
    }
}

pub fn to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Null => Ok(0.0),
        Value::I32(v) => Ok((*v).into()),
        Value::I64(v) => Ok(*v as f64),
        Value::F64(v) => Ok(*v),
        Value::String(v) => Ok(v.trim().parse()?),
        _ => Err(Error::type_conversion(value.clone(), "f64")),
    }
}

pub fn to_string(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(v) => Ok(Some(v.clone())),
        Value::Bytes(v) => String::from_utf8(v.clone())
            .map(Some)
            .map_err(|_| Error::type_conversion(value.clone(), "String")),
        Value::Bool(_) | Value::I32(_) | Value::I64(_) | Value::F64(_) | Value::Timestamp(_) => {
            Ok(Some(value.to_string()))
        }
        _ => Err(Error::type_conversion(value.clone(), "String")),
    }
}

pub fn to_bytes(value: &Value) -> Result<Option<Vec<u8>>> {
    match value {
        Value::Null => Ok(None),
        Value::Bytes(v) => Ok(Some(v.clone())),
        Value::String(v) => Ok(Some(v.clone().into_bytes())),
        _ => Err(Error::type_conversion(value.clone(), "Vec<u8>")),
    }
}

pub fn to_timestamp(value: &Value) -> Result<Option<NaiveDateTime>> {
    match value {
        Value::Null => Ok(None),
        Value::Timestamp(v) => Ok(Some(*v)),
        Value::I64(secs) => chrono::DateTime::from_timestamp(*secs, 0)
            .map(|ts| Some(ts.naive_utc()))
            .ok_or_else(|| Error::type_conversion(value.clone(), "NaiveDateTime")),
        Value::String(v) => TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(v, format).ok())
            .map(Some)
            .ok_or_else(|| Error::parse(v.as_str(), "a timestamp")),
        _ => Err(Error::type_conversion(value.clone(), "NaiveDateTime")),
    }
}
