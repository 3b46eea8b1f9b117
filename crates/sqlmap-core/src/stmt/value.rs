use super::*;
use crate::{Error, Result};

use chrono::NaiveDateTime;

/// A host value: what a column is coerced into, and what result maps build.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// 64-bit float
    F64(f64),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// A value loaded on first access by a nested select
    Lazy(Lazy),

    /// An ordered, growable collection
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// A shared host object: associative map, bean, or DOM node
    Object(Object),

    /// A fixed-position array
    Record(ValueRecord),

    /// A collection of distinct values
    Set(ValueSet),

    /// String value
    String(String),

    /// SQL timestamp without a time zone
    Timestamp(NaiveDateTime),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }

    /// Builds a `Value::Object` holding an empty associative map.
    pub fn map() -> Self {
        Self::Object(Object::map())
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    /// The name of the variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Bytes(_) => "Bytes",
            Self::F64(_) => "F64",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::Lazy(_) => "Lazy",
            Self::List(_) => "List",
            Self::Null => "Null",
            Self::Object(_) => "Object",
            Self::Record(_) => "Record",
            Self::Set(_) => "Set",
            Self::String(_) => "String",
            Self::Timestamp(_) => "Timestamp",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_object(&self) -> &Object {
        match self {
            Self::Object(object) => object,
            _ => panic!("expected Value::Object; actual={self:#?}"),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_list(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            _ => panic!("expected Value::List; actual={self:#?}"),
        }
    }

    pub fn as_lazy(&self) -> Option<&Lazy> {
        match self {
            Self::Lazy(lazy) => Some(lazy),
            _ => None,
        }
    }

    /// Adds `item` to a collection value.
    pub fn push(&mut self, item: Value) -> Result<()> {
        match self {
            Self::List(items) => items.push(item),
            Self::Set(items) => {
                items.insert(item);
            }
            Self::Record(record) => record.fields.push(item),
            _ => {
                return Err(Error::configuration(format!(
                    "cannot add an element to a {} value",
                    self.variant_name()
                )))
            }
        }
        Ok(())
    }

    /// Number of elements when the value is a collection.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::Set(items) => Some(items.len()),
            Self::Record(record) => Some(record.len()),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        fn items<'a>(
            f: &mut core::fmt::Formatter,
            items: impl Iterator<Item = &'a Value>,
        ) -> core::fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                core::fmt::Display::fmt(item, f)?;
            }
            f.write_str("]")
        }

        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "{v:?}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Lazy(v) => match v.peek() {
                Some(value) => core::fmt::Display::fmt(value, f),
                None => f.write_str("<unloaded>"),
            },
            Self::List(v) => items(f, v.iter()),
            Self::Null => f.write_str("null"),
            Self::Object(v) => core::fmt::Display::fmt(v, f),
            Self::Record(v) => items(f, v.iter()),
            Self::Set(v) => items(f, v.iter()),
            Self::String(v) => f.write_str(v),
            Self::Timestamp(v) => write!(f, "{v}"),
        }
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

macro_rules! impl_scalar_conversions {
    ($ty:ty, $name:ident, $lit:literal) => {
        impl From<$ty> for Value {
            fn from(src: $ty) -> Self {
                Self::$name(src)
            }
        }

        impl TryFrom<Value> for $ty {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self> {
                match value {
                    Value::$name(v) => Ok(v),
                    _ => Err(Error::type_conversion(value, $lit)),
                }
            }
        }
    };
}

impl_scalar_conversions!(bool, Bool, "bool");
impl_scalar_conversions!(i32, I32, "i32");
impl_scalar_conversions!(i64, I64, "i64");
impl_scalar_conversions!(f64, F64, "f64");
impl_scalar_conversions!(String, String, "String");
impl_scalar_conversions!(Vec<u8>, Bytes, "Vec<u8>");

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<ValueRecord> for Value {
    fn from(value: ValueRecord) -> Self {
        Self::Record(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Self::Set(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<DomNode> for Value {
    fn from(value: DomNode) -> Self {
        Self::Object(Object::dom(value))
    }
}

impl From<Lazy> for Value {
    fn from(value: Lazy) -> Self {
        Self::Lazy(value)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
