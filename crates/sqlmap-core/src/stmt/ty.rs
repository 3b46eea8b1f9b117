use super::*;
use crate::{Error, Result};

use std::sync::Arc;

/// A host type: the declared type of a property, a result class, or a
/// parameter class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit float
    F64,

    /// String type
    String,

    /// Raw bytes
    Bytes,

    /// SQL timestamp without a time zone
    Timestamp,

    /// Any value. Reads through the unknown type handler.
    Object,

    /// Generic associative container
    Map,

    /// Instance of a declared bean type
    Bean(Arc<BeanType>),

    /// DOM node
    Dom,

    /// A list of DOM nodes
    DomCollection,

    /// Fixed-position array
    Record,

    /// Ordered, growable collection
    List,

    /// Collection of distinct values
    Set,

    /// Abstract collection; instantiated as a list
    Collection,
}

impl Type {
    /// The name the type handler registry uses for this type.
    pub fn name(&self) -> &str {
        match self {
            Type::Bool => "bool",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "string",
            Type::Bytes => "bytes",
            Type::Timestamp => "timestamp",
            Type::Object => "object",
            Type::Map => "map",
            Type::Bean(bean) => bean.name(),
            Type::Dom => "dom",
            Type::DomCollection => "dom-collection",
            Type::Record => "record",
            Type::List => "list",
            Type::Set => "set",
            Type::Collection => "collection",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Bool
                | Type::I32
                | Type::I64
                | Type::F64
                | Type::String
                | Type::Bytes
                | Type::Timestamp
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Type::List | Type::Set | Type::Collection | Type::DomCollection
        )
    }

    pub fn is_dom(&self) -> bool {
        matches!(self, Type::Dom | Type::DomCollection)
    }

    pub fn is_bean(&self) -> bool {
        matches!(self, Type::Bean(_))
    }

    /// Default-constructs a value of this type.
    ///
    /// `Object` instantiates as an associative map and DOM values as an
    /// empty `result` element. Scalar types cannot be instantiated.
    pub fn instantiate(&self) -> Result<Value> {
        Ok(match self {
            Type::Object | Type::Map => Value::Object(Object::map()),
            Type::Bean(bean) => Value::Object(Object::bean(bean)),
            Type::Dom => Value::Object(Object::dom(DomNode::element("result"))),
            Type::Record => Value::Record(ValueRecord::default()),
            Type::List | Type::Collection | Type::DomCollection => Value::List(vec![]),
            Type::Set => Value::Set(ValueSet::new()),
            _ => {
                return Err(Error::configuration(format!(
                    "cannot instantiate an object of type {}",
                    self.name()
                )))
            }
        })
    }

    /// Creates the container for a nested collection property.
    ///
    /// `ty` is the declared type of the property, if any. Undeclared and
    /// abstract containers become lists, sets stay sets; any other type is
    /// default-constructed if it is a container at all.
    pub fn new_collection(ty: Option<&Type>, property: &str) -> Result<Value> {
        match ty {
            None | Some(Type::Object | Type::List | Type::Collection | Type::DomCollection) => {
                Ok(Value::List(vec![]))
            }
            Some(Type::Set) => Ok(Value::Set(ValueSet::new())),
            Some(Type::Record) => Ok(Value::Record(ValueRecord::default())),
            Some(_) => Err(Error::configuration(format!(
                "Error instantiating collection property for mapping '{property}'. \
                 The declared type is not a collection."
            ))),
        }
    }

    /// Converts `value` so it can be stored in a property of this type.
    ///
    /// Null passes through. Integers widen and narrow when the value fits;
    /// scalars convert to strings through their display form.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        Ok(match (value, self) {
            (value @ Value::Bool(_), Type::Bool) => value,
            (value @ Value::I32(_), Type::I32) => value,
            (value @ Value::I64(_), Type::I64) => value,
            (value @ Value::F64(_), Type::F64) => value,
            (value @ Value::String(_), Type::String) => value,
            (value @ Value::Bytes(_), Type::Bytes) => value,
            (value @ Value::Timestamp(_), Type::Timestamp) => value,
            (Value::I32(v), Type::I64) => Value::I64(v.into()),
            (Value::I64(v), Type::I32) => match i32::try_from(v) {
                Ok(v) => Value::I32(v),
                Err(_) => return Err(Error::type_conversion(Value::I64(v), "i32")),
            },
            (Value::I32(v), Type::F64) => Value::F64(v.into()),
            (Value::I64(v), Type::F64) => Value::F64(v as f64),
            (
                value @ (Value::Bool(_)
                | Value::I32(_)
                | Value::I64(_)
                | Value::F64(_)
                | Value::Timestamp(_)),
                Type::String,
            ) => Value::String(value.to_string()),
            (value, ty) if !ty.is_scalar() => value,
            (value, ty) => return Err(Error::type_conversion(value, ty.static_name())),
        })
    }

    fn static_name(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "String",
            Type::Bytes => "Vec<u8>",
            Type::Timestamp => "NaiveDateTime",
            _ => "object",
        }
    }
}
