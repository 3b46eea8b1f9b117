use super::*;
use crate::Result;

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Property name to value, in insertion order.
pub type ValueMap = IndexMap<String, Value>;

/// A shared, mutable host object.
///
/// Result maps emit an object on the first row of a group and keep adding
/// nested elements to it on later rows, so every clone of an `Object` refers
/// to the same underlying data. Equality compares contents.
#[derive(Clone)]
pub struct Object {
    inner: Arc<Mutex<ObjectData>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    /// Generic associative container
    Map(ValueMap),

    /// Instance of a declared bean type
    Bean(Bean),

    /// DOM element
    Dom(DomNode),
}

impl Object {
    pub fn new(data: ObjectData) -> Object {
        Object {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    /// An empty associative map.
    pub fn map() -> Object {
        Object::new(ObjectData::Map(ValueMap::new()))
    }

    pub fn from_map(map: ValueMap) -> Object {
        Object::new(ObjectData::Map(map))
    }

    /// A bean of the given type with every property unset.
    pub fn bean(ty: &Arc<BeanType>) -> Object {
        Object::new(ObjectData::Bean(Bean::new(ty.clone())))
    }

    pub fn dom(node: DomNode) -> Object {
        Object::new(ObjectData::Dom(node))
    }

    pub fn is_map(&self) -> bool {
        self.with(|data| matches!(data, ObjectData::Map(_)))
    }

    pub fn is_bean(&self) -> bool {
        self.with(|data| matches!(data, ObjectData::Bean(_)))
    }

    pub fn is_dom(&self) -> bool {
        self.with(|data| matches!(data, ObjectData::Dom(_)))
    }

    /// The host type of this object.
    pub fn ty(&self) -> Type {
        self.with(|data| match data {
            ObjectData::Map(_) => Type::Map,
            ObjectData::Bean(bean) => Type::Bean(bean.ty().clone()),
            ObjectData::Dom(_) => Type::Dom,
        })
    }

    /// Runs `f` with shared access to the object's data.
    pub fn with<R>(&self, f: impl FnOnce(&ObjectData) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Runs `f` with exclusive access to the object's data.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ObjectData) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Reads a top-level property. Missing map keys and DOM children read as `Null`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.with(|data| match data {
            ObjectData::Map(map) => Ok(map.get(name).cloned().unwrap_or_default()),
            ObjectData::Bean(bean) => bean.get(name).cloned(),
            ObjectData::Dom(node) => Ok(node
                .find(name)
                .map(|child| Value::String(child.text_content()))
                .unwrap_or_default()),
        })
    }

    /// Writes a top-level property.
    pub fn set(&self, name: &str, value: Value) -> Result<()> {
        self.with_mut(|data| match data {
            ObjectData::Map(map) => {
                map.insert(name.to_string(), value);
                Ok(())
            }
            ObjectData::Bean(bean) => bean.set(name, value),
            ObjectData::Dom(node) => {
                node.set_value(name, value);
                Ok(())
            }
        })
    }

    /// Copies the object's current data.
    pub fn snapshot(&self) -> ObjectData {
        self.with(|data| data.clone())
    }

    /// Returns `true` if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let lhs = self.snapshot();
        other.with(|rhs| lhs == *rhs)
    }
}

impl core::fmt::Debug for Object {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.with(|data| core::fmt::Debug::fmt(data, f))
    }
}

impl core::fmt::Display for Object {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.with(|data| match data {
            ObjectData::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                f.write_str("}")
            }
            ObjectData::Bean(bean) => core::fmt::Display::fmt(bean, f),
            ObjectData::Dom(node) => core::fmt::Display::fmt(node, f),
        })
    }
}
