//! Property accessors.
//!
//! A [`Probe`] reads and writes named properties of host objects. Paths are
//! dotted (`address.city`); intermediate objects that are missing on a write
//! are instantiated from the declared type of the property, or as a map when
//! nothing is declared.

mod bean;
pub use bean::BeanProbe;

mod dom;
pub use dom::DomProbe;

mod map;
pub use map::MapProbe;

use crate::{
    stmt::{Object, ObjectData, Type, Value},
    Error, Result,
};

use std::fmt::Debug;

pub trait Probe: Debug + Send + Sync + 'static {
    /// Reads the property at `path`. Missing intermediate objects read as `Null`.
    fn get(&self, object: &Value, path: &str) -> Result<Value>;

    /// Writes the property at `path`.
    fn set(&self, object: &Value, path: &str, value: Value) -> Result<()>;

    /// The type a value must have to be stored at `path`.
    fn type_for_setter(&self, object: &Value, path: &str) -> Result<Type>;

    /// Mutates the property at `path` in place.
    ///
    /// Used to grow collection properties without copying them on every row.
    fn update(
        &self,
        object: &Value,
        path: &str,
        f: &mut dyn FnMut(&mut Value) -> Result<()>,
    ) -> Result<()>;
}

/// Dispatches on the kind of the root object.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericProbe;

impl GenericProbe {
    fn probe_for(object: &Value) -> Result<&'static dyn Probe> {
        let object = as_object(object, "")?;
        Ok(object.with(|data| -> &'static dyn Probe {
            match data {
                ObjectData::Map(_) => &MapProbe,
                ObjectData::Bean(_) => &BeanProbe,
                ObjectData::Dom(_) => &DomProbe,
            }
        }))
    }
}

impl Probe for GenericProbe {
    fn get(&self, object: &Value, path: &str) -> Result<Value> {
        Self::probe_for(object)?.get(object, path)
    }

    fn set(&self, object: &Value, path: &str, value: Value) -> Result<()> {
        Self::probe_for(object)?.set(object, path, value)
    }

    fn type_for_setter(&self, object: &Value, path: &str) -> Result<Type> {
        Self::probe_for(object)?.type_for_setter(object, path)
    }

    fn update(
        &self,
        object: &Value,
        path: &str,
        f: &mut dyn FnMut(&mut Value) -> Result<()>,
    ) -> Result<()> {
        Self::probe_for(object)?.update(object, path, f)
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object> {
    value.as_object().ok_or_else(|| {
        Error::configuration(format!(
            "cannot access property '{path}' on a {} value",
            value.variant_name()
        ))
    })
}

/// Walks `path` to the object owning its last step.
///
/// Returns that object and the remaining path. DOM objects take the rest of
/// the path as is, since they resolve dotted paths themselves. When `create`
/// is false a missing intermediate object ends the walk with `None`.
fn walk<'p>(root: &Object, path: &'p str, create: bool) -> Result<Option<(Object, &'p str)>> {
    let mut current = root.clone();
    let mut rest = path;

    while let Some((step, tail)) = rest.split_once('.') {
        if current.is_dom() {
            break;
        }

        let next = match current.get(step)? {
            Value::Object(object) => object,
            Value::Null if create => {
                let ty = match setter_type(&current, step)? {
                    Type::Object => Type::Map,
                    ty => ty,
                };
                let child = ty.instantiate()?;
                current.set(step, child.clone())?;
                as_object(&child, step)?.clone()
            }
            Value::Null => return Ok(None),
            other => {
                return Err(Error::configuration(format!(
                    "cannot access property '{tail}' through '{step}', which holds a {} value",
                    other.variant_name()
                )))
            }
        };

        current = next;
        rest = tail;
    }

    Ok(Some((current, rest)))
}

fn setter_type(object: &Object, name: &str) -> Result<Type> {
    object.with(|data| match data {
        ObjectData::Map(_) => Ok(Type::Object),
        ObjectData::Bean(bean) => bean.ty().property_type(name).cloned().ok_or_else(|| {
            Error::configuration(format!(
                "There is no WRITEABLE property named '{}' in bean type '{}'",
                name,
                bean.ty().name()
            ))
        }),
        ObjectData::Dom(_) => Ok(Type::Object),
    })
}

fn get_path(object: &Value, path: &str) -> Result<Value> {
    match walk(as_object(object, path)?, path, false)? {
        Some((owner, name)) => owner.get(name),
        None => Ok(Value::Null),
    }
}

fn set_path(object: &Value, path: &str, value: Value) -> Result<()> {
    match walk(as_object(object, path)?, path, true)? {
        Some((owner, name)) => owner.set(name, value),
        None => Ok(()),
    }
}

fn setter_type_path(object: &Value, path: &str) -> Result<Type> {
    let root = as_object(object, path)?;
    match walk(root, path, false)? {
        Some((owner, name)) => setter_type(&owner, name),
        // The intermediate object does not exist yet; the property could
        // hold anything once it does.
        None => Ok(Type::Object),
    }
}

fn update_path(
    object: &Value,
    path: &str,
    f: &mut dyn FnMut(&mut Value) -> Result<()>,
) -> Result<()> {
    let Some((owner, name)) = walk(as_object(object, path)?, path, true)? else {
        return Ok(());
    };

    owner.with_mut(|data| match data {
        ObjectData::Map(map) => f(map.entry(name.to_string()).or_default()),
        ObjectData::Bean(bean) => f(bean.get_mut(name)?),
        ObjectData::Dom(node) => {
            let mut appended = Value::Null;
            f(&mut appended)?;
            node.append_value(name, appended);
            Ok(())
        }
    })
}
