use super::*;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// A declared record type with named, typed properties.
///
/// Bean types stand in for user-defined classes: result maps instantiate
/// them, and the bean probe consults them to find the declared type of a
/// property before coercing a value into it.
#[derive(Debug, PartialEq, Eq)]
pub struct BeanType {
    name: String,
    properties: IndexMap<String, Type>,
}

#[derive(Debug)]
pub struct BeanTypeBuilder {
    name: String,
    properties: IndexMap<String, Type>,
}

/// An instance of a [`BeanType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bean {
    ty: Arc<BeanType>,
    fields: Vec<Value>,
}

impl BeanType {
    pub fn builder(name: impl Into<String>) -> BeanTypeBuilder {
        BeanTypeBuilder {
            name: name.into(),
            properties: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of a top-level property.
    pub fn property_type(&self, name: &str) -> Option<&Type> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.properties.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Finds a property by name, ignoring ASCII case. Used to match column
    /// labels to properties.
    pub fn find_property(&self, name: &str) -> Option<&str> {
        self.properties
            .keys()
            .find(|property| property.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.properties.get_index_of(name).ok_or_else(|| {
            Error::configuration(format!(
                "There is no property named '{}' in bean type '{}'",
                name, self.name
            ))
        })
    }
}

impl BeanTypeBuilder {
    pub fn property(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    pub fn build(self) -> Arc<BeanType> {
        Arc::new(BeanType {
            name: self.name,
            properties: self.properties,
        })
    }
}

impl Bean {
    pub fn new(ty: Arc<BeanType>) -> Bean {
        let fields = vec![Value::Null; ty.properties.len()];
        Bean { ty, fields }
    }

    pub fn ty(&self) -> &Arc<BeanType> {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self.ty.index_of(name)?;
        Ok(&self.fields[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value> {
        let index = self.ty.index_of(name)?;
        Ok(&mut self.fields[index])
    }

    /// Writes a property, converting `value` to the property's declared type.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = self.ty.index_of(name)?;
        let value = self.ty.properties[index].cast(value)?;
        self.fields[index] = value;
        Ok(())
    }
}

impl core::fmt::Display for Bean {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}{{", self.ty.name)?;
        for (i, (name, value)) in self.ty.properties.keys().zip(&self.fields).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
