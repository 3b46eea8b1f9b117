use super::{read_primitive, ResultMapping};
use crate::{RequestScope, Result};

use indexmap::IndexMap;

/// Picks a sub-map by the value of one column.
#[derive(Debug, Clone)]
pub struct Discriminator {
    mapping: ResultMapping,
    sub_maps: IndexMap<String, String>,
}

impl Discriminator {
    pub fn new(mapping: ResultMapping) -> Discriminator {
        Discriminator {
            mapping,
            sub_maps: IndexMap::new(),
        }
    }

    /// Routes rows whose column reads as `value` to the result map `result_map`.
    pub fn sub_map(mut self, value: impl Into<String>, result_map: impl Into<String>) -> Self {
        self.sub_maps.insert(value.into(), result_map.into());
        self
    }

    pub fn mapping(&self) -> &ResultMapping {
        &self.mapping
    }

    pub fn sub_map_id(&self, value: &str) -> Option<&str> {
        self.sub_maps.get(value).map(String::as_str)
    }

    pub fn sub_maps(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sub_maps
            .iter()
            .map(|(value, id)| (value.as_str(), id.as_str()))
    }

    /// Reads the discriminating column of the current row as a string.
    pub fn value(&self, request: &mut RequestScope) -> Result<String> {
        Ok(read_primitive(request, &self.mapping)?.to_string())
    }

    pub(crate) fn mapping_mut(&mut self) -> &mut ResultMapping {
        &mut self.mapping
    }

    pub(crate) fn sub_map_ids_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.sub_maps.values_mut()
    }
}
