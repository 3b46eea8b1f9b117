mod nested;
mod nested_select;

use super::{read_primitive, Discriminator, ResultMapping, Route};
use crate::{
    exchange::{self, DataExchange},
    stmt::{Type, Value},
    Error, RequestScope, Result,
};

use indexmap::IndexSet;
use std::{
    fmt::Write,
    future::Future,
    pin::Pin,
    sync::{Arc, OnceLock},
};
use tracing::{trace, warn};

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Describes how rows become objects of one shape.
///
/// A result map is immutable once its catalog is built and is shared by every
/// request. Everything a request learns while reading rows lives in its
/// [`RequestScope`].
#[derive(Debug)]
pub struct ResultMap {
    id: String,
    resource: Option<String>,
    result_class: Option<Type>,
    xml_name: Option<String>,
    mappings: Mappings,
    remappable: bool,
    discriminator: Option<Discriminator>,
    group_by: IndexSet<String>,
    exchange: Arc<dyn DataExchange>,
}

#[derive(Debug)]
enum Mappings {
    /// Declared with the map
    Declared(Arc<[ResultMapping]>),

    /// Derived from the columns of the first row set read with the map
    Auto(OnceLock<Arc<[ResultMapping]>>),
}

#[derive(Debug)]
pub struct ResultMapBuilder {
    map: ResultMap,
    mappings: Vec<ResultMapping>,
}

impl ResultMap {
    pub fn builder(id: impl Into<String>) -> ResultMapBuilder {
        ResultMapBuilder {
            map: ResultMap {
                id: id.into(),
                resource: None,
                result_class: None,
                xml_name: None,
                mappings: Mappings::Declared(Arc::from(Vec::new())),
                remappable: false,
                discriminator: None,
                group_by: IndexSet::new(),
                exchange: exchange::for_type(None),
            },
            mappings: vec![],
        }
    }

    /// A map whose mappings come from the row set columns.
    pub(crate) fn auto(id: String, result_class: Type, remappable: bool) -> ResultMap {
        ResultMap {
            id,
            resource: None,
            exchange: exchange::for_type(Some(&result_class)),
            result_class: Some(result_class),
            xml_name: None,
            mappings: Mappings::Auto(OnceLock::new()),
            remappable,
            discriminator: None,
            group_by: IndexSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn result_class(&self) -> Option<&Type> {
        self.result_class.as_ref()
    }

    pub fn xml_name(&self) -> Option<&str> {
        self.xml_name.as_deref()
    }

    pub fn is_remappable(&self) -> bool {
        self.remappable
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.mappings, Mappings::Auto(_))
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    pub fn group_by(&self) -> &IndexSet<String> {
        &self.group_by
    }

    pub fn exchange(&self) -> &Arc<dyn DataExchange> {
        &self.exchange
    }

    /// The declared mappings. Auto maps report the mappings derived so far.
    pub fn declared_mappings(&self) -> Arc<[ResultMapping]> {
        match &self.mappings {
            Mappings::Declared(mappings) => mappings.clone(),
            Mappings::Auto(cell) => cell.get().cloned().unwrap_or_else(|| Arc::from(Vec::new())),
        }
    }

    /// The mappings in effect for `request`.
    ///
    /// A remappable map prefers the mappings installed in the request, so
    /// concurrent requests may each read the map with different mappings.
    pub fn mappings(&self, request: &RequestScope) -> Arc<[ResultMapping]> {
        if self.remappable {
            if let Some(mappings) = request.mappings(&self.id) {
                return mappings.clone();
            }
        }
        self.declared_mappings()
    }

    /// Installs `mappings` for this map for the rest of `request`.
    pub fn set_remapped_mappings(
        &self,
        request: &mut RequestScope,
        mappings: Arc<[ResultMapping]>,
    ) -> Result<()> {
        if !self.remappable {
            return Err(Error::configuration(format!(
                "result map {} is not remappable",
                self.id
            )));
        }
        request.set_mappings(&self.id, mappings);
        Ok(())
    }

    /// Fixes the mappings of an auto map on first use.
    pub(crate) fn init_auto_mappings(
        &self,
        f: impl FnOnce() -> Result<Arc<[ResultMapping]>>,
    ) -> Result<()> {
        if let Mappings::Auto(cell) = &self.mappings {
            if cell.get().is_none() {
                let mappings = f()?;
                let _ = cell.set(mappings);
            }
        }
        Ok(())
    }

    /// The group key of a row: each group-by property's value followed by
    /// `-`, in mapping order. `None` when the map has no group-by.
    pub fn unique_key(&self, mappings: &[ResultMapping], values: &[Value]) -> Option<String> {
        if self.group_by.is_empty() {
            return None;
        }

        let mut key = String::new();
        for (mapping, value) in mappings.iter().zip(values) {
            if self.group_by.contains(mapping.property()) {
                let _ = write!(key, "{value}-");
            }
        }

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Follows the discriminator to the map that applies to the current row.
    ///
    /// A value with no sub-map, a sub-map equal to the current map, or a
    /// sub-map already visited for this row ends resolution at the current map.
    pub fn resolve_sub_map(self: &Arc<Self>, request: &mut RequestScope) -> Result<Arc<ResultMap>> {
        let catalog = request.catalog().clone();
        let mut current = self.clone();
        let mut visited: Vec<String> = vec![];

        loop {
            let Some(discriminator) = current.discriminator() else {
                return Ok(current);
            };

            let value = discriminator.value(request)?;

            let Some(sub_map_id) = discriminator.sub_map_id(&value) else {
                warn!(
                    result_map = %current.id,
                    %value, "no sub-map for discriminator value; using the base map"
                );
                return Ok(current);
            };

            if sub_map_id == current.id || visited.iter().any(|id| id == sub_map_id) {
                return Ok(current);
            }

            let sub_map = catalog.result_map(sub_map_id)?;
            visited.push(current.id.clone());
            current = sub_map;
        }
    }

    /// Reads the values of the current row, one per mapping.
    ///
    /// Nested selects run here; nested result maps read as `Null` and are
    /// assembled by [`ResultMap::set_result_object_values`]. Whether any
    /// value was non-null is recorded as the request's `row_data_found`.
    pub fn get_results<'a>(&'a self, request: &'a mut RequestScope) -> BoxFuture<'a, Result<Vec<Value>>> {
        Box::pin(async move {
            let cx = request.error_context_mut();
            cx.set_activity("applying a result map");
            cx.set_object_id(&self.id);
            cx.set_resource(self.resource.as_deref());
            cx.set_more_info("Check the result map.");

            let mappings = self.mappings(request);
            let mut values = Vec::with_capacity(mappings.len());
            let mut found_data = false;

            for mapping in mappings.iter() {
                request
                    .error_context_mut()
                    .set_more_info(mapping.error_string());

                let value = match mapping.route() {
                    Route::NestedSelect { statement } => {
                        self.nested_select_value(request, mapping, statement).await?
                    }
                    Route::NestedResultMap { .. } => Value::Null,
                    Route::Primitive => read_primitive(request, mapping)?,
                };

                found_data |= !value.is_null();
                values.push(value);
            }

            request.set_row_data_found(found_data);
            Ok(values)
        })
    }

    /// Turns the values of a row into a result object.
    ///
    /// Returns `None` when the row belongs to an object already produced in
    /// this request (same group key); its nested elements are appended to
    /// that object instead. `target`, when given, is populated in place of
    /// a new object.
    pub fn set_result_object_values<'a>(
        &'a self,
        request: &'a mut RequestScope,
        target: Option<Value>,
        values: Vec<Value>,
    ) -> BoxFuture<'a, Result<Option<Value>>> {
        Box::pin(async move {
            let catalog = request.catalog().clone();
            let mappings = self.mappings(request);
            let key = self.unique_key(&mappings, &values);

            if let Some(key) = &key {
                if request.is_assembling(&self.id, key) {
                    return Ok(None);
                }

                if let Some(existing) = request.identity().get(&self.id, key).cloned() {
                    trace!(result_map = %self.id, %key, "appending to an object already produced");
                    self.assemble_nested(request, &mappings, &existing, Some(key))
                        .await?;
                    return Ok(None);
                }
            }

            let object =
                self.exchange
                    .set_data(&**catalog.probe(), self, &mappings, target, &values)?;

            if let Some(key) = &key {
                request
                    .identity_mut()
                    .insert(&self.id, key.clone(), object.clone());
            }

            self.assemble_nested(request, &mappings, &object, key.as_deref())
                .await?;

            Ok(Some(object))
        })
    }
}

impl ResultMapBuilder {
    pub fn resource(&mut self, resource: impl Into<String>) -> &mut Self {
        self.map.resource = Some(resource.into());
        self
    }

    pub fn result_class(&mut self, ty: Type) -> &mut Self {
        self.map.exchange = exchange::for_type(Some(&ty));
        self.map.result_class = Some(ty);
        self
    }

    /// Name of the root element of DOM results.
    pub fn xml_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.map.xml_name = Some(name.into());
        self
    }

    pub fn mapping(&mut self, mapping: ResultMapping) -> &mut Self {
        self.mappings.push(mapping);
        self
    }

    pub fn remappable(&mut self, remappable: bool) -> &mut Self {
        self.map.remappable = remappable;
        self
    }

    pub fn group_by(&mut self, property: impl Into<String>) -> &mut Self {
        self.map.group_by.insert(property.into());
        self
    }

    pub fn discriminator(&mut self, discriminator: Discriminator) -> Result<&mut Self> {
        if self.map.discriminator.is_some() {
            return Err(Error::configuration(
                "A discriminator may only be set once per result map.",
            ));
        }
        self.map.discriminator = Some(discriminator);
        Ok(self)
    }

    pub fn build(&mut self) -> ResultMap {
        ResultMap {
            id: self.map.id.clone(),
            resource: self.map.resource.clone(),
            result_class: self.map.result_class.clone(),
            xml_name: self.map.xml_name.clone(),
            mappings: Mappings::Declared(Arc::from(self.mappings.clone())),
            remappable: self.map.remappable,
            discriminator: self.map.discriminator.clone(),
            group_by: self.map.group_by.clone(),
            exchange: self.map.exchange.clone(),
        }
    }
}

/// Load-time access used by the catalog builder.
impl ResultMap {
    pub(crate) fn edit_mappings(
        &mut self,
        mut f: impl FnMut(&mut ResultMapping) -> Result<()>,
    ) -> Result<()> {
        if let Mappings::Declared(mappings) = &mut self.mappings {
            let mut edited = mappings.to_vec();
            for mapping in &mut edited {
                f(mapping)?;
            }
            *mappings = Arc::from(edited);
        }

        if let Some(discriminator) = &mut self.discriminator {
            f(discriminator.mapping_mut())?;
        }

        Ok(())
    }

    pub(crate) fn discriminator_mut(&mut self) -> Option<&mut Discriminator> {
        self.discriminator.as_mut()
    }
}
