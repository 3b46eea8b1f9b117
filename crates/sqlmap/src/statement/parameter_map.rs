use crate::{
    driver::{OutParams, Params},
    exchange,
    mapping::property_type,
    probe::Probe,
    stmt::{Type, Value},
    types::{TypeHandler, TypeHandlerFactory},
    Error, Result,
};

use std::sync::Arc;

/// Ordered description of a statement's `?` placeholders.
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    id: String,
    mappings: Vec<ParameterMapping>,
}

/// Binds one property of the parameter object to one placeholder.
#[derive(Debug, Clone)]
pub struct ParameterMapping {
    property: String,
    ty: Option<Type>,
    jdbc_type: Option<String>,
    mode: ParameterMode,
    null_value: Option<String>,
    type_handler: Option<Arc<dyn TypeHandler>>,
}

/// Direction of a procedure parameter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

impl ParameterMode {
    pub fn is_output(self) -> bool {
        matches!(self, ParameterMode::Out | ParameterMode::InOut)
    }
}

impl ParameterMap {
    pub fn new(id: impl Into<String>) -> ParameterMap {
        ParameterMap {
            id: id.into(),
            mappings: vec![],
        }
    }

    pub fn parameter(mut self, mapping: ParameterMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mappings(&self) -> &[ParameterMapping] {
        &self.mappings
    }

    /// Output parameters as `(position, type)` pairs.
    pub fn outputs(&self) -> Vec<(usize, Type)> {
        self.mappings
            .iter()
            .enumerate()
            .filter(|(_, mapping)| mapping.mode.is_output())
            .map(|(index, mapping)| (index, mapping.ty.clone().unwrap_or(Type::Object)))
            .collect()
    }

    pub(crate) fn resolve(
        &mut self,
        factory: &TypeHandlerFactory,
        parameter_class: Option<&Type>,
    ) -> Result<()> {
        for mapping in &mut self.mappings {
            mapping.resolve(factory, parameter_class)?;
        }
        Ok(())
    }

    /// Reads each mapped property of `parameter` and binds it.
    ///
    /// A value equal to the mapping's parsed null sentinel is bound as SQL
    /// null; output-only parameters are bound as null.
    pub fn bind(&self, probe: &dyn Probe, parameter: &Value) -> Result<Params> {
        let values = exchange::for_value(parameter).get_data(probe, &self.mappings, parameter)?;
        let mut params = Params::new();

        for (index, (mapping, value)) in self.mappings.iter().zip(values).enumerate() {
            let jdbc_type = mapping.jdbc_type.as_deref();

            if mapping.mode == ParameterMode::Out {
                params.set_null(index, jdbc_type);
                continue;
            }

            let handler = mapping.handler_or_err()?;
            let value = match &mapping.null_value {
                Some(null_value) if handler.value_of(null_value)? == value => Value::Null,
                _ => value,
            };

            handler.set_parameter(&mut params, index, &value, jdbc_type)?;
        }

        Ok(params)
    }

    /// Copies the output parameters of a procedure call into `parameter`.
    /// Parameters that are not objects have nowhere to receive them.
    pub fn write_outputs(
        &self,
        probe: &dyn Probe,
        parameter: &Value,
        outputs: &mut OutParams,
    ) -> Result<()> {
        if !parameter.is_object() {
            return Ok(());
        }

        for (index, mapping) in self.mappings.iter().enumerate() {
            if mapping.mode.is_output() {
                let value = mapping.handler_or_err()?.get_call_result(outputs, index)?;
                probe.set(parameter, &mapping.property, value)?;
            }
        }

        Ok(())
    }
}

/// Binds a parameter for a statement without a parameter map: a scalar is
/// the single parameter, an array binds its elements, anything else binds
/// nothing.
pub(crate) fn bind_implicit(parameter: &Value) -> Params {
    match parameter {
        Value::Null | Value::Object(_) | Value::Lazy(_) => Params::new(),
        Value::Record(record) => Params::from_vec(record.fields.clone()),
        Value::List(items) => Params::from_vec(items.clone()),
        Value::Set(items) => Params::from_vec(items.iter().cloned().collect()),
        scalar => Params::from_vec(vec![scalar.clone()]),
    }
}

impl ParameterMapping {
    pub fn new(property: impl Into<String>) -> ParameterMapping {
        ParameterMapping {
            property: property.into(),
            ty: None,
            jdbc_type: None,
            mode: ParameterMode::In,
            null_value: None,
            type_handler: None,
        }
    }

    pub fn ty(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn jdbc_type(mut self, jdbc_type: impl Into<String>) -> Self {
        self.jdbc_type = Some(jdbc_type.into());
        self
    }

    pub fn mode(mut self, mode: ParameterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Values equal to this, once parsed, are bound as SQL null.
    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = Some(null_value.into());
        self
    }

    pub fn type_handler(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.type_handler = Some(handler);
        self
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn declared_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    pub fn parameter_mode(&self) -> ParameterMode {
        self.mode
    }

    pub fn handler(&self) -> Option<&Arc<dyn TypeHandler>> {
        self.type_handler.as_ref()
    }

    fn handler_or_err(&self) -> Result<&Arc<dyn TypeHandler>> {
        self.type_handler.as_ref().ok_or_else(|| {
            Error::configuration(format!(
                "No type handler could be found for the parameter '{}'.",
                self.property
            ))
        })
    }

    fn resolve(&mut self, factory: &TypeHandlerFactory, parameter_class: Option<&Type>) -> Result<()> {
        if self.type_handler.is_some() {
            return Ok(());
        }

        self.type_handler = match &self.ty {
            Some(ty) => Some(
                factory
                    .get_type_handler(ty, self.jdbc_type.as_deref())
                    .ok_or_else(|| {
                        Error::configuration(format!(
                            "No type handler could be found for the parameter '{}' of type {}.",
                            self.property,
                            ty.name()
                        ))
                    })?,
            ),
            None => {
                let from_class = match parameter_class {
                    Some(ty @ Type::Bean(_)) => property_type(ty, &self.property)
                        .ok()
                        .and_then(|ty| factory.get_type_handler(&ty, self.jdbc_type.as_deref())),
                    _ => None,
                };
                Some(from_class.unwrap_or_else(|| factory.unknown_type_handler()))
            }
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::GenericProbe;
    use crate::stmt::Object;

    fn resolved(map: ParameterMap) -> ParameterMap {
        let mut map = map;
        map.resolve(&TypeHandlerFactory::new(), None).unwrap();
        map
    }

    #[test]
    fn binds_properties_in_order() {
        let map = resolved(
            ParameterMap::new("orderParams")
                .parameter(ParameterMapping::new("id").ty(Type::I64))
                .parameter(ParameterMapping::new("code")),
        );

        let parameter = Value::Object(Object::map());
        GenericProbe.set(&parameter, "id", Value::I32(7)).unwrap();
        GenericProbe.set(&parameter, "code", Value::from("x")).unwrap();

        let params = map.bind(&GenericProbe, &parameter).unwrap();
        assert_eq!(
            params.into_values(),
            vec![Value::I64(7), Value::from("x")]
        );
    }

    #[test]
    fn null_sentinel_binds_null() {
        let map = resolved(
            ParameterMap::new("qtyParams")
                .parameter(ParameterMapping::new("qty").ty(Type::I32).null_value("-1")),
        );

        let params = map.bind(&GenericProbe, &Value::I32(-1)).unwrap();
        assert_eq!(params.into_values(), vec![Value::Null]);

        let params = map.bind(&GenericProbe, &Value::I32(3)).unwrap();
        assert_eq!(params.into_values(), vec![Value::I32(3)]);
    }

    #[test]
    fn implicit_binding() {
        assert_eq!(bind_implicit(&Value::I32(7)).into_values(), vec![Value::I32(7)]);
        assert!(bind_implicit(&Value::Null).is_empty());
        assert!(bind_implicit(&Value::map()).is_empty());
        assert_eq!(
            bind_implicit(&Value::record_from_vec(vec![Value::I32(1), Value::from("a")]))
                .into_values(),
            vec![Value::I32(1), Value::from("a")]
        );
    }

    #[test]
    fn outputs_are_written_back() {
        let map = resolved(
            ParameterMap::new("callParams")
                .parameter(ParameterMapping::new("input").ty(Type::I32))
                .parameter(
                    ParameterMapping::new("total")
                        .ty(Type::I64)
                        .mode(ParameterMode::Out),
                ),
        );
        assert_eq!(map.outputs(), vec![(1, Type::I64)]);

        let parameter = Value::map();
        let mut outputs = OutParams::from_vec(vec![Value::Null, Value::I64(42)]);
        map.write_outputs(&GenericProbe, &parameter, &mut outputs)
            .unwrap();
        assert_eq!(
            GenericProbe.get(&parameter, "total").unwrap(),
            Value::I64(42)
        );
    }
}
