use super::*;
use crate::{stmt::Object, Error};

/// Results as associative maps. Property names are used as keys verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapDataExchange;

impl DataExchange for MapDataExchange {
    fn set_data(
        &self,
        _probe: &dyn Probe,
        result_map: &ResultMap,
        mappings: &[ResultMapping],
        target: Option<Value>,
        values: &[Value],
    ) -> Result<Value> {
        let target = target.unwrap_or_else(|| Value::Object(Object::map()));

        let Some(object) = target.as_object().filter(|object| object.is_map()) else {
            return Err(Error::configuration(format!(
                "result map {} produces maps, but the result object is a {}",
                result_map.id(),
                target.variant_name()
            )));
        };

        for (mapping, value) in assignable(mappings, values) {
            object.set(mapping.property(), value.clone())?;
        }

        Ok(target)
    }

    fn get_data(
        &self,
        probe: &dyn Probe,
        mappings: &[ParameterMapping],
        parameter: &Value,
    ) -> Result<Vec<Value>> {
        probe_each(probe, mappings, parameter)
    }
}
