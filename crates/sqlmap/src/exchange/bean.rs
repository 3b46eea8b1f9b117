use super::*;
use crate::Error;

/// Results as instances of a declared bean type.
#[derive(Debug, Default, Clone, Copy)]
pub struct BeanDataExchange;

impl DataExchange for BeanDataExchange {
    fn set_data(
        &self,
        probe: &dyn Probe,
        result_map: &ResultMap,
        mappings: &[ResultMapping],
        target: Option<Value>,
        values: &[Value],
    ) -> Result<Value> {
        let target = match target {
            Some(target) => target,
            None => match result_map.result_class() {
                Some(ty @ Type::Bean(_)) => ty.instantiate()?,
                _ => {
                    return Err(Error::configuration(format!(
                        "result map {} has no bean result class",
                        result_map.id()
                    )))
                }
            },
        };

        for (mapping, value) in assignable(mappings, values) {
            probe.set(&target, mapping.property(), value.clone())?;
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
