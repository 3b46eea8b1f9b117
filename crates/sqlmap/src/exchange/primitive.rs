use super::*;

/// Results and parameters that are a single scalar value.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveDataExchange;

impl DataExchange for PrimitiveDataExchange {
    fn set_data(
        &self,
        _probe: &dyn Probe,
        _result_map: &ResultMap,
        _mappings: &[ResultMapping],
        _target: Option<Value>,
        values: &[Value],
    ) -> Result<Value> {
        Ok(values.first().cloned().unwrap_or_default())
    }

    /// Every parameter mapping reads the parameter itself.
    fn get_data(
        &self,
        _probe: &dyn Probe,
        mappings: &[ParameterMapping],
        parameter: &Value,
    ) -> Result<Vec<Value>> {
        Ok(vec![parameter.clone(); mappings.len()])
    }
}
