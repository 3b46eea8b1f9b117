use super::*;
use crate::stmt::ValueRecord;

/// Results and parameters as fixed-position arrays.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordDataExchange;

impl DataExchange for RecordDataExchange {
    fn set_data(
        &self,
        _probe: &dyn Probe,
        _result_map: &ResultMap,
        mappings: &[ResultMapping],
        _target: Option<Value>,
        values: &[Value],
    ) -> Result<Value> {
        let fields = assignable(mappings, values)
            .map(|(_, value)| value.clone())
            .collect();
        Ok(Value::Record(ValueRecord::from_vec(fields)))
    }

    /// Parameter mapping `i` reads element `i`; missing elements read as null.
    fn get_data(
        &self,
        _probe: &dyn Probe,
        mappings: &[ParameterMapping],
        parameter: &Value,
    ) -> Result<Vec<Value>> {
        let items: &[Value] = match parameter {
            Value::Record(record) => &record.fields,
            Value::List(items) => items,
            _ => &[],
        };

        Ok((0..mappings.len())
            .map(|index| items.get(index).cloned().unwrap_or_default())
            .collect())
    }
}
