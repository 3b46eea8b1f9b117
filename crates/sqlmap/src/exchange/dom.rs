use super::*;
use crate::stmt::DomNode;

/// Results as DOM documents.
///
/// The root element is named after the result map's XML name, or `result`.
/// Null values leave their element out.
///
/// Nested elements are copied into the parent document when they are
/// appended. Later rows that extend a grouped child through the identity
/// tracker update the child object, not the copy already in its parent, so
/// within a DOM result only the outermost map should group nested rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomDataExchange;

impl DataExchange for DomDataExchange {
    fn set_data(
        &self,
        probe: &dyn Probe,
        result_map: &ResultMap,
        mappings: &[ResultMapping],
        target: Option<Value>,
        values: &[Value],
    ) -> Result<Value> {
        let target = target.unwrap_or_else(|| {
            let root = result_map.xml_name().unwrap_or("result");
            Value::from(DomNode::element(root))
        });

        for (mapping, value) in assignable(mappings, values) {
            if !value.is_null() {
                probe.set(&target, mapping.property(), value.clone())?;
            }
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
