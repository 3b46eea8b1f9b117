//! Moving mapped values into and out of host objects.
//!
//! A [`DataExchange`] knows one kind of host object. Result maps pick one
//! from their result class; parameter binding picks one from the parameter
//! value.

mod bean;
pub use bean::BeanDataExchange;

mod dom;
pub use dom::DomDataExchange;

mod map;
pub use map::MapDataExchange;

mod primitive;
pub use primitive::PrimitiveDataExchange;

mod record;
pub use record::RecordDataExchange;

use crate::{
    mapping::ResultMapping,
    probe::Probe,
    statement::ParameterMapping,
    stmt::{ObjectData, Type, Value},
    ResultMap, Result,
};

use std::{fmt::Debug, sync::Arc};

pub trait DataExchange: Debug + Send + Sync + 'static {
    /// Builds or populates a result object from the values read for
    /// `mappings`. Values of nested result-map mappings are skipped; they are
    /// assembled separately.
    fn set_data(
        &self,
        probe: &dyn Probe,
        result_map: &ResultMap,
        mappings: &[ResultMapping],
        target: Option<Value>,
        values: &[Value],
    ) -> Result<Value>;

    /// Reads the value of each parameter mapping from `parameter`.
    fn get_data(
        &self,
        probe: &dyn Probe,
        mappings: &[ParameterMapping],
        parameter: &Value,
    ) -> Result<Vec<Value>>;
}

/// The exchange for results of type `ty`. Untyped results are maps.
pub fn for_type(ty: Option<&Type>) -> Arc<dyn DataExchange> {
    match ty {
        None | Some(Type::Object | Type::Map) => Arc::new(MapDataExchange),
        Some(Type::Bean(_)) => Arc::new(BeanDataExchange),
        Some(Type::Dom | Type::DomCollection) => Arc::new(DomDataExchange),
        Some(Type::Record | Type::List | Type::Set | Type::Collection) => {
            Arc::new(RecordDataExchange)
        }
        Some(_) => Arc::new(PrimitiveDataExchange),
    }
}

/// The exchange that reads properties of `parameter`.
pub fn for_value(parameter: &Value) -> &'static dyn DataExchange {
    match parameter {
        Value::Object(object) => object.with(|data| -> &'static dyn DataExchange {
            match data {
                ObjectData::Map(_) => &MapDataExchange,
                ObjectData::Bean(_) => &BeanDataExchange,
                ObjectData::Dom(_) => &DomDataExchange,
            }
        }),
        Value::Record(_) | Value::List(_) => &RecordDataExchange,
        _ => &PrimitiveDataExchange,
    }
}

/// Mappings paired with their values, nested result maps left out.
fn assignable<'a>(
    mappings: &'a [ResultMapping],
    values: &'a [Value],
) -> impl Iterator<Item = (&'a ResultMapping, &'a Value)> {
    mappings
        .iter()
        .zip(values)
        .filter(|(mapping, _)| !mapping.is_nested_result_map())
}

fn probe_each(
    probe: &dyn Probe,
    mappings: &[ParameterMapping],
    parameter: &Value,
) -> Result<Vec<Value>> {
    mappings
        .iter()
        .map(|mapping| probe.get(parameter, mapping.property()))
        .collect()
}
