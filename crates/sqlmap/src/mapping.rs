//! The result-map language: how a row becomes an object.

pub(crate) mod auto;

mod column_spec;
pub use column_spec::ColumnSpec;

mod discriminator;
pub use discriminator::Discriminator;

mod result_map;
pub use result_map::{ResultMap, ResultMapBuilder};

mod result_mapping;
pub use result_mapping::{ResultMapping, Route};

use crate::{
    stmt::{Type, Value},
    Error, RequestScope, Result,
};

/// Reads the column bound to a primitive mapping, substituting the mapping's
/// null sentinel when the column is SQL null.
pub(crate) fn read_primitive(request: &mut RequestScope, mapping: &ResultMapping) -> Result<Value> {
    let Some(handler) = mapping.handler() else {
        return Err(Error::configuration(format!(
            "No type handler could be found to map the property '{}' to the column '{}'.  \
             One or both of the types, or the combination of types is not supported.",
            mapping.property(),
            mapping.column_label()
        )));
    };

    let value = handler.get_result(request.row_set_mut()?, mapping.column_ref())?;

    match mapping.null_sentinel() {
        Some(null_value) if value.is_null() => handler.value_of(null_value),
        _ => Ok(value),
    }
}

/// The declared type of a (possibly dotted) property of a host type.
///
/// Beans are walked through their declared property types. Everything else
/// can hold any value.
pub(crate) fn property_type(ty: &Type, path: &str) -> Result<Type> {
    let mut current = ty.clone();

    for step in path.split('.') {
        current = match &current {
            Type::Bean(bean) => bean.property_type(step).cloned().ok_or_else(|| {
                Error::configuration(format!(
                    "There is no WRITEABLE property named '{}' in bean type '{}'",
                    step,
                    bean.name()
                ))
            })?,
            _ => Type::Object,
        };
    }

    Ok(current)
}
