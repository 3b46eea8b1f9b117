//! Result maps derived from the columns of a row set.

use super::{ResultMap, ResultMapping};
use crate::{stmt::Type, RequestScope, Result};

use std::sync::Arc;

/// Makes sure `result_map` has mappings for the rows now in `request`.
///
/// Remapping maps derive a fresh set on every request and install it in the
/// request; the others derive one set on first use and keep it.
pub(crate) fn prepare(result_map: &ResultMap, request: &mut RequestScope) -> Result<()> {
    if !result_map.is_auto() {
        return Ok(());
    }

    if result_map.is_remappable() {
        let mappings = derive(result_map, request)?;
        return result_map.set_remapped_mappings(request, mappings);
    }

    result_map.init_auto_mappings(|| derive(result_map, request))
}

fn derive(result_map: &ResultMap, request: &RequestScope) -> Result<Arc<[ResultMapping]>> {
    let catalog = request.catalog();
    let columns = request.row_set()?.columns();
    let result_class = result_map.result_class();

    let mut mappings = match result_class {
        Some(Type::Bean(bean)) => columns
            .iter()
            .filter_map(|column| {
                let property = bean.find_property(column)?;
                Some(ResultMapping::new(property).column(column.as_str()))
            })
            .collect::<Vec<_>>(),
        Some(ty) if ty.is_scalar() => columns
            .first()
            .map(|column| ResultMapping::new("value").column(column.as_str()).ty(ty.clone()))
            .into_iter()
            .collect(),
        _ => columns
            .iter()
            .map(|column| ResultMapping::new(column.as_str()).column(column.as_str()))
            .collect(),
    };

    for mapping in &mut mappings {
        mapping.resolve(catalog.type_handlers(), result_class)?;
    }

    Ok(Arc::from(mappings))
}
