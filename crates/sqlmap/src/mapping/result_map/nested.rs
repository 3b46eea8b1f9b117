use super::*;
use crate::{err, Catalog};

impl ResultMap {
    /// Adds this row's nested elements to `parent`.
    ///
    /// While a keyed object is being assembled it is marked in the request,
    /// so a cycle of nested result maps that comes back to it stops there.
    pub(super) async fn assemble_nested(
        &self,
        request: &mut RequestScope,
        mappings: &[ResultMapping],
        parent: &Value,
        key: Option<&str>,
    ) -> Result<()> {
        if !mappings.iter().any(ResultMapping::is_nested_result_map) {
            return Ok(());
        }

        if let Some(key) = key {
            request.push_assembling(&self.id, key);
        }

        let res = self.assemble_each(request, mappings, parent).await;

        if key.is_some() {
            request.pop_assembling();
        }

        res
    }

    async fn assemble_each(
        &self,
        request: &mut RequestScope,
        mappings: &[ResultMapping],
        parent: &Value,
    ) -> Result<()> {
        let catalog = request.catalog().clone();

        for mapping in mappings {
            let Route::NestedResultMap { result_map } = mapping.route() else {
                continue;
            };

            self.nested_element(request, &catalog, mapping, result_map, parent)
                .await
                .map_err(|cause| {
                    cause.context(err!(
                        "Error getting nested result map values for '{}'",
                        mapping.property()
                    ))
                })?;
        }

        Ok(())
    }

    /// Reads one child element from the request's current row and appends
    /// it to the collection property of `parent`, creating the collection
    /// first if needed.
    async fn nested_element(
        &self,
        request: &mut RequestScope,
        catalog: &Catalog,
        mapping: &ResultMapping,
        result_map: &str,
        parent: &Value,
    ) -> Result<()> {
        let child = catalog.result_map(result_map)?;
        let probe = catalog.probe();
        let property = mapping.property();

        let ty = match mapping.declared_type() {
            Some(ty) => ty.clone(),
            None => probe.type_for_setter(parent, property)?,
        };

        probe.update(parent, property, &mut |slot| {
            if slot.is_null() {
                *slot = Type::new_collection(Some(&ty), property)?;
            }
            Ok(())
        })?;

        let values = child.get_results(request).await?;
        if !request.row_data_found() {
            return Ok(());
        }

        let Some(element) = child.set_result_object_values(request, None, values).await? else {
            return Ok(());
        };

        probe.update(parent, property, &mut |slot| {
            if slot.is_null() {
                *slot = Type::new_collection(Some(&ty), property)?;
            }
            slot.push(element.clone())
        })
    }
}
