use super::*;
use crate::{
    driver::Column,
    mapping::{property_type, ColumnSpec},
    stmt::DomNode,
    Catalog, MappedStatement,
};

impl ResultMap {
    /// Runs the statement of a nested-select mapping with a parameter built
    /// from the current row.
    pub(super) async fn nested_select_value(
        &self,
        request: &mut RequestScope,
        mapping: &ResultMapping,
        statement_id: &str,
    ) -> Result<Value> {
        let catalog = request.catalog().clone();
        let statement = catalog.statement(statement_id)?;
        let target = self.nested_select_target(mapping)?;

        let parameter = nested_select_parameter(request, &catalog, mapping, &statement)?;
        if parameter.is_null() {
            return Ok(Value::Null);
        }

        let target = match catalog.statement_result_class(&statement)? {
            Some(Type::DomCollection) if !target.is_dom() => Type::DomCollection,
            Some(Type::Dom) if !target.is_dom() => Type::Dom,
            _ => target,
        };

        trace!(
            result_map = %self.id,
            statement = statement_id,
            %parameter,
            target = target.name(),
            "running nested select"
        );

        let session = request.session().clone();
        let value = catalog
            .loader()
            .load_result(&session, statement.id(), parameter, &target)
            .await?;

        match mapping.null_sentinel() {
            Some(null_value) if value.is_null() => {
                match catalog.type_handlers().get_type_handler(&target, None) {
                    Some(handler) => handler.value_of(null_value),
                    None => Ok(value),
                }
            }
            _ => Ok(value),
        }
    }

    /// The type the nested statement's result must be delivered as.
    fn nested_select_target(&self, mapping: &ResultMapping) -> Result<Type> {
        let Some(result_class) = &self.result_class else {
            return Err(Error::configuration(format!(
                "The result class was null when trying to get results for ResultMap named {}.",
                self.id
            )));
        };

        if let Some(ty) = mapping.declared_type() {
            return Ok(ty.clone());
        }

        Ok(match result_class {
            Type::Dom | Type::DomCollection => Type::Dom,
            ty @ Type::Bean(_) => property_type(ty, mapping.property())?,
            _ => Type::Object,
        })
    }
}

/// Builds the parameter of a nested select from the current row, shaped by
/// the statement's parameter class.
fn nested_select_parameter(
    request: &mut RequestScope,
    catalog: &Catalog,
    mapping: &ResultMapping,
    statement: &MappedStatement,
) -> Result<Value> {
    match statement.parameter_type() {
        None => bean_parameter(request, catalog, mapping, &Type::Map),
        Some(ty) if catalog.type_handlers().has_type_handler(ty) => {
            let handler = catalog
                .type_handlers()
                .get_type_handler(ty, None)
                .unwrap_or_else(|| catalog.type_handlers().unknown_type_handler());
            handler.get_result(request.row_set_mut()?, mapping.column_ref())
        }
        Some(ty) if ty.is_dom() => dom_parameter(request, catalog, mapping),
        Some(ty) => bean_parameter(request, catalog, mapping, ty),
    }
}

fn bean_parameter(
    request: &mut RequestScope,
    catalog: &Catalog,
    mapping: &ResultMapping,
    ty: &Type,
) -> Result<Value> {
    let factory = catalog.type_handlers();
    let parameter = ty.instantiate()?;

    match mapping.column_spec() {
        Some(ColumnSpec::Composite(pairs)) => {
            let probe = catalog.probe();

            for (property, column) in pairs {
                let property_ty = probe.type_for_setter(&parameter, property)?;
                let handler = factory
                    .get_type_handler(&property_ty, None)
                    .unwrap_or_else(|| factory.unknown_type_handler());
                let value = handler.get_result(request.row_set_mut()?, Column::Name(column))?;
                probe.set(&parameter, property, value)?;
            }

            Ok(parameter)
        }
        // A single column is the parameter itself; the instance is dropped.
        _ => {
            let handler = factory
                .get_type_handler(ty, None)
                .unwrap_or_else(|| factory.unknown_type_handler());
            handler.get_result(request.row_set_mut()?, mapping.column_ref())
        }
    }
}

/// A `parameter` document with one text element per property, or a single
/// `value` element.
fn dom_parameter(
    request: &mut RequestScope,
    catalog: &Catalog,
    mapping: &ResultMapping,
) -> Result<Value> {
    let factory = catalog.type_handlers();
    let handler = factory
        .get_type_handler(&Type::String, None)
        .unwrap_or_else(|| factory.unknown_type_handler());

    let mut doc = DomNode::element("parameter");

    match mapping.column_spec() {
        Some(ColumnSpec::Composite(pairs)) => {
            for (property, column) in pairs {
                let value = handler.get_result(request.row_set_mut()?, Column::Name(column))?;
                doc.set_value(property, Value::String(value.to_string()));
            }
        }
        _ => {
            let value = handler.get_result(request.row_set_mut()?, mapping.column_ref())?;
            doc.set_value("value", Value::String(value.to_string()));
        }
    }

    Ok(Value::from(doc))
}
