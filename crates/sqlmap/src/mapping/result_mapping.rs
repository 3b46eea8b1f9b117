use super::{property_type, ColumnSpec};
use crate::{
    driver::Column,
    stmt::Type,
    types::{TypeHandler, TypeHandlerFactory},
    Result,
};

use std::sync::Arc;

/// Binds one column, or one nested mapping, to one property.
#[derive(Debug, Clone)]
pub struct ResultMapping {
    property: String,
    column: Option<String>,
    column_index: Option<usize>,
    jdbc_type: Option<String>,
    ty: Option<Type>,
    null_value: Option<String>,
    type_handler: Option<Arc<dyn TypeHandler>>,
    route: Route,
    column_spec: Option<ColumnSpec>,
    error_string: String,
}

/// Where a mapping's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Read the column through the mapping's type handler.
    Primitive,

    /// Run another statement with a parameter built from this row.
    NestedSelect { statement: String },

    /// Assemble a child object from the same row with another result map.
    NestedResultMap { result_map: String },
}

impl ResultMapping {
    pub fn new(property: impl Into<String>) -> ResultMapping {
        let property = property.into();
        let error_string = format!("Check the result mapping for the '{property}' property.");

        ResultMapping {
            property,
            column: None,
            column_index: None,
            jdbc_type: None,
            ty: None,
            null_value: None,
            type_handler: None,
            route: Route::Primitive,
            column_spec: None,
            error_string,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Reads the column by 0-based position. Used when the column has no
    /// usable label, as with stored procedure outputs.
    pub fn column_index(mut self, index: usize) -> Self {
        self.column_index = Some(index);
        self
    }

    pub fn jdbc_type(mut self, jdbc_type: impl Into<String>) -> Self {
        self.jdbc_type = Some(jdbc_type.into());
        self
    }

    pub fn ty(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Text substituted, after parsing, when the column is SQL null.
    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = Some(null_value.into());
        self
    }

    pub fn type_handler(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.type_handler = Some(handler);
        self
    }

    /// Populates the property by running `statement`.
    pub fn select(mut self, statement: impl Into<String>) -> Self {
        self.route = Route::NestedSelect {
            statement: statement.into(),
        };
        self
    }

    /// Populates the property, a collection, from the same rows with
    /// `result_map`.
    pub fn result_map(mut self, result_map: impl Into<String>) -> Self {
        self.route = Route::NestedResultMap {
            result_map: result_map.into(),
        };
        self
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn column_position(&self) -> Option<usize> {
        self.column_index
    }

    pub fn jdbc_type_name(&self) -> Option<&str> {
        self.jdbc_type.as_deref()
    }

    pub fn declared_type(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    pub fn null_sentinel(&self) -> Option<&str> {
        self.null_value.as_deref()
    }

    pub fn handler(&self) -> Option<&Arc<dyn TypeHandler>> {
        self.type_handler.as_ref()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn is_nested_result_map(&self) -> bool {
        matches!(self.route, Route::NestedResultMap { .. })
    }

    /// The parsed column specifier of a nested select.
    pub fn column_spec(&self) -> Option<&ColumnSpec> {
        self.column_spec.as_ref()
    }

    pub fn error_string(&self) -> &str {
        &self.error_string
    }

    /// The column to read: by name when one is set, by position otherwise.
    pub(crate) fn column_ref(&self) -> Column<'_> {
        match (&self.column, self.column_index) {
            (Some(name), _) => Column::Name(name),
            (None, Some(index)) => Column::Index(index),
            (None, None) => Column::Name(&self.property),
        }
    }

    pub(crate) fn column_label(&self) -> String {
        self.column_ref().to_string()
    }

    pub(crate) fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    /// Picks the type handler and parses the column specifier.
    ///
    /// An explicit handler wins. Otherwise the declared type is used, then the
    /// declared type of the property on `result_class`; when neither resolves
    /// the unknown handler reads the raw column value.
    pub(crate) fn resolve(
        &mut self,
        factory: &TypeHandlerFactory,
        result_class: Option<&Type>,
    ) -> Result<()> {
        if self.type_handler.is_none() {
            self.type_handler = match &self.ty {
                Some(ty) => factory.get_type_handler(ty, self.jdbc_type.as_deref()),
                None => {
                    let from_class = result_class
                        .filter(|ty| ty.is_bean())
                        .and_then(|ty| property_type(ty, &self.property).ok())
                        .and_then(|ty| factory.get_type_handler(&ty, self.jdbc_type.as_deref()));
                    Some(from_class.unwrap_or_else(|| factory.unknown_type_handler()))
                }
            };
        }

        if let (Route::NestedSelect { .. }, Some(column)) = (&self.route, &self.column) {
            self.column_spec = Some(ColumnSpec::parse(column)?);
        }

        Ok(())
    }
}
