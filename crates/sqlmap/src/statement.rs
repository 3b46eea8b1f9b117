//! Mapped statements.

mod parameter_map;
pub use parameter_map::{ParameterMap, ParameterMapping, ParameterMode};
pub(crate) use parameter_map::bind_implicit;

use crate::{stmt::Type, Error, Result};

/// The kind of a mapped statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Procedure,
}

impl StatementKind {
    /// Whether statements of this kind produce rows.
    pub fn is_query(self) -> bool {
        matches!(self, StatementKind::Select | StatementKind::Procedure)
    }
}

impl core::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "Select",
            StatementKind::Insert => "Insert",
            StatementKind::Update => "Update",
            StatementKind::Delete => "Delete",
            StatementKind::Procedure => "Procedure",
        })
    }
}

/// A named SQL statement with its parameter and result descriptions.
#[derive(Debug, Clone)]
pub struct MappedStatement {
    id: String,
    kind: StatementKind,
    sql: String,
    resource: Option<String>,
    parameter_class: Option<Type>,
    parameter_map: Option<ParameterMap>,
    result_map: Option<String>,
    result_class: Option<Type>,
    remap_results: bool,
}

/// A statement that produces rows.
#[derive(Debug, Clone, Copy)]
pub struct QueryStatement<'a> {
    statement: &'a MappedStatement,
}

impl MappedStatement {
    pub fn new(kind: StatementKind, id: impl Into<String>, sql: impl Into<String>) -> Self {
        MappedStatement {
            id: id.into(),
            kind,
            sql: sql.into(),
            resource: None,
            parameter_class: None,
            parameter_map: None,
            result_map: None,
            result_class: None,
            remap_results: false,
        }
    }

    pub fn select(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Select, id, sql)
    }

    pub fn insert(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Insert, id, sql)
    }

    pub fn update(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Update, id, sql)
    }

    pub fn delete(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Delete, id, sql)
    }

    pub fn procedure(id: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::new(StatementKind::Procedure, id, sql)
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn parameter_class(mut self, ty: Type) -> Self {
        self.parameter_class = Some(ty);
        self
    }

    pub fn parameter_map(mut self, parameter_map: ParameterMap) -> Self {
        self.parameter_map = Some(parameter_map);
        self
    }

    pub fn result_map(mut self, result_map: impl Into<String>) -> Self {
        self.result_map = Some(result_map.into());
        self
    }

    /// Results of this type, mapped from the row set columns.
    pub fn result_class(mut self, ty: Type) -> Self {
        self.result_class = Some(ty);
        self
    }

    /// Derive the result mappings again on every execution.
    pub fn remap_results(mut self, remap: bool) -> Self {
        self.remap_results = remap;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn resource_name(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn parameter_type(&self) -> Option<&Type> {
        self.parameter_class.as_ref()
    }

    pub fn parameters(&self) -> Option<&ParameterMap> {
        self.parameter_map.as_ref()
    }

    pub fn result_map_id(&self) -> Option<&str> {
        self.result_map.as_deref()
    }

    pub fn result_type(&self) -> Option<&Type> {
        self.result_class.as_ref()
    }

    pub fn remaps_results(&self) -> bool {
        self.remap_results
    }

    /// A view of this statement as a query.
    ///
    /// Only selects and procedures produce rows; asking any other kind for
    /// objects is a protocol error.
    pub fn as_query(&self) -> Result<QueryStatement<'_>> {
        if !self.kind.is_query() {
            return Err(Error::protocol(format!(
                "{} statements cannot be executed as a query.",
                self.kind
            )));
        }
        Ok(QueryStatement { statement: self })
    }

    pub(crate) fn parameter_map_mut(&mut self) -> Option<&mut ParameterMap> {
        self.parameter_map.as_mut()
    }

    pub(crate) fn result_map_mut(&mut self) -> &mut Option<String> {
        &mut self.result_map
    }
}

impl<'a> QueryStatement<'a> {
    pub fn statement(&self) -> &'a MappedStatement {
        self.statement
    }

    pub fn id(&self) -> &'a str {
        &self.statement.id
    }

    pub fn is_procedure(&self) -> bool {
        self.statement.kind == StatementKind::Procedure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_selects_and_procedures_are_queries() {
        assert!(MappedStatement::select("s", "select 1").as_query().is_ok());
        assert!(MappedStatement::procedure("p", "{call p()}").as_query().is_ok());

        for statement in [
            MappedStatement::insert("i", "insert"),
            MappedStatement::update("u", "update"),
            MappedStatement::delete("d", "delete"),
        ] {
            let err = statement.as_query().unwrap_err();
            assert!(err.is_protocol());
        }
    }

    #[test]
    fn protocol_error_names_the_kind() {
        let err = MappedStatement::delete("d", "delete from t")
            .as_query()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "protocol error: Delete statements cannot be executed as a query."
        );
    }
}
