mod builder;
pub use builder::Builder;

mod verify;

use crate::{
    loader::ResultLoader, probe::Probe, stmt::Type, types::TypeHandlerFactory, Error,
    MappedStatement, ResultMap, Result, Settings,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Every result map and statement of a SQL map, with the capabilities they
/// run with.
///
/// A catalog is immutable once built and shared by all sessions.
#[derive(Debug)]
pub struct Catalog {
    result_maps: IndexMap<String, Arc<ResultMap>>,
    statements: IndexMap<String, Arc<MappedStatement>>,
    type_handlers: TypeHandlerFactory,
    probe: Arc<dyn Probe>,
    loader: Arc<dyn ResultLoader>,
    settings: Settings,
}

impl Catalog {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn result_map(&self, id: &str) -> Result<Arc<ResultMap>> {
        self.result_maps.get(id).cloned().ok_or_else(|| {
            Error::configuration(format!("There is no result map named {id} in this SqlMap."))
        })
    }

    pub fn statement(&self, id: &str) -> Result<Arc<MappedStatement>> {
        self.statements.get(id).cloned().ok_or_else(|| {
            Error::configuration(format!("There is no statement named {id} in this SqlMap."))
        })
    }

    pub fn result_maps(&self) -> impl Iterator<Item = &Arc<ResultMap>> {
        self.result_maps.values()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Arc<MappedStatement>> {
        self.statements.values()
    }

    pub fn type_handlers(&self) -> &TypeHandlerFactory {
        &self.type_handlers
    }

    pub fn probe(&self) -> &Arc<dyn Probe> {
        &self.probe
    }

    pub fn loader(&self) -> &Arc<dyn ResultLoader> {
        &self.loader
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The result map rows of `statement` are read with, if any.
    pub fn statement_result_map(
        &self,
        statement: &MappedStatement,
    ) -> Result<Option<Arc<ResultMap>>> {
        statement
            .result_map_id()
            .map(|id| self.result_map(id))
            .transpose()
    }

    /// The type of the objects `statement` produces.
    pub fn statement_result_class(&self, statement: &MappedStatement) -> Result<Option<Type>> {
        Ok(match self.statement_result_map(statement)? {
            Some(result_map) => result_map.result_class().cloned(),
            None => statement.result_type().cloned(),
        })
    }
}
