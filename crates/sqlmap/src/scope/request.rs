use super::IdentityTracker;
use crate::{
    driver::RowSet, Catalog, Error, ErrorContext, MappedStatement, ResultMap, ResultMapping,
    Result, Session,
};

use std::{collections::HashMap, sync::Arc};

/// Mutable context of one statement execution.
///
/// A scope is created for each request and driven by a single task. It holds
/// the statement being run, the rows being read, the identity tracker and the
/// error context narrated by the engine.
#[derive(Debug)]
pub struct RequestScope {
    session: Session,
    state: ScopeState,
    statement: Option<Arc<MappedStatement>>,
    sql: Option<String>,
    result_map: Option<Arc<ResultMap>>,
    row_set: Option<Box<dyn RowSet>>,
    identity: IdentityTracker,
    error_context: ErrorContext,
    row_data_found: bool,

    /// Per-request mapping overrides for remappable result maps
    mappings: HashMap<String, Arc<[ResultMapping]>>,

    /// `(result map, group key)` pairs whose nested elements are being
    /// assembled. Re-entering one of them contributes nothing.
    assembling: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    /// Created or reset
    Fresh,

    /// Statement, SQL and result map assigned
    Bound,

    /// Rows assigned and being read
    Executing,
}

impl RequestScope {
    pub fn new(session: Session) -> RequestScope {
        RequestScope {
            session,
            state: ScopeState::Fresh,
            statement: None,
            sql: None,
            result_map: None,
            row_set: None,
            identity: IdentityTracker::new(),
            error_context: ErrorContext::default(),
            row_data_found: true,
            mappings: HashMap::new(),
            assembling: vec![],
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.session.catalog()
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    /// Assigns the statement about to run.
    pub fn bind(&mut self, statement: Arc<MappedStatement>, result_map: Option<Arc<ResultMap>>) {
        self.sql = Some(statement.sql().to_string());
        self.statement = Some(statement);
        self.result_map = result_map;
        self.state = ScopeState::Bound;
    }

    /// Hands the rows of the bound statement to the scope.
    pub fn begin(&mut self, row_set: Box<dyn RowSet>) -> Result<()> {
        if self.state != ScopeState::Bound {
            return Err(Error::protocol(format!(
                "a request must be bound to a statement before rows are assigned; state={:?}",
                self.state
            )));
        }

        self.row_set = Some(row_set);
        self.state = ScopeState::Executing;
        Ok(())
    }

    pub fn statement(&self) -> Option<&Arc<MappedStatement>> {
        self.statement.as_ref()
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn result_map(&self) -> Option<&Arc<ResultMap>> {
        self.result_map.as_ref()
    }

    pub fn row_set(&self) -> Result<&dyn RowSet> {
        match &self.row_set {
            Some(row_set) if self.state == ScopeState::Executing => Ok(&**row_set),
            _ => Err(self.not_executing()),
        }
    }

    pub fn row_set_mut(&mut self) -> Result<&mut dyn RowSet> {
        if self.state != ScopeState::Executing {
            return Err(self.not_executing());
        }

        match &mut self.row_set {
            Some(row_set) => Ok(&mut **row_set),
            None => Err(Error::protocol("the request has no rows assigned")),
        }
    }

    fn not_executing(&self) -> Error {
        Error::protocol(format!(
            "rows can only be read while the request is executing; state={:?}",
            self.state
        ))
    }

    pub fn identity(&self) -> &IdentityTracker {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut IdentityTracker {
        &mut self.identity
    }

    pub fn error_context(&self) -> &ErrorContext {
        &self.error_context
    }

    pub fn error_context_mut(&mut self) -> &mut ErrorContext {
        &mut self.error_context
    }

    /// Whether the last row read had any non-null value.
    ///
    /// Starts out `true` until a row is read.
    pub fn row_data_found(&self) -> bool {
        self.row_data_found
    }

    pub fn set_row_data_found(&mut self, found: bool) {
        self.row_data_found = found;
    }

    /// The mappings installed for `result_map` in this request.
    pub fn mappings(&self, result_map: &str) -> Option<&Arc<[ResultMapping]>> {
        self.mappings.get(result_map)
    }

    pub fn set_mappings(&mut self, result_map: &str, mappings: Arc<[ResultMapping]>) {
        self.mappings.insert(result_map.to_string(), mappings);
    }

    pub(crate) fn is_assembling(&self, result_map: &str, key: &str) -> bool {
        self.assembling
            .iter()
            .any(|(id, k)| id == result_map && k == key)
    }

    pub(crate) fn push_assembling(&mut self, result_map: &str, key: &str) {
        self.assembling
            .push((result_map.to_string(), key.to_string()));
    }

    pub(crate) fn pop_assembling(&mut self) {
        self.assembling.pop();
    }

    /// Returns the scope to its freshly created state.
    pub fn reset(&mut self) {
        self.state = ScopeState::Fresh;
        self.statement = None;
        self.sql = None;
        self.result_map = None;
        self.row_set = None;
        self.identity.clear();
        self.error_context.reset();
        self.row_data_found = true;
        self.mappings.clear();
        self.assembling.clear();
    }
}
