use crate::{
    driver::{
        operation::{CallSql, ExecSql, QuerySql},
        Connection, Operation, OutParams, Params, Response, Rows,
    },
    mapping::auto,
    statement::bind_implicit,
    stmt::Value,
    Catalog, Error, MappedStatement, RequestScope, Result, RowHandler, StatementKind,
};

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, trace};

/// A connection to the database together with the catalog it runs
/// statements from.
///
/// Sessions are cheap to clone; clones share the connection. Each call runs
/// as its own request with its own [`RequestScope`].
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    catalog: Arc<Catalog>,
    connection: Mutex<Box<dyn Connection>>,
}

/// Row window of a query.
#[derive(Debug, Clone, Copy)]
struct Window {
    skip: usize,
    max: Option<usize>,
}

impl Window {
    const ALL: Window = Window { skip: 0, max: None };
}

impl Session {
    pub(crate) fn new(catalog: Arc<Catalog>, connection: Box<dyn Connection>) -> Session {
        Session {
            inner: Arc::new(Inner {
                catalog,
                connection: Mutex::new(connection),
            }),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    /// Every object the statement produces, in row order.
    pub async fn query_for_list(&self, id: &str, parameter: impl Into<Value>) -> Result<Vec<Value>> {
        self.collect(id, parameter.into(), Window::ALL).await
    }

    /// Objects produced after skipping `skip` rows and reading at most `max`
    /// more. Both count rows as the driver reports them.
    pub async fn query_for_list_range(
        &self,
        id: &str,
        parameter: impl Into<Value>,
        skip: usize,
        max: Option<usize>,
    ) -> Result<Vec<Value>> {
        self.collect(id, parameter.into(), Window { skip, max }).await
    }

    /// The single object the statement produces, if any. More than one
    /// object is an error.
    pub async fn query_for_object(
        &self,
        id: &str,
        parameter: impl Into<Value>,
    ) -> Result<Option<Value>> {
        self.single(id, parameter.into(), None).await
    }

    /// Like [`Session::query_for_object`], but populates `result_object`
    /// instead of creating a new object.
    pub async fn query_for_object_into(
        &self,
        id: &str,
        parameter: impl Into<Value>,
        result_object: Value,
    ) -> Result<Option<Value>> {
        self.single(id, parameter.into(), Some(result_object)).await
    }

    /// Hands each object to `handler` as soon as it is produced.
    pub async fn query_with_row_handler(
        &self,
        id: &str,
        parameter: impl Into<Value>,
        mut handler: impl RowHandler,
    ) -> Result<()> {
        self.run_query(id, parameter.into(), None, Window::ALL, &mut handler)
            .await
    }

    /// Runs a procedure. Objects mapped from its rows are returned; output
    /// parameters are written back into `parameter`.
    pub async fn call(&self, id: &str, parameter: impl Into<Value>) -> Result<Vec<Value>> {
        let statement = self.inner.catalog.statement(id)?;
        if statement.kind() != StatementKind::Procedure {
            return Err(Error::protocol(format!(
                "{} statements cannot be called as a procedure.",
                statement.kind()
            )));
        }
        self.collect(id, parameter.into(), Window::ALL).await
    }

    /// Number of rows inserted.
    pub async fn insert(&self, id: &str, parameter: impl Into<Value>) -> Result<u64> {
        self.run_update(id, parameter.into()).await
    }

    /// Number of rows updated.
    pub async fn update(&self, id: &str, parameter: impl Into<Value>) -> Result<u64> {
        self.run_update(id, parameter.into()).await
    }

    /// Number of rows deleted.
    pub async fn delete(&self, id: &str, parameter: impl Into<Value>) -> Result<u64> {
        self.run_update(id, parameter.into()).await
    }

    async fn collect(&self, id: &str, parameter: Value, window: Window) -> Result<Vec<Value>> {
        let mut objects = vec![];
        let mut handler = |object: Value| -> Result<()> {
            objects.push(object);
            Ok(())
        };
        self.run_query(id, parameter, None, window, &mut handler)
            .await?;
        Ok(objects)
    }

    async fn single(&self, id: &str, parameter: Value, target: Option<Value>) -> Result<Option<Value>> {
        let mut first = None;
        let mut count = 0;
        let mut handler = |object: Value| -> Result<()> {
            count += 1;
            if count > 1 {
                return Err(Error::too_many_results(count));
            }
            first = Some(object);
            Ok(())
        };
        self.run_query(id, parameter, target, Window::ALL, &mut handler)
            .await?;
        Ok(first)
    }

    async fn run_query(
        &self,
        id: &str,
        parameter: Value,
        target: Option<Value>,
        window: Window,
        handler: &mut dyn RowHandler,
    ) -> Result<()> {
        let statement = self.inner.catalog.statement(id)?;
        let mut request = RequestScope::new(self.clone());

        self.execute_query(&mut request, &statement, parameter, target, window, handler)
            .await
            .map_err(|cause| with_request_context(cause, &request))
    }

    async fn execute_query(
        &self,
        request: &mut RequestScope,
        statement: &Arc<MappedStatement>,
        parameter: Value,
        target: Option<Value>,
        window: Window,
        handler: &mut dyn RowHandler,
    ) -> Result<()> {
        let query = statement.as_query()?;
        let catalog = self.inner.catalog.clone();
        let result_map = catalog.statement_result_map(statement)?;
        request.bind(statement.clone(), result_map.clone());

        let params = self.prepare(request, statement, &parameter)?;

        debug!(
            statement = statement.id(),
            kind = %statement.kind(),
            params = params.len(),
            "executing statement"
        );

        request
            .error_context_mut()
            .set_activity("executing the mapped statement");

        let op = if query.is_procedure() {
            self.call_sql(statement, params)
        } else {
            QuerySql {
                sql: statement.sql().to_string(),
                params,
            }
            .into()
        };

        let Response { rows, outputs } = self.exec(op).await?;

        let mut fetched = 0;
        let mut emitted = 0;

        if let (Rows::Values(rows), Some(result_map)) = (rows, &result_map) {
            request.begin(rows)?;
            auto::prepare(result_map, request)?;

            let mut skipped = 0;
            while window.max.map_or(true, |max| fetched < max) && request.row_set_mut()?.next()? {
                if skipped < window.skip {
                    skipped += 1;
                    continue;
                }
                fetched += 1;

                let effective = result_map.resolve_sub_map(request)?;
                let values = effective.get_results(request).await?;

                trace!(
                    result_map = effective.id(),
                    row_data_found = request.row_data_found(),
                    "read row"
                );

                if !request.row_data_found() {
                    continue;
                }

                if let Some(object) = effective
                    .set_result_object_values(request, target.clone(), values)
                    .await?
                {
                    handler.handle_row(object)?;
                    emitted += 1;
                }
            }
        }

        self.write_outputs(request, statement, &parameter, outputs)?;

        debug!(
            statement = statement.id(),
            rows = fetched,
            objects = emitted,
            "statement finished"
        );
        Ok(())
    }

    async fn run_update(&self, id: &str, parameter: Value) -> Result<u64> {
        let statement = self.inner.catalog.statement(id)?;
        let mut request = RequestScope::new(self.clone());

        self.execute_update(&mut request, &statement, parameter)
            .await
            .map_err(|cause| with_request_context(cause, &request))
    }

    async fn execute_update(
        &self,
        request: &mut RequestScope,
        statement: &Arc<MappedStatement>,
        parameter: Value,
    ) -> Result<u64> {
        request.bind(statement.clone(), None);
        let params = self.prepare(request, statement, &parameter)?;

        debug!(
            statement = statement.id(),
            kind = %statement.kind(),
            params = params.len(),
            "executing statement"
        );

        request
            .error_context_mut()
            .set_activity("executing the mapped statement");

        let op = match statement.kind() {
            StatementKind::Procedure => self.call_sql(statement, params),
            _ => ExecSql {
                sql: statement.sql().to_string(),
                params,
            }
            .into(),
        };

        let Response { rows, outputs } = self.exec(op).await?;
        let count = match rows {
            Rows::Count(count) => count,
            Rows::Values(_) => 0,
        };

        self.write_outputs(request, statement, &parameter, outputs)?;

        debug!(statement = statement.id(), count, "statement finished");
        Ok(count)
    }

    /// Narrates the statement into the request and binds its parameters.
    fn prepare(
        &self,
        request: &mut RequestScope,
        statement: &MappedStatement,
        parameter: &Value,
    ) -> Result<Params> {
        let cx = request.error_context_mut();
        cx.set_resource(statement.resource_name());
        cx.set_activity("preparing the mapped statement for execution");
        cx.set_object_id(statement.id());
        cx.set_more_info("Check the parameter map.");

        match statement.parameters() {
            Some(parameter_map) => parameter_map.bind(&**self.inner.catalog.probe(), parameter),
            None => Ok(bind_implicit(parameter)),
        }
    }

    fn call_sql(&self, statement: &MappedStatement, params: Params) -> Operation {
        CallSql {
            sql: statement.sql().to_string(),
            params,
            outputs: statement
                .parameters()
                .map(|parameter_map| parameter_map.outputs())
                .unwrap_or_default(),
        }
        .into()
    }

    fn write_outputs(
        &self,
        request: &mut RequestScope,
        statement: &MappedStatement,
        parameter: &Value,
        outputs: Option<OutParams>,
    ) -> Result<()> {
        let (Some(mut outputs), Some(parameter_map)) = (outputs, statement.parameters()) else {
            return Ok(());
        };

        let cx = request.error_context_mut();
        cx.set_activity("retrieving output parameters");
        cx.set_more_info("Check the output parameters.");

        parameter_map.write_outputs(&**self.inner.catalog.probe(), parameter, &mut outputs)
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut connection = self.inner.connection.lock().await;
        connection.exec(op).await
    }
}

/// Attaches what the request was doing when it failed.
fn with_request_context(cause: Error, request: &RequestScope) -> Error {
    if request.error_context().is_empty() {
        cause
    } else {
        cause.context(request.error_context().clone())
    }
}
