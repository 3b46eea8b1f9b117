//! A scripted, in-process driver.
//!
//! `Memory` answers each SQL string with a reply registered up front and
//! records every operation it receives, so tests can drive the mapping engine
//! without a database and then assert on exactly what was sent.

mod exec_log;
pub use exec_log::ExecLog;

use parking_lot::Mutex;
use sqlmap_core::{
    async_trait,
    driver::{Connection, Driver, MemoryRowSet, Operation, OutParams, Response},
    stmt::Value,
    Error, Result,
};
use std::{borrow::Cow, sync::Arc};

#[derive(Debug, Clone, Default)]
pub struct Memory {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    replies: Vec<Reply>,
    ops: Arc<Mutex<Vec<Operation>>>,
}

#[derive(Debug)]
struct Reply {
    sql: String,

    /// When set, the reply only answers operations bound with exactly these values
    params: Option<Vec<Value>>,

    canned: Canned,
}

#[derive(Debug)]
enum Canned {
    Rows(MemoryRowSet),
    Count(u64),
    Call {
        rows: Option<MemoryRowSet>,
        outputs: OutParams,
    },
    Error(String),
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Answers `sql` with `rows`, whatever the parameters.
    pub fn on_query(&self, sql: &str, rows: MemoryRowSet) -> &Self {
        self.push(sql, None, Canned::Rows(rows))
    }

    /// Answers `sql` with `rows` when bound with exactly `params`. These
    /// replies win over ones registered without parameters.
    pub fn on_query_with(
        &self,
        sql: &str,
        params: impl IntoIterator<Item = Value>,
        rows: MemoryRowSet,
    ) -> &Self {
        self.push(sql, Some(params.into_iter().collect()), Canned::Rows(rows))
    }

    /// Answers `sql` with an update count.
    pub fn on_exec(&self, sql: &str, count: u64) -> &Self {
        self.push(sql, None, Canned::Count(count))
    }

    /// Answers a procedure call with optional rows and output parameters.
    pub fn on_call(&self, sql: &str, rows: Option<MemoryRowSet>, outputs: OutParams) -> &Self {
        self.push(sql, None, Canned::Call { rows, outputs })
    }

    /// Fails `sql` with a database error.
    pub fn on_error(&self, sql: &str, message: &str) -> &Self {
        self.push(sql, None, Canned::Error(message.to_string()))
    }

    fn push(&self, sql: &str, params: Option<Vec<Value>>, canned: Canned) -> &Self {
        self.state.lock().replies.push(Reply {
            sql: normalize(sql),
            params,
            canned,
        });
        self
    }

    /// A handle on the operations executed so far, by any connection.
    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.state.lock().ops.clone())
    }
}

#[async_trait]
impl Driver for Memory {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed("memory:")
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(MemoryConnection {
            state: self.state.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct MemoryConnection {
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let state = self.state.lock();
        state.ops.lock().push(op.clone());

        let sql = normalize(op.sql());
        let params: Vec<Value> = op.params().values().cloned().collect();

        let reply = state
            .replies
            .iter()
            .filter(|reply| reply.sql == sql)
            .find(|reply| reply.params.as_ref() == Some(&params))
            .or_else(|| {
                state
                    .replies
                    .iter()
                    .find(|reply| reply.sql == sql && reply.params.is_none())
            })
            .ok_or_else(|| Error::database_message(format!("no reply registered for `{sql}`")))?;

        tracing::debug!(kind = op.kind(), %sql, params = params.len(), "memory exec");

        match (&reply.canned, &op) {
            (Canned::Error(message), _) => Err(Error::database_message(message.clone())),
            (Canned::Rows(rows), _) => Ok(Response::row_set(rows.rewind())),
            (Canned::Count(count), _) => Ok(Response::count(*count)),
            (Canned::Call { rows, outputs }, Operation::CallSql(_)) => {
                let response = match rows {
                    Some(rows) => Response::row_set(rows.rewind()),
                    None => Response::count(0),
                };
                Ok(response.with_outputs(outputs.clone()))
            }
            (Canned::Call { .. }, _) => Err(Error::database_message(format!(
                "`{sql}` is registered as a procedure call"
            ))),
        }
    }
}

fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
