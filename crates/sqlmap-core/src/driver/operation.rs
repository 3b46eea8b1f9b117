mod call_sql;
pub use call_sql::CallSql;

mod exec_sql;
pub use exec_sql::ExecSql;

mod query_sql;
pub use query_sql::QuerySql;

use super::Params;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Run a stored procedure, returning rows and/or output parameters
    CallSql(CallSql),

    /// Execute a statement that returns an update count
    ExecSql(ExecSql),

    /// Execute a SQL query that returns rows
    QuerySql(QuerySql),
}

impl Operation {
    pub fn sql(&self) -> &str {
        match self {
            Operation::CallSql(op) => &op.sql,
            Operation::ExecSql(op) => &op.sql,
            Operation::QuerySql(op) => &op.sql,
        }
    }

    pub fn params(&self) -> &Params {
        match self {
            Operation::CallSql(op) => &op.params,
            Operation::ExecSql(op) => &op.params,
            Operation::QuerySql(op) => &op.params,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CallSql(_) => "call",
            Operation::ExecSql(_) => "exec",
            Operation::QuerySql(_) => "query",
        }
    }
}
