use super::{Operation, Params};

#[derive(Debug, Clone, PartialEq)]
pub struct ExecSql {
    /// The SQL statement to execute, with `?` placeholders
    pub sql: String,

    /// Positional parameters
    pub params: Params,
}

impl From<ExecSql> for Operation {
    fn from(value: ExecSql) -> Self {
        Self::ExecSql(value)
    }
}
