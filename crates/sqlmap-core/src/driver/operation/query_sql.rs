use super::{Operation, Params};

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySql {
    /// The SQL query to execute, with `?` placeholders
    pub sql: String,

    /// Positional parameters
    pub params: Params,
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
