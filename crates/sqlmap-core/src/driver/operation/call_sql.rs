use super::{Operation, Params};
use crate::stmt::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct CallSql {
    /// The procedure call, e.g. `{call next_id(?, ?)}`
    pub sql: String,

    /// Input parameters. Output-only positions are bound as null.
    pub params: Params,

    /// Output parameter positions (0-based) and their expected host types
    pub outputs: Vec<(usize, Type)>,
}

impl From<CallSql> for Operation {
    fn from(value: CallSql) -> Self {
        Self::CallSql(value)
    }
}
