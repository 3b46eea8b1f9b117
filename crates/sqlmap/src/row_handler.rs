use crate::{stmt::Value, Result};

/// Receives result objects one at a time as a query streams.
///
/// Objects already handed over stay with the handler if a later row fails.
pub trait RowHandler: Send {
    fn handle_row(&mut self, value: Value) -> Result<()>;
}

impl<F> RowHandler for F
where
    F: FnMut(Value) -> Result<()> + Send,
{
    fn handle_row(&mut self, value: Value) -> Result<()> {
        self(value)
    }
}
