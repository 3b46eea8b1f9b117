use parking_lot::Mutex;
use sqlmap_core::{driver::Operation, stmt::Value};
use std::sync::Arc;

/// A view of the operations a [`Memory`](crate::Memory) driver has executed
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops.lock().iter().any(predicate)
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops.lock().iter().filter(|op| predicate(op)).count()
    }

    pub fn has_query_sql(&self) -> bool {
        self.any(|op| matches!(op, Operation::QuerySql(_)))
    }

    pub fn has_exec_sql(&self) -> bool {
        self.any(|op| matches!(op, Operation::ExecSql(_)))
    }

    pub fn has_call_sql(&self) -> bool {
        self.any(|op| matches!(op, Operation::CallSql(_)))
    }

    /// Number of operations whose SQL contains `needle`
    pub fn count_sql(&self, needle: &str) -> usize {
        self.count(|op| op.sql().contains(needle))
    }

    /// Parameter values of every operation whose SQL contains `needle`, in
    /// execution order
    pub fn params_of(&self, needle: &str) -> Vec<Vec<Value>> {
        self.ops
            .lock()
            .iter()
            .filter(|op| op.sql().contains(needle))
            .map(|op| op.params().values().cloned().collect())
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.lock().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&mut self) -> Option<Operation> {
        let mut ops = self.ops.lock();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }

    /// Escape hatch for assertions the helpers don't cover
    pub fn with_ops<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Operation]) -> R,
    {
        f(&self.ops.lock())
    }
}
