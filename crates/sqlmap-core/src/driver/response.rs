use super::{OutParams, RowSet};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,

    /// Output parameters of a procedure call
    pub outputs: Option<OutParams>,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a forward cursor over rows
    Values(Box<dyn RowSet>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            outputs: None,
        }
    }

    pub fn row_set(rows: impl RowSet) -> Self {
        Self {
            rows: Rows::Values(Box::new(rows)),
            outputs: None,
        }
    }

    pub fn with_outputs(mut self, outputs: OutParams) -> Self {
        self.outputs = Some(outputs);
        self
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    /// The update count. Row-returning responses report zero.
    pub fn count(&self) -> u64 {
        match self {
            Rows::Count(count) => *count,
            Rows::Values(_) => 0,
        }
    }

    #[track_caller]
    pub fn into_values(self) -> Box<dyn RowSet> {
        match self {
            Self::Values(values) => values,
            _ => panic!("expected Rows::Values; actual={self:#?}"),
        }
    }
}
