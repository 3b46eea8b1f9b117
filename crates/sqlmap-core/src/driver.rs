pub mod convert;

mod memory_row_set;
pub use memory_row_set::MemoryRowSet;

pub mod operation;
pub use operation::Operation;

mod out_params;
pub use out_params::OutParams;

mod params;
pub use params::{Param, Params};

mod response;
pub use response::{Response, Rows};

mod row_set;
pub use row_set::{Column, RowSet};

use crate::{async_trait, Result};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// Creates a new connection to the database.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
