pub mod catalog;
pub use catalog::Catalog;

mod client;
pub use client::{Builder, SqlMap};

pub mod exchange;

pub mod loader;
pub use loader::ResultLoader;

pub mod mapping;
pub use mapping::{ColumnSpec, Discriminator, ResultMap, ResultMapping};

mod row_handler;
pub use row_handler::RowHandler;

pub mod scope;
pub use scope::RequestScope;

mod session;
pub use session::Session;

pub mod settings;
pub use settings::Settings;

pub mod statement;
pub use statement::{MappedStatement, StatementKind};

pub use sqlmap_core::{
    async_trait,
    driver::{self, Driver},
    bail, err, map, probe, stmt, types, Error, ErrorContext, Result,
};
