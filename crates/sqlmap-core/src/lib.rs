#[macro_use]
mod macros;

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, ErrorContext, IntoError};

pub mod probe;
pub use probe::{GenericProbe, Probe};

pub mod stmt;

pub mod types;
pub use types::{TypeHandler, TypeHandlerFactory};

/// A Result type alias that uses sqlmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
