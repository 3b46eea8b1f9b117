//! Value coercers: conversions between one column type and one host type.

mod factory;
pub use factory::TypeHandlerFactory;

mod object;
pub use object::ObjectTypeHandler;

mod scalar;
pub use scalar::{
    BooleanTypeHandler, BytesTypeHandler, DoubleTypeHandler, IntegerTypeHandler,
    LongTypeHandler, StringTypeHandler,
};

mod timestamp;
pub use timestamp::SqlTimestampTypeHandler;

use crate::{
    driver::{Column, OutParams, Params, RowSet},
    stmt::{Type, Value},
    Result,
};

use std::fmt::Debug;

/// Converts values between a column type and a host type.
///
/// Reads must consult the row set's null indicator after reading: the typed
/// getters return defaults for SQL null, and a handler reports `Value::Null`
/// in that case.
pub trait TypeHandler: Debug + Send + Sync + 'static {
    /// The host type this handler produces.
    fn ty(&self) -> Type;

    /// Binds `value` at the 0-based position `index`.
    fn set_parameter(
        &self,
        params: &mut Params,
        index: usize,
        value: &Value,
        jdbc_type: Option<&str>,
    ) -> Result<()> {
        if value.is_null() {
            params.set_null(index, jdbc_type);
        } else {
            params.set(index, self.ty().cast(value.clone())?);
        }
        Ok(())
    }

    /// Reads a column of the row set's current row.
    fn get_result(&self, rs: &mut dyn RowSet, column: Column<'_>) -> Result<Value>;

    /// Reads an output parameter of a procedure call.
    fn get_call_result(&self, cs: &mut OutParams, index: usize) -> Result<Value>;

    /// Parses the textual form of a value, as used by null sentinels.
    fn value_of(&self, s: &str) -> Result<Value>;
}
