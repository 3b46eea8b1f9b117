use super::TypeHandler;
use crate::{
    driver::{Column, OutParams, Params, RowSet},
    stmt::{Type, Value},
    Result,
};

/// The fallback handler: values pass through as the driver reports them and
/// text parses to a string.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectTypeHandler;

impl TypeHandler for ObjectTypeHandler {
    fn ty(&self) -> Type {
        Type::Object
    }

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
            params.set(index, value.clone());
        }
        Ok(())
    }

    fn get_result(&self, rs: &mut dyn RowSet, column: Column<'_>) -> Result<Value> {
        let value = rs.get_object(column)?;
        Ok(if rs.was_null() { Value::Null } else { value })
    }

    fn get_call_result(&self, cs: &mut OutParams, index: usize) -> Result<Value> {
        let value = cs.get_object(index)?;
        Ok(if cs.was_null() { Value::Null } else { value })
    }

    fn value_of(&self, s: &str) -> Result<Value> {
        Ok(Value::from(s))
    }
}
