use super::TypeHandler;
use crate::{
    driver::{convert, Column, OutParams, RowSet},
    stmt::{Type, Value},
    Error, Result,
};

macro_rules! scalar_type_handlers {
    (
        $(
            $( #[$attr:meta] )*
            $name:ident => $ty:ident, $getter:ident, |$s:ident| $value_of:expr;
        )*
    ) => {
        $(
            $( #[$attr] )*
            #[derive(Debug, Default, Clone, Copy)]
            pub struct $name;

            impl TypeHandler for $name {
                fn ty(&self) -> Type {
                    Type::$ty
                }

                fn get_result(&self, rs: &mut dyn RowSet, column: Column<'_>) -> Result<Value> {
                    let value = rs.$getter(column)?;
                    Ok(if rs.was_null() { Value::Null } else { Value::from(value) })
                }

                fn get_call_result(&self, cs: &mut OutParams, index: usize) -> Result<Value> {
                    let value = cs.$getter(index)?;
                    Ok(if cs.was_null() { Value::Null } else { Value::from(value) })
                }

                fn value_of(&self, $s: &str) -> Result<Value> {
                    $value_of
                }
            }
        )*
    };
}

scalar_type_handlers! {
    /// `bool`; accepts `true`/`false` and `1`/`0` as text.
    BooleanTypeHandler => Bool, get_bool, |s| convert::to_bool(&Value::from(s)).map(Value::from);

    /// 32-bit integers.
    IntegerTypeHandler => I32, get_i32, |s| s
        .trim()
        .parse::<i32>()
        .map(Value::from)
        .map_err(|_| Error::parse(s, "an i32"));

    /// 64-bit integers.
    LongTypeHandler => I64, get_i64, |s| s
        .trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| Error::parse(s, "an i64"));

    DoubleTypeHandler => F64, get_f64, |s| s
        .trim()
        .parse::<f64>()
        .map(Value::from)
        .map_err(|_| Error::parse(s, "an f64"));

    StringTypeHandler => String, get_string, |s| Ok(Value::from(s));

    BytesTypeHandler => Bytes, get_bytes, |s| Ok(Value::Bytes(s.as_bytes().to_vec()));
}
