use super::*;

/// Accessor for bean instances. Only declared properties may be written, and
/// values are converted to the declared property type.
#[derive(Debug, Default, Clone, Copy)]
pub struct BeanProbe;

fn expect_bean(object: &Value, path: &str) -> Result<()> {
    if as_object(object, path)?.is_bean() {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "cannot access '{path}' with a bean accessor; the object is a {}",
            as_object(object, path)?.ty().name()
        )))
    }
}

impl Probe for BeanProbe {
    fn get(&self, object: &Value, path: &str) -> Result<Value> {
        expect_bean(object, path)?;
        get_path(object, path)
    }

    fn set(&self, object: &Value, path: &str, value: Value) -> Result<()> {
        expect_bean(object, path)?;
        set_path(object, path, value)
    }

    fn type_for_setter(&self, object: &Value, path: &str) -> Result<Type> {
        expect_bean(object, path)?;
        setter_type_path(object, path)
    }

    fn update(
        &self,
        object: &Value,
        path: &str,
        f: &mut dyn FnMut(&mut Value) -> Result<()>,
    ) -> Result<()> {
        expect_bean(object, path)?;
        update_path(object, path, f)
    }
}
