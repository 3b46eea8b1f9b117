use super::*;

/// Accessor for associative maps. Any property may be written.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapProbe;

fn expect_map(object: &Value, path: &str) -> Result<()> {
    if as_object(object, path)?.is_map() {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "cannot access '{path}' with a map accessor; the object is a {}",
            as_object(object, path)?.ty().name()
        )))
    }
}

impl Probe for MapProbe {
    fn get(&self, object: &Value, path: &str) -> Result<Value> {
        expect_map(object, path)?;
        get_path(object, path)
    }

    fn set(&self, object: &Value, path: &str, value: Value) -> Result<()> {
        expect_map(object, path)?;
        set_path(object, path, value)
    }

    fn type_for_setter(&self, object: &Value, path: &str) -> Result<Type> {
        expect_map(object, path)?;
        setter_type_path(object, path)
    }

    fn update(
        &self,
        object: &Value,
        path: &str,
        f: &mut dyn FnMut(&mut Value) -> Result<()>,
    ) -> Result<()> {
        expect_map(object, path)?;
        update_path(object, path, f)
    }
}
