use super::*;

/// Accessor for DOM nodes. Properties are child elements; scalar values are
/// stored as text and DOM values are grafted as children, so any value can be
/// written.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomProbe;

fn expect_dom<'a>(object: &'a Value, path: &str) -> Result<&'a Object> {
    let object = as_object(object, path)?;
    if object.is_dom() {
        Ok(object)
    } else {
        Err(Error::configuration(format!(
            "cannot access '{path}' with a DOM accessor; the object is a {}",
            object.ty().name()
        )))
    }
}

impl Probe for DomProbe {
    fn get(&self, object: &Value, path: &str) -> Result<Value> {
        expect_dom(object, path)?.get(path)
    }

    fn set(&self, object: &Value, path: &str, value: Value) -> Result<()> {
        expect_dom(object, path)?.set(path, value)
    }

    fn type_for_setter(&self, object: &Value, path: &str) -> Result<Type> {
        expect_dom(object, path)?;
        Ok(Type::Object)
    }

    fn update(
        &self,
        object: &Value,
        path: &str,
        f: &mut dyn FnMut(&mut Value) -> Result<()>,
    ) -> Result<()> {
        expect_dom(object, path)?;
        update_path(object, path, f)
    }
}
