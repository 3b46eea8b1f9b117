use crate::stmt::Value;

/// Positional statement parameters, filled in by the type handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    params: Vec<Param>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Param {
    pub value: Value,

    /// SQL type hint given when the parameter was bound as null
    pub jdbc_type: Option<String>,
}

impl Params {
    pub fn new() -> Params {
        Params::default()
    }

    pub fn from_vec(values: Vec<Value>) -> Params {
        Params {
            params: values
                .into_iter()
                .map(|value| Param {
                    value,
                    jdbc_type: None,
                })
                .collect(),
        }
    }

    /// Binds `value` at the 0-based position `index`.
    pub fn set(&mut self, index: usize, value: Value) {
        *self.slot(index) = Param {
            value,
            jdbc_type: None,
        };
    }

    pub fn set_null(&mut self, index: usize, jdbc_type: Option<&str>) {
        *self.slot(index) = Param {
            value: Value::Null,
            jdbc_type: jdbc_type.map(str::to_string),
        };
    }

    fn slot(&mut self, index: usize) -> &mut Param {
        if self.params.len() <= index {
            self.params.resize_with(index + 1, Param::default);
        }
        &mut self.params[index]
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|param| &param.value)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.params.into_iter().map(|param| param.value).collect()
    }
}
