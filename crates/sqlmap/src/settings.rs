use crate::{Error, Result};

use serde::{Deserialize, Serialize};

/// Global switches for a SQL map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Nested selects into collection properties return a [`Lazy`] value that
    /// runs the statement on first access.
    ///
    /// [`Lazy`]: crate::stmt::Lazy
    pub lazy_loading_enabled: bool,

    /// Result maps and statements may refer to ids in their own namespace
    /// without the `namespace.` prefix.
    pub use_statement_namespaces: bool,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        serde_json::from_str(json)
            .map_err(|err| Error::configuration(format!("invalid settings: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings = Settings::from_json(r#"{ "lazy_loading_enabled": true }"#).unwrap();
        assert!(settings.lazy_loading_enabled);
        assert!(!settings.use_statement_namespaces);
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(err.is_configuration());
    }
}
