use super::Error;

/// Error when the SQL map configuration is invalid or incomplete.
///
/// This occurs when:
/// - A result map, statement, or discriminator sub-map is referenced but not registered
/// - A discriminator is set twice on the same result map
/// - A collection property cannot be instantiated
/// - No type handler exists for a primitive mapping
/// - A result class is required but missing
///
/// Most of these are caught when the catalog is built; the rest surface the
/// first time the offending mapping is applied.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
