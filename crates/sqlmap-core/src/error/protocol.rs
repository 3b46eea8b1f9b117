use super::Error;

/// Error when an operation is invoked on a statement kind that cannot serve it,
/// such as running an `update` statement as a query.
#[derive(Debug)]
pub(super) struct ProtocolError {
    message: Box<str>,
}

impl std::error::Error for ProtocolError {}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "protocol error: {}", self.message)
    }
}

impl Error {
    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Protocol(ProtocolError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a protocol error.
    pub fn is_protocol(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Protocol(_)))
    }
}
