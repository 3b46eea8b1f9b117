use super::{Error, ErrorContext};

/// Narration of the request step that failed, attached in front of the
/// underlying error.
#[derive(Debug)]
pub(super) struct RequestError {
    context: ErrorContext,
}

impl RequestError {
    pub(super) fn context(&self) -> &ErrorContext {
        &self.context
    }
}

impl std::error::Error for RequestError {}

impl core::fmt::Display for RequestError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.context, f)
    }
}

impl Error {
    /// Creates an error carrying a snapshot of the request's error context.
    ///
    /// Usually added with [`Error::context`] so it sits in front of the
    /// failure it describes.
    pub fn request(context: ErrorContext) -> Error {
        Error::from(super::ErrorKind::Request(RequestError { context }))
    }
}
