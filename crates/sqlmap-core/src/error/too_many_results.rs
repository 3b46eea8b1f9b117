use super::Error;

/// Error when a query for a single object produced more than one.
#[derive(Debug)]
pub(super) struct TooManyResultsError {
    count: usize,
}

impl std::error::Error for TooManyResultsError {}

impl core::fmt::Display for TooManyResultsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "query for object returned too many results (at least {})",
            self.count
        )
    }
}

impl Error {
    /// Creates a too-many-results error.
    pub fn too_many_results(count: usize) -> Error {
        Error::from(super::ErrorKind::TooManyResults(TooManyResultsError { count }))
    }

    /// Returns `true` if this error, or any error it wraps, is a too-many-results error.
    pub fn is_too_many_results(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::TooManyResults(_)))
    }
}
