use super::Error;

/// Error reported by a database driver.
#[derive(Debug)]
pub(super) struct DatabaseError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // Display the error and walk its source chain
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a driver error.
    ///
    /// This is the preferred way to convert driver-specific errors (rusqlite
    /// errors and the like) into sqlmap errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Database(DatabaseError {
            inner: Box::new(err),
        }))
    }

    /// Creates a database error from a plain message.
    pub fn database_message(message: impl Into<String>) -> Error {
        let message: Box<dyn std::error::Error + Send + Sync> = message.into().into();
        Error::from(super::ErrorKind::Database(DatabaseError { inner: message }))
    }

    /// Returns `true` if this error, or any error it wraps, came from the database.
    pub fn is_database(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Database(_)))
    }
}
