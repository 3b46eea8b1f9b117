mod adhoc;
mod configuration;
mod context;
mod database;
mod parse;
mod protocol;
mod request;
mod too_many_results;
mod type_conversion;

use adhoc::AdhocError;
use configuration::ConfigurationError;
use database::DatabaseError;
use parse::ParseError;
use protocol::ProtocolError;
use request::RequestError;
use too_many_results::TooManyResultsError;
use type_conversion::TypeConversionError;

pub use context::ErrorContext;

use std::sync::Arc;

/// Returns early with an ad hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while configuring or executing a SQL map.
///
/// The error is one pointer wide. Errors form a chain: [`Error::context`]
/// puts a new error in front of an existing one, and the `Display`
/// implementation walks the chain from the most recent context down to the
/// root cause.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;

        match Arc::get_mut(&mut err.inner) {
            Some(inner) if inner.cause.is_none() => {
                inner.cause = Some(self);
                err
            }
            // The consequent is shared or already chained; re-root its message.
            _ => Error {
                inner: Arc::new(ErrorInner {
                    kind: ErrorKind::Adhoc(AdhocError::new(err.to_string())),
                    cause: Some(self),
                }),
            },
        }
    }

    /// Creates an ad hoc error from format arguments.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    /// Returns the error context captured when the request failed, if any.
    pub fn error_context(&self) -> Option<&ErrorContext> {
        self.chain().find_map(|err| match err.kind() {
            ErrorKind::Request(request) => Some(request.context()),
            _ => None,
        })
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    fn any_kind(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Database(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => self
                .inner
                .cause
                .as_ref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Configuration(ConfigurationError),
    Protocol(ProtocolError),
    Database(DatabaseError),
    Parse(ParseError),
    TypeConversion(TypeConversionError),
    TooManyResults(TooManyResultsError),
    Request(RequestError),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Configuration(err) => core::fmt::Display::fmt(err, f),
            Protocol(err) => core::fmt::Display::fmt(err, f),
            Database(err) => core::fmt::Display::fmt(err, f),
            Parse(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            TooManyResults(err) => core::fmt::Display::fmt(err, f),
            Request(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for ErrorContext {
    fn into_error(self) -> Error {
        Error::request(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Error stays at one word (size of an Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = err!("test error: {}", 42);
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let mid = err!("middle context");
        let top = err!("top context");

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn context_on_already_chained_consequent() {
        let consequent = err!("b").context(err!("a"));
        let err = err!("root").context(consequent);
        assert_eq!(err.to_string(), "a: b: root");
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn predicates_look_through_context() {
        let err = Error::database_message("connection reset")
            .context(err!("Check the result mapping for the 'id' property."));
        assert!(err.is_database());
        assert!(!err.is_configuration());
    }

    #[test]
    fn configuration_error() {
        let err = Error::configuration("there is no result map named OrderMap");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "configuration error: there is no result map named OrderMap"
        );
    }

    #[test]
    fn protocol_error() {
        let err = Error::protocol("Delete statements cannot be executed as a query.");
        assert!(err.is_protocol());
        assert_eq!(
            err.to_string(),
            "protocol error: Delete statements cannot be executed as a query."
        );
    }

    #[test]
    fn parse_error() {
        let err = Error::parse("abc", "an integer");
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "cannot parse `abc` as an integer");
    }

    #[test]
    fn type_conversion_error() {
        let value = crate::stmt::Value::I64(i64::MAX);
        let err = Error::type_conversion(value, "i32");
        assert!(err.is_type_conversion());
        assert_eq!(err.to_string(), "cannot convert I64 to i32");
    }

    #[test]
    fn request_context_is_recoverable() {
        let mut cx = ErrorContext::default();
        cx.set_activity("applying a result map");
        cx.set_object_id("OrderMap");

        let err = Error::database_message("boom").context(cx.clone());
        assert_eq!(err.error_context(), Some(&cx));
        assert!(err.is_database());
        assert_eq!(
            err.to_string(),
            "the error occurred while applying a result map. check the OrderMap.: boom"
        );
    }
}
