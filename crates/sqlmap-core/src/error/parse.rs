use super::Error;

/// Error when a textual value, usually a null sentinel, does not match the
/// form its type handler expects.
#[derive(Debug)]
pub(super) struct ParseError {
    input: Box<str>,
    expected: Box<str>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot parse `{}` as {}", self.input, self.expected)
    }
}

impl Error {
    /// Creates a parse error for `input`, describing the form that was expected.
    pub fn parse(input: impl Into<String>, expected: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            input: input.into().into(),
            expected: expected.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a parse error.
    pub fn is_parse(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Parse(_)))
    }
}
