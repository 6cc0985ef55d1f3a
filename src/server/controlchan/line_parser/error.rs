use derive_more::Display;
use thiserror::Error;

/// The error returned when a control line cannot be parsed into a
/// [`Command`](crate::server::controlchan::command::Command).
///
/// Parse failures are recoverable: the session replies 500 or 501 and keeps
/// going, so this is a value the control loop turns into a reply rather than
/// an error that tears the connection down.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("parse error: {kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
}

/// A list specifying the categories of parse errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Display)]
pub enum ParseErrorKind {
    /// The line carries no verb at all. Replied to with 500.
    #[display("empty command line")]
    EmptyLine,
    /// The line contains bytes that are not valid UTF-8. Replied to with 500.
    #[display("non-UTF8 character in command")]
    InvalidUtf8,
    /// The verb is known but its parameters are malformed. Replied to with 501.
    #[display("invalid parameter")]
    InvalidParameter,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> ParseError {
        ParseError { kind }
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(_: std::str::Utf8Error) -> ParseError {
        ParseError {
            kind: ParseErrorKind::InvalidUtf8,
        }
    }
}

/// Shorthand for results produced by the line parser.
pub type Result<T> = std::result::Result<T, ParseError>;
