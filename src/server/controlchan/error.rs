//! Contains the `ControlChanError` type for failures that end a session.
//!
//! Parse failures are *not* errors here; they surface as 500/501 replies via
//! [`ParseError`](super::line_parser::error::ParseError) and the session
//! lives on. This type covers the fatal cases: I/O on the control socket and
//! a command line that outgrows the line buffer.

use crate::BoxError;
use derive_more::Display;
use thiserror::Error;

/// The error type that tears down a control channel.
#[derive(Debug, Error)]
#[error("control channel error: {kind}")]
pub struct ControlChanError {
    kind: ControlChanErrorKind,
    #[source]
    source: Option<BoxError>,
}

/// A list specifying categories of fatal control channel errors.
#[derive(Eq, PartialEq, Debug, Display)]
pub enum ControlChanErrorKind {
    /// We encountered a system IO error.
    #[display("failed to perform IO on the control channel")]
    IoError,
    /// The peer sent more than a line buffer's worth of bytes without a newline.
    #[display("command line exceeds the line buffer")]
    CommandLineTooLong,
}

impl From<ControlChanErrorKind> for ControlChanError {
    fn from(kind: ControlChanErrorKind) -> ControlChanError {
        ControlChanError { kind, source: None }
    }
}

impl From<std::io::Error> for ControlChanError {
    fn from(err: std::io::Error) -> ControlChanError {
        ControlChanError {
            kind: ControlChanErrorKind::IoError,
            source: Some(Box::new(err)),
        }
    }
}
