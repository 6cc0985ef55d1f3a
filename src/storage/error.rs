use crate::BoxError;
use derive_more::Display;
use thiserror::Error;

/// The error returned by [`Vfs`](crate::storage::Vfs) operations.
#[derive(Debug, Error)]
#[error("storage error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl Error {
    /// Creates a new storage error with the given kind and underlying cause.
    pub fn new<E>(kind: ErrorKind, source: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: Some(source.into()),
        }
    }

    /// The category of the failure, which decides the reply code sent to the client.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, source: None }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound
            | std::io::ErrorKind::NotADirectory
            | std::io::ErrorKind::IsADirectory
            | std::io::ErrorKind::DirectoryNotEmpty
            | std::io::ErrorKind::AlreadyExists => ErrorKind::PermanentFileNotAvailable,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::LocalError,
        };
        Error::new(kind, err)
    }
}

/// The `ErrorKind` variants that [`Vfs`](crate::storage::Vfs) operations can produce.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ErrorKind {
    /// 550 Requested action not taken. File unavailable (e.g., file not found).
    #[display("550 Permanent file not available")]
    PermanentFileNotAvailable,
    /// 550 Requested action not taken. Access to the file was denied.
    #[display("550 Permission denied")]
    PermissionDenied,
    /// 550 Requested action not taken. The path resolves outside the session's jail.
    #[display("550 Path outside of user root")]
    SandboxViolation,
    /// 451 Requested action aborted. Local error in processing.
    #[display("451 Local error")]
    LocalError,
}

/// Shorthand for results returned by [`Vfs`](crate::storage::Vfs) operations.
pub type Result<T> = std::result::Result<T, Error>;
