//! Contains the error type used by `Server`.

use crate::BoxError;

use std::net::AddrParseError;
use thiserror::Error;

/// Error returned by the [`Server::listen`](crate::Server::listen) method.
/// These failures are fatal to the whole server, not to one session.
#[derive(Error, Debug)]
#[error("server error: {msg}")]
pub struct ServerError {
    msg: String,
    #[source]
    source: Option<BoxError>,
}

impl ServerError {
    pub(crate) fn new(msg: impl Into<String>) -> ServerError {
        ServerError {
            msg: msg.into(),
            source: None,
        }
    }

    pub(crate) fn with_source<E: std::error::Error + Send + Sync + 'static>(msg: impl Into<String>, source: E) -> ServerError {
        ServerError {
            msg: msg.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<AddrParseError> for ServerError {
    fn from(e: AddrParseError) -> Self {
        ServerError::with_source("could not parse address", e)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::with_source("io error", e)
    }
}
