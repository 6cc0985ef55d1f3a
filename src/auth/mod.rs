//! The authentication seam and its built-in credential store.
//!
//! The server asks an [`Authenticator`] two questions: whether a username is
//! known at USER time, and whether a username/password pair is valid at PASS
//! time. The shipped implementation is [`CsvFileAuthenticator`], which loads
//! a `username,password` file once at startup.

mod csv_file;

pub use csv_file::{CsvFileAuthenticator, LoadError};

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// A successfully authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The name the user logged in with; also names the user's jail directory.
    pub username: String,
}

/// The error returned by [`Authenticator::authenticate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The username is not known to the credential store.
    #[error("unknown user")]
    BadUser,
    /// The username exists but the password does not match.
    #[error("bad password")]
    BadPassword,
}

/// Defines the requirements for authentication back-ends.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Authenticates the given user with the given password.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthenticationError>;

    /// Tells whether the store knows the given username at all. USER replies
    /// 331 only for names that can possibly log in.
    async fn has_user(&self, username: &str) -> bool;
}
