//! [`Authenticator`] implementation backed by a two-column CSV file.

use super::{AuthenticationError, Authenticator, User};

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

// The original wire format caps both fields; longer records are treated as
// malformed and skipped like any other bad line.
const MAX_FIELD_LEN: usize = 49;

/// Authenticates against credentials loaded from a `username,password` file.
///
/// One record per line, no header. Trailing carriage returns are tolerated,
/// empty and malformed lines are skipped, and the first record for a given
/// username wins. The store is read-only after loading.
#[derive(Debug)]
pub struct CsvFileAuthenticator {
    credentials: HashMap<String, String>,
}

/// The error returned when the credentials file cannot be read at startup.
#[derive(Debug, Error)]
#[error("failed to read credentials file {path}")]
pub struct LoadError {
    path: String,
    #[source]
    source: std::io::Error,
}

impl CsvFileAuthenticator {
    /// Loads the credential file. Failure to open or read it is fatal to
    /// server startup, so this returns an error instead of an empty store.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CsvFileAuthenticator, LoadError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|source| LoadError {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Ok(Self::from_records(&contents))
    }

    fn from_records(contents: &str) -> CsvFileAuthenticator {
        let mut credentials: HashMap<String, String> = HashMap::new();
        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            let Some((username, password)) = line.split_once(',') else {
                continue;
            };
            if username.is_empty() || username.len() > MAX_FIELD_LEN || password.len() > MAX_FIELD_LEN {
                continue;
            }
            credentials
                .entry(username.to_string())
                .or_insert_with(|| password.to_string());
        }
        CsvFileAuthenticator { credentials }
    }
}

#[async_trait]
impl Authenticator for CsvFileAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthenticationError> {
        match self.credentials.get(username) {
            Some(stored) if stored == password => Ok(User {
                username: username.to_string(),
            }),
            Some(_) => Err(AuthenticationError::BadPassword),
            None => Err(AuthenticationError::BadUser),
        }
    }

    async fn has_user(&self, username: &str) -> bool {
        self.credentials.contains_key(username)
    }
}
