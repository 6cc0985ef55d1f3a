//! portside is a small multi-user FTP server library speaking RFC 959
//! active mode.
//!
//! It accepts many concurrent control connections, walks each session
//! through the USER/PASS login exchange, and jails every user inside
//! `<server-root>/<username>`. Data transfers (LIST, RETR, STOR) run over
//! connections the *server* originates to the endpoint the client declared
//! with PORT, each in its own worker task so a slow transfer never stalls
//! other sessions' control traffic.
//!
//! # Quick Start
//!
//! ```no_run
//! use portside::Server;
//! use portside::auth::CsvFileAuthenticator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! pub async fn main() {
//!     let authenticator = CsvFileAuthenticator::from_file("users.csv").unwrap();
//!     let server = Server::new("/srv/ftp", Arc::new(authenticator))
//!         .greeting("Welcome to my FTP server")
//!         .max_sessions(10);
//!
//!     server.listen("0.0.0.0:2121").await.unwrap();
//! }
//! ```
//!
//! Passive mode, TLS and IPv6 are out of scope; see the `portsided` binary
//! for a ready-made daemon around this library.

pub mod auth;
pub(crate) mod server;
pub mod storage;

pub use crate::server::ftpserver::{Server, error::ServerError};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
