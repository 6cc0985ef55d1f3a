//! Per-connection session state.

use crate::storage::Vfs;

use std::net::{SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The authentication progress of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fresh connection, no username given yet.
    New,
    /// USER named a known user; waiting for PASS.
    WaitPass,
    /// Logged in; all verbs available.
    WaitCmd,
}

/// This is where we keep the state for a session.
///
/// Owned behind a mutex by the per-connection control loop; transfer workers
/// never touch it — they get immutable snapshots (paths, endpoint) instead.
#[derive(Debug)]
pub struct Session {
    /// The peer's control-connection address, for log context.
    pub source: SocketAddr,
    pub state: SessionState,
    /// The name given by USER; confirmed by PASS.
    pub username: Option<String>,
    /// The jailed filesystem view, present from successful login onwards.
    pub vfs: Option<Vfs>,
    /// Canonical absolute current directory; always inside the jail.
    pub cwd: PathBuf,
    /// The endpoint declared by the latest PORT. Taken (and thereby cleared)
    /// by the next data-bearing command attempt, successful or not.
    pub data_endpoint: Option<SocketAddrV4>,
    /// The source recorded by RNFR, consumed by RNTO. Any other intervening
    /// command clears it.
    pub rename_from: Option<PathBuf>,
}

impl Session {
    pub fn new(source: SocketAddr) -> Self {
        Session {
            source,
            state: SessionState::New,
            username: None,
            vfs: None,
            cwd: PathBuf::new(),
            data_endpoint: None,
            rename_from: None,
        }
    }
}

pub type SharedSession = Arc<Mutex<Session>>;
