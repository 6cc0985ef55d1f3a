//! Messages that flow from transfer workers back to the control loop.

use crate::storage;

/// Status reported by a transfer worker (or the QUIT handler) to the
/// per-session control loop, which turns it into the final control reply.
#[derive(Debug)]
pub enum ControlChanMsg {
    /// The file was streamed to the client.
    SentData {
        /// The number of bytes transferred.
        bytes: u64,
    },
    /// The client's upload was committed to disk.
    WrittenData {
        /// The number of bytes transferred.
        bytes: u64,
    },
    /// The directory listing was delivered.
    DirectoryListed,
    /// The active-mode connect to the client's declared endpoint failed.
    DataConnectionFailed,
    /// The worker hit a filesystem or local error; the kind picks 550 or 451.
    StorageError(storage::Error),
    /// QUIT was processed; the control loop should exit.
    ExitControlLoop,
}
