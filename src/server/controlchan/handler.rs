use crate::auth::Authenticator;
use crate::server::chancomms::ControlChanMsg;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::reply::Reply;
use crate::server::session::SharedSession;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

// Common interface for all handlers of `Command`s.
#[async_trait]
pub trait CommandHandler: Send + Sync + std::fmt::Debug {
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError>;
}

/// Represents arguments passed to a `CommandHandler`.
#[derive(Debug)]
pub struct CommandContext {
    pub session: SharedSession,
    pub authenticator: Arc<dyn Authenticator>,
    pub tx_control_chan: Sender<ControlChanMsg>,
    /// Canonical server root; per-user jails live directly beneath it.
    pub server_root: PathBuf,
    /// Source port for active-mode data connections (0 = ephemeral).
    pub data_source_port: u16,
    pub logger: slog::Logger,
}
