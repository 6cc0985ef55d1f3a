//! The RFC 959 Store (`STOR`) command
//
// This command causes the server-DTP to accept the data
// transferred via the data connection and to store the data as
// a file at the server site.  If the file specified in the
// pathname exists at the server site, then its contents shall
// be replaced by the data being transferred.  A new file is
// created at the server site if the file specified in the
// pathname does not already exist.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataCommandExecutor;

use async_trait::async_trait;

#[derive(Debug)]
pub struct Stor {
    path: String,
}

impl Stor {
    pub fn new(path: String) -> Self {
        Stor { path }
    }
}

#[async_trait]
impl CommandHandler for Stor {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let Some(peer) = session.data_endpoint.take() else {
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection."));
        };
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };

        // The destination must land inside the jail before the 150 goes out;
        // the upload itself is committed atomically by the worker.
        let dest = match vfs.resolve_for_create(&session.cwd, &self.path).await {
            Ok(dest) => dest,
            Err(err) => {
                slog::warn!(args.logger, "STOR to {:?} refused: {}", self.path, err);
                return Ok(storage_error_reply(&err));
            }
        };
        // The jail root itself can never be a store target; rejecting it here
        // also keeps the temp file from landing in its parent.
        if dest == vfs.root() {
            return Ok(Reply::new(ReplyCode::FileError, "Not a plain file."));
        }

        let executor = DataCommandExecutor {
            logger: args.logger.clone(),
            tx: args.tx_control_chan.clone(),
            source_port: args.data_source_port,
            peer,
            vfs,
        };
        tokio::spawn(async move { executor.receive_file(dest).await });

        Ok(Reply::new(ReplyCode::FileStatusOkay, "File status okay; about to open data connection."))
    }
}
