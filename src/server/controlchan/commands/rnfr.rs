//! The RFC 959 Rename From (`RNFR`) command
//
// This command specifies the old pathname of the file which is
// to be renamed.  This command must be immediately followed by
// a "rename to" command specifying the new file pathname.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Rnfr {
    path: String,
}

impl Rnfr {
    pub fn new(path: String) -> Self {
        Rnfr { path }
    }
}

#[async_trait]
impl CommandHandler for Rnfr {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        // The source must exist now; it is remembered only until the next command.
        match vfs.resolve(&session.cwd, &self.path).await {
            Ok(resolved) => {
                session.rename_from = Some(resolved);
                Ok(Reply::new(ReplyCode::FileActionPending, "Requested file action pending further information."))
            }
            Err(err) => {
                slog::warn!(args.logger, "RNFR of {:?} refused: {}", self.path, err);
                Ok(storage_error_reply(&err))
            }
        }
    }
}
