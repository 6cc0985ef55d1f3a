//! The RFC 959 Delete (`DELE`) command
//
// This command causes the file specified in the pathname to be
// deleted at the server site.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Dele {
    path: String,
}

impl Dele {
    pub fn new(path: String) -> Self {
        Dele { path }
    }
}

#[async_trait]
impl CommandHandler for Dele {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        let result = async {
            let resolved = vfs.resolve(&session.cwd, &self.path).await?;
            vfs.del(&resolved).await
        }
        .await;
        match result {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Requested file action okay, completed.")),
            Err(err) => {
                slog::warn!(args.logger, "DELE of {:?} failed: {}", self.path, err);
                Ok(storage_error_reply(&err))
            }
        }
    }
}
