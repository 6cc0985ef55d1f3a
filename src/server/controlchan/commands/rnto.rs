//! The RFC 959 Rename To (`RNTO`) command
//
// This command specifies the new pathname of the file
// specified in the immediately preceding "rename from"
// command.  Together the two commands cause a file to be
// renamed.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Rnto {
    path: String,
}

impl Rnto {
    pub fn new(path: String) -> Self {
        Rnto { path }
    }
}

#[async_trait]
impl CommandHandler for Rnto {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let Some(from) = session.rename_from.take() else {
            return Ok(Reply::new(ReplyCode::BadCommandSequence, "Bad sequence of commands."));
        };
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        let result = async {
            let to = vfs.resolve_for_create(&session.cwd, &self.path).await?;
            vfs.rename(&from, &to).await
        }
        .await;
        match result {
            Ok(()) => Ok(Reply::new(ReplyCode::FileActionOkay, "Requested file action okay, completed.")),
            Err(err) => {
                slog::warn!(args.logger, "RNTO {:?} -> {:?} failed: {}", from, self.path, err);
                Ok(storage_error_reply(&err))
            }
        }
    }
}
