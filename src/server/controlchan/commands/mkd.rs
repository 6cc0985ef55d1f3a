//! The RFC 959 Make Directory (`MKD`) command
//
// This command causes the directory specified in the pathname
// to be created as a directory (if the pathname is absolute)
// or as a subdirectory of the current working directory (if
// the pathname is relative).

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Mkd {
    path: String,
}

impl Mkd {
    pub fn new(path: String) -> Self {
        Mkd { path }
    }
}

#[async_trait]
impl CommandHandler for Mkd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        let resolved = match vfs.resolve_for_create(&session.cwd, &self.path).await {
            Ok(resolved) => resolved,
            Err(err) => {
                slog::warn!(args.logger, "MKD of {:?} refused: {}", self.path, err);
                return Ok(storage_error_reply(&err));
            }
        };
        match vfs.mkd(&resolved).await {
            Ok(()) => Ok(Reply::new_with_string(
                ReplyCode::DirCreated,
                format!("\"{}\"", vfs.display_path(&resolved)),
            )),
            Err(err) => {
                slog::warn!(args.logger, "MKD of {:?} failed: {}", self.path, err);
                Ok(storage_error_reply(&err))
            }
        }
    }
}
