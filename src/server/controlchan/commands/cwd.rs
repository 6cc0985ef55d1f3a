//! The RFC 959 Change Working Directory (`CWD`) command
//
// This command allows the user to work with a different
// directory for file storage or retrieval without altering his
// login or accounting information.  Transfer parameters are
// similarly unchanged.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Cwd {
    path: String,
}

impl Cwd {
    pub fn new(path: String) -> Self {
        Cwd { path }
    }
}

#[async_trait]
impl CommandHandler for Cwd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        let resolved = match vfs.resolve(&session.cwd, &self.path).await {
            Ok(resolved) => resolved,
            Err(err) => {
                slog::warn!(args.logger, "CWD to {:?} denied: {}", self.path, err);
                return Ok(storage_error_reply(&err));
            }
        };
        match vfs.metadata(&resolved).await {
            Ok(meta) if meta.is_dir() => {
                session.cwd = resolved;
                Ok(Reply::new_with_string(
                    ReplyCode::CommandOkay,
                    format!("directory changed to {}", vfs.display_path(&session.cwd)),
                ))
            }
            Ok(_) => Ok(Reply::new(ReplyCode::FileError, "Not a directory.")),
            Err(err) => {
                slog::warn!(args.logger, "CWD to {:?} failed: {}", self.path, err);
                Ok(storage_error_reply(&err))
            }
        }
    }
}
