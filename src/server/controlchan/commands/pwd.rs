//! The RFC 959 Print Working Directory (`PWD`) command
//
// This command causes the name of the current working
// directory to be returned in the reply.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Pwd;

#[async_trait]
impl CommandHandler for Pwd {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let session = args.session.lock().await;
        let Some(vfs) = session.vfs.as_ref() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };
        let mut display = vfs.display_path(&session.cwd);
        display.push('/');
        Ok(Reply::new_with_string(ReplyCode::DirCreated, format!("\"{display}\"")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::controlchan::commands::test_support::{context, session};
    use crate::server::session::SessionState;
    use crate::storage::Vfs;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn pwd_reports_the_jail_relative_directory() {
        let server_root = tempfile::tempdir().unwrap();
        let vfs = Vfs::attach(server_root.path(), "alice").await.unwrap();
        std::fs::create_dir(vfs.root().join("sub")).unwrap();

        let session = session();
        {
            let mut s = session.lock().await;
            s.state = SessionState::WaitCmd;
            s.cwd = vfs.root().join("sub");
            s.vfs = Some(vfs);
        }
        let (ctx, _rx) = context(session, server_root.path().to_path_buf());

        let reply = Pwd.handle(ctx).await.unwrap();
        assert_eq!(reply, Reply::new(ReplyCode::DirCreated, "\"/alice/sub/\""));
    }
}
