//! The RFC 959 Retrieve (`RETR`) command
//
// This command causes the server-DTP to transfer a copy of the
// file, specified in the pathname, to the user-DTP at the
// other end of the data connection.  The status and contents
// of the file at the server site shall be unaffected.

use crate::server::controlchan::commands::storage_error_reply;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataCommandExecutor;

use async_trait::async_trait;

#[derive(Debug)]
pub struct Retr {
    path: String,
}

impl Retr {
    pub fn new(path: String) -> Self {
        Retr { path }
    }
}

#[async_trait]
impl CommandHandler for Retr {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        // The endpoint is consumed by this attempt whether or not it succeeds.
        let Some(peer) = session.data_endpoint.take() else {
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection."));
        };
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };

        // The file must exist and be regular before the 150 goes out.
        let resolved = match vfs.resolve(&session.cwd, &self.path).await {
            Ok(resolved) => resolved,
            Err(err) => {
                slog::warn!(args.logger, "RETR of {:?} refused: {}", self.path, err);
                return Ok(storage_error_reply(&err));
            }
        };
        match vfs.metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(Reply::new(ReplyCode::FileError, "Not a plain file.")),
            Err(err) => return Ok(storage_error_reply(&err)),
        }

        let executor = DataCommandExecutor {
            logger: args.logger.clone(),
            tx: args.tx_control_chan.clone(),
            source_port: args.data_source_port,
            peer,
            vfs,
        };
        tokio::spawn(async move { executor.send_file(resolved).await });

        Ok(Reply::new(ReplyCode::FileStatusOkay, "File status okay; about to open data connection."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::controlchan::commands::test_support::{context, session};
    use crate::server::session::{SessionState, SharedSession};
    use crate::storage::Vfs;
    use pretty_assertions::assert_eq;
    use std::net::SocketAddrV4;

    async fn logged_in_session(vfs: &Vfs) -> SharedSession {
        let session = session();
        {
            let mut s = session.lock().await;
            s.state = SessionState::WaitCmd;
            s.cwd = vfs.root().to_path_buf();
            s.vfs = Some(vfs.clone());
        }
        session
    }

    #[tokio::test]
    async fn retr_without_a_declared_endpoint_is_refused() {
        let session = session();
        session.lock().await.state = SessionState::WaitCmd;
        let (ctx, _rx) = context(session.clone(), std::env::temp_dir());

        let reply = Retr::new("anything".into()).handle(ctx).await.unwrap();

        assert_eq!(reply, Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection."));
    }

    #[tokio::test]
    async fn retr_of_a_missing_file_consumes_the_endpoint_and_replies_550() {
        let server_root = tempfile::tempdir().unwrap();
        let vfs = Vfs::attach(server_root.path(), "alice").await.unwrap();

        let session = logged_in_session(&vfs).await;
        let endpoint: SocketAddrV4 = "127.0.0.1:5000".parse().unwrap();
        session.lock().await.data_endpoint = Some(endpoint);
        let (ctx, _rx) = context(session.clone(), server_root.path().to_path_buf());

        let reply = Retr::new("nope.bin".into()).handle(ctx).await.unwrap();

        assert_eq!(reply.code, ReplyCode::FileError);
        assert_eq!(session.lock().await.data_endpoint, None);
    }
}
