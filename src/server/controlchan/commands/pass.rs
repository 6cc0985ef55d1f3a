//! The RFC 959 Password (`PASS`) command
//
// The argument field is a Telnet string specifying the user's
// password.  This command must be immediately preceded by the
// user name command, and, for some sites, completes the user's
// identification for access control.

use crate::server::controlchan::command::Password;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::SessionState;
use crate::storage::Vfs;

use async_trait::async_trait;

#[derive(Debug)]
pub struct Pass {
    password: Password,
}

impl Pass {
    pub fn new(password: Password) -> Self {
        Pass { password }
    }
}

#[async_trait]
impl CommandHandler for Pass {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        match session.state {
            SessionState::WaitPass => {
                let Some(username) = session.username.clone() else {
                    return Ok(Reply::new(ReplyCode::BadCommandSequence, "Login with USER first."));
                };
                match args.authenticator.authenticate(&username, self.password.as_str()).await {
                    Ok(user) => match Vfs::attach(&args.server_root, &user.username).await {
                        Ok(vfs) => {
                            session.cwd = vfs.root().to_path_buf();
                            session.vfs = Some(vfs);
                            session.state = SessionState::WaitCmd;
                            slog::info!(args.logger, "user {} logged in", user.username);
                            Ok(Reply::new(ReplyCode::UserLoggedIn, "User logged in, proceed."))
                        }
                        Err(err) => {
                            slog::error!(args.logger, "could not open home directory for {}: {}", user.username, err);
                            session.state = SessionState::New;
                            session.username = None;
                            Ok(Reply::new(ReplyCode::LocalError, "Requested action aborted. Local error in processing."))
                        }
                    },
                    Err(err) => {
                        slog::info!(args.logger, "login failed for {}: {}", username, err);
                        session.state = SessionState::New;
                        session.username = None;
                        Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."))
                    }
                }
            }
            SessionState::New => Ok(Reply::new(ReplyCode::BadCommandSequence, "Login with USER first.")),
            SessionState::WaitCmd => Ok(Reply::new(ReplyCode::BadCommandSequence, "Already logged in.")),
        }
    }
}
