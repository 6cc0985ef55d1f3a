//! The RFC 959 User Name (`USER`) command
//
// The argument field is a Telnet string identifying the user.
// The user identification is that which is required by the
// server for access to its file system.  This command will
// normally be the first command transmitted by the user after
// the control connections are made.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::SessionState;

use async_trait::async_trait;

#[derive(Debug)]
pub struct User {
    username: String,
}

impl User {
    pub fn new(username: String) -> Self {
        User { username }
    }
}

#[async_trait]
impl CommandHandler for User {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        if args.authenticator.has_user(&self.username).await {
            // A USER in any state (re)starts the login exchange.
            session.username = Some(self.username.clone());
            session.state = SessionState::WaitPass;
            Ok(Reply::new(ReplyCode::NeedPassword, "Username OK, need password."))
        } else {
            slog::info!(args.logger, "USER for unknown name {:?}", self.username);
            session.username = None;
            session.state = SessionState::New;
            Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."))
        }
    }
}
