//! The RFC 959 Logout (`QUIT`) command.
//
// This command terminates a USER and the server closes the
// control connection.  An unexpected close on the control
// connection will cause the server to take the effective
// action of a logout.

use crate::server::chancomms::ControlChanMsg;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;

#[derive(Debug)]
pub struct Quit;

#[async_trait]
impl CommandHandler for Quit {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        // Let the control loop know it can exit; the streams close when the
        // loop task drops them, not here.
        if let Err(err) = args.tx_control_chan.send(ControlChanMsg::ExitControlLoop).await {
            slog::warn!(args.logger, "could not send internal message: QUIT. {}", err);
        }
        Ok(Reply::new(ReplyCode::ClosingControlConnection, "Service closing control connection."))
    }
}
