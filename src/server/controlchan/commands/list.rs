//! The RFC 959 List (`LIST`) command
//
// This command causes a list to be sent from the server to the
// client over the data connection.  This server sends the bare
// entry names of the session's current directory, one per
// CRLF-terminated line; dot-prefixed entries are omitted.

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::datachan::DataCommandExecutor;

use async_trait::async_trait;

#[derive(Debug)]
pub struct List;

#[async_trait]
impl CommandHandler for List {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        let Some(peer) = session.data_endpoint.take() else {
            return Ok(Reply::new(ReplyCode::CantOpenDataConnection, "Can't open data connection."));
        };
        let Some(vfs) = session.vfs.clone() else {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        };

        let executor = DataCommandExecutor {
            logger: args.logger.clone(),
            tx: args.tx_control_chan.clone(),
            source_port: args.data_source_port,
            peer,
            vfs,
        };
        let dir = session.cwd.clone();
        tokio::spawn(async move { executor.send_list(dir).await });

        Ok(Reply::new(ReplyCode::FileStatusOkay, "File status okay; about to open data connection."))
    }
}
