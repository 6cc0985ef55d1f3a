//! The RFC 959 Data Port (`PORT`) command
//
// The argument is a HOST-PORT specification for the data port
// to be used in data connection.  The argument is the
// concatenation of a 32-bit internet host address and a 16-bit
// TCP port address, broken into six 8-bit fields:
//
// PORT h1,h2,h3,h4,p1,p2

use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::reply::{Reply, ReplyCode};

use async_trait::async_trait;
use std::net::SocketAddrV4;

#[derive(Debug)]
pub struct Port {
    addr: SocketAddrV4,
}

impl Port {
    pub fn new(addr: SocketAddrV4) -> Self {
        Port { addr }
    }
}

#[async_trait]
impl CommandHandler for Port {
    #[tracing_attributes::instrument]
    async fn handle(&self, args: CommandContext) -> Result<Reply, ControlChanError> {
        let mut session = args.session.lock().await;
        // The endpoint stands until the next data-bearing command takes it.
        session.data_endpoint = Some(self.addr);
        Ok(Reply::new(ReplyCode::CommandOkay, "PORT command successful."))
    }
}
