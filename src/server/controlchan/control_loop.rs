//! The per-connection control channel event loop.

use crate::auth::Authenticator;
use crate::server::chancomms::ControlChanMsg;
use crate::server::controlchan::codecs::FtpCodec;
use crate::server::controlchan::command::Command;
use crate::server::controlchan::commands;
use crate::server::controlchan::error::ControlChanError;
use crate::server::controlchan::handler::{CommandContext, CommandHandler};
use crate::server::controlchan::line_parser::error::{ParseError, ParseErrorKind};
use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::server::session::{Session, SessionState, SharedSession};

use futures_util::{SinkExt, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, Sender};
use tokio::sync::{Mutex, OwnedSemaphorePermit};
use tokio_util::codec::Framed;

// Placeholder duration for the idle branch when no timeout is configured;
// the branch is disabled in that case and the sleep never completes.
const IDLE_FALLBACK: Duration = Duration::from_secs(24 * 60 * 60);

/// Per-server parameters handed to each spawned control loop.
#[derive(Debug)]
pub struct LoopConfig {
    pub authenticator: Arc<dyn Authenticator>,
    /// Canonical server root under which the per-user jails live.
    pub server_root: PathBuf,
    pub greeting: String,
    /// Source port for active-mode data connections (0 = ephemeral).
    pub data_source_port: u16,
    /// Close sessions that stay quiet longer than this, when set.
    pub idle_timeout: Option<Duration>,
    pub logger: slog::Logger,
}

/// Greets the peer and spawns the control loop task for one accepted
/// control connection. The task owns the session, the framed stream and the
/// semaphore permit; everything is released when it returns.
pub async fn spawn_loop(
    config: LoopConfig,
    tcp_stream: TcpStream,
    permit: OwnedSemaphorePermit,
) -> Result<(), ControlChanError> {
    let source = tcp_stream.peer_addr()?;
    let logger = config.logger.new(slog::o!("peer" => source.to_string()));
    let session: SharedSession = Arc::new(Mutex::new(Session::new(source)));
    let (tx, mut rx) = mpsc::channel::<ControlChanMsg>(8);

    let framed = Framed::new(tcp_stream, FtpCodec::new());
    let (mut reply_sink, mut command_source) = framed.split();
    reply_sink.send(Reply::new(ReplyCode::ServiceReady, &config.greeting)).await?;

    tokio::spawn(async move {
        let _permit = permit;
        // While a transfer is in flight the command branch below is parked,
        // so the worker's final reply goes out before any later command is
        // even read. That keeps the 150 -> 226|451|550 sequence unbroken.
        let mut data_busy = false;
        loop {
            tokio::select! {
                Some(msg) = rx.recv() => {
                    if let ControlChanMsg::ExitControlLoop = msg {
                        slog::info!(logger, "session closed by QUIT");
                        return;
                    }
                    data_busy = false;
                    let reply = reply_for_msg(&logger, msg);
                    if reply_sink.send(reply).await.is_err() {
                        slog::warn!(logger, "could not send the transfer reply; dropping session");
                        return;
                    }
                }
                incoming = command_source.next(), if !data_busy => {
                    match incoming {
                        None => {
                            slog::info!(logger, "client closed the control connection");
                            return;
                        }
                        Some(Err(err)) => {
                            slog::warn!(logger, "fatal control channel error: {}", err);
                            return;
                        }
                        Some(Ok(Err(parse_err))) => {
                            if reply_sink.send(reply_for_parse_error(&parse_err)).await.is_err() {
                                slog::warn!(logger, "could not send the error reply; dropping session");
                                return;
                            }
                        }
                        Some(Ok(Ok(cmd))) => {
                            slog::debug!(logger, "processing {}", cmd);
                            let reply = match handle_command(cmd, &config, session.clone(), tx.clone(), &logger).await {
                                Ok(reply) => reply,
                                Err(err) => {
                                    slog::warn!(logger, "error handling command: {}", err);
                                    return;
                                }
                            };
                            let starts_transfer = reply.code == ReplyCode::FileStatusOkay;
                            if reply_sink.send(reply).await.is_err() {
                                slog::warn!(logger, "could not send the reply; dropping session");
                                return;
                            }
                            if starts_transfer {
                                data_busy = true;
                            }
                        }
                    }
                }
                _ = tokio::time::sleep(config.idle_timeout.unwrap_or(IDLE_FALLBACK)), if config.idle_timeout.is_some() => {
                    slog::info!(logger, "session idle timeout");
                    let _ = reply_sink
                        .send(Reply::new(ReplyCode::ServiceNotAvailable, "Idle timeout, closing control connection."))
                        .await;
                    return;
                }
            }
        }
    });

    Ok(())
}

// USER, PASS and QUIT are the only verbs available before login.
fn requires_auth(cmd: &Command) -> bool {
    !matches!(cmd, Command::User { .. } | Command::Pass { .. } | Command::Quit)
}

async fn handle_command(
    cmd: Command,
    config: &LoopConfig,
    session: SharedSession,
    tx: Sender<ControlChanMsg>,
    logger: &slog::Logger,
) -> Result<Reply, ControlChanError> {
    {
        let mut session = session.lock().await;
        // Only an immediately following RNTO may consume a pending rename source.
        if !matches!(cmd, Command::Rnto { .. }) {
            session.rename_from = None;
        }
        if requires_auth(&cmd) && session.state != SessionState::WaitCmd {
            return Ok(Reply::new(ReplyCode::NotLoggedIn, "Not logged in."));
        }
    }

    let handler: Box<dyn CommandHandler> = match cmd {
        Command::User { username } => Box::new(commands::User::new(username)),
        Command::Pass { password } => Box::new(commands::Pass::new(password)),
        Command::Quit => Box::new(commands::Quit),
        Command::Port { addr } => Box::new(commands::Port::new(addr)),
        Command::List => Box::new(commands::List),
        Command::Retr { path } => Box::new(commands::Retr::new(path)),
        Command::Stor { path } => Box::new(commands::Stor::new(path)),
        Command::Cwd { path } => Box::new(commands::Cwd::new(path)),
        Command::Pwd => Box::new(commands::Pwd),
        Command::Mkd { path } => Box::new(commands::Mkd::new(path)),
        Command::Rmd { path } => Box::new(commands::Rmd::new(path)),
        Command::Dele { path } => Box::new(commands::Dele::new(path)),
        Command::Rnfr { path } => Box::new(commands::Rnfr::new(path)),
        Command::Rnto { path } => Box::new(commands::Rnto::new(path)),
        Command::Other { command_name } => {
            slog::debug!(logger, "verb {} not implemented", command_name);
            return Ok(Reply::new(ReplyCode::CommandOkayNotImplemented, "Command not implemented."));
        }
    };

    let context = CommandContext {
        session,
        authenticator: config.authenticator.clone(),
        tx_control_chan: tx,
        server_root: config.server_root.clone(),
        data_source_port: config.data_source_port,
        logger: logger.clone(),
    };
    handler.handle(context).await
}

fn reply_for_msg(logger: &slog::Logger, msg: ControlChanMsg) -> Reply {
    match msg {
        ControlChanMsg::SentData { bytes } => {
            slog::info!(logger, "sent {} bytes", bytes);
            Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete.")
        }
        ControlChanMsg::WrittenData { bytes } => {
            slog::info!(logger, "stored {} bytes", bytes);
            Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete.")
        }
        ControlChanMsg::DirectoryListed => Reply::new(ReplyCode::ClosingDataConnection, "Transfer complete."),
        ControlChanMsg::DataConnectionFailed => {
            Reply::new(ReplyCode::LocalError, "Requested action aborted. Can't open data connection.")
        }
        ControlChanMsg::StorageError(err) => {
            slog::warn!(logger, "transfer failed: {}", err);
            commands::storage_error_reply(&err)
        }
        // Never built into a reply: the loop exits when it sees this message.
        ControlChanMsg::ExitControlLoop => Reply::new(ReplyCode::ClosingControlConnection, "Service closing control connection."),
    }
}

fn reply_for_parse_error(err: &ParseError) -> Reply {
    match err.kind() {
        ParseErrorKind::InvalidParameter => Reply::new(ReplyCode::ParameterSyntaxError, "Syntax error in parameters or arguments."),
        ParseErrorKind::EmptyLine | ParseErrorKind::InvalidUtf8 => {
            Reply::new(ReplyCode::CommandSyntaxError, "Syntax error, command unrecognized.")
        }
    }
}
