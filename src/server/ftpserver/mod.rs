//! Contains the `Server` type, its builder-style options, and the accept loop.

pub mod error;

use crate::auth::Authenticator;
use crate::server::controlchan;
use error::ServerError;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpSocket, TcpStream};
use tokio::sync::Semaphore;

const DEFAULT_GREETING: &str = "Service ready for new user.";
const DEFAULT_DATA_PORT: u16 = 20;
const DEFAULT_MAX_SESSIONS: usize = 10;
const LISTEN_BACKLOG: u32 = 5;

/// An FTP server for active-mode transfers.
///
/// Construct with [`Server::new`], tweak with the builder methods, and run
/// with [`Server::listen`]. Per-user jail directories are created under the
/// server root at first login.
///
/// ```no_run
/// use portside::Server;
/// use portside::auth::CsvFileAuthenticator;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let authenticator = CsvFileAuthenticator::from_file("users.csv").unwrap();
///     let server = Server::new("/srv/ftp", Arc::new(authenticator)).greeting("Welcome");
///     server.listen("0.0.0.0:2121").await.unwrap();
/// }
/// ```
pub struct Server {
    root: PathBuf,
    authenticator: Arc<dyn Authenticator>,
    greeting: String,
    data_port: u16,
    max_sessions: usize,
    idle_timeout: Option<Duration>,
    logger: slog::Logger,
}

impl Server {
    /// Creates a server that jails its users under `root` and checks
    /// credentials against `authenticator`.
    pub fn new(root: impl Into<PathBuf>, authenticator: Arc<dyn Authenticator>) -> Self {
        Server {
            root: root.into(),
            authenticator,
            greeting: DEFAULT_GREETING.to_string(),
            data_port: DEFAULT_DATA_PORT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout: None,
            logger: default_logger(),
        }
    }

    /// Sets the greeting sent in the 220 reply on connect.
    pub fn greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the source port for active-mode data connections. RFC 959 says
    /// 20, which is the default; pass 0 to use an ephemeral port instead,
    /// which also lifts the one-transfer-at-a-time restriction that a fixed
    /// source port imposes.
    pub fn data_port(mut self, port: u16) -> Self {
        self.data_port = port;
        self
    }

    /// Caps the number of concurrent sessions. Connections beyond the cap
    /// are greeted with 421 and closed.
    pub fn max_sessions(mut self, limit: usize) -> Self {
        self.max_sessions = limit;
        self
    }

    /// Closes sessions that stay idle longer than `timeout`. Disabled by
    /// default.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Sets the structured logger ([slog](https://crates.io/crates/slog)::Logger)
    /// to use. Passing `None` restores the default bridge into the standard
    /// [log](https://crates.io/crates/log) facade.
    pub fn logger<L: Into<Option<slog::Logger>>>(mut self, logger: L) -> Self {
        self.logger = logger.into().unwrap_or_else(default_logger);
        self
    }

    /// Binds the control port and serves until the process ends. Binding,
    /// address parsing and an unreadable server root are fatal.
    pub async fn listen(self, bind_address: &str) -> Result<(), ServerError> {
        let addr: SocketAddr = bind_address.parse()?;
        if addr.is_ipv6() {
            return Err(ServerError::new("only IPv4 control endpoints are supported"));
        }
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| ServerError::with_source(format!("cannot open server root {}", self.root.display()), e))?;

        let socket = TcpSocket::new_v4()?;
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(LISTEN_BACKLOG)?;
        let sessions = Arc::new(Semaphore::new(self.max_sessions));
        slog::info!(self.logger, "listening on {}", addr; "data_port" => self.data_port, "max_sessions" => self.max_sessions);

        loop {
            match listener.accept().await {
                Ok((tcp_stream, peer)) => {
                    slog::info!(self.logger, "incoming control connection from {}", peer);
                    match Arc::clone(&sessions).try_acquire_owned() {
                        Ok(permit) => {
                            let config = controlchan::LoopConfig {
                                authenticator: self.authenticator.clone(),
                                server_root: root.clone(),
                                greeting: self.greeting.clone(),
                                data_source_port: self.data_port,
                                idle_timeout: self.idle_timeout,
                                logger: self.logger.clone(),
                            };
                            if let Err(err) = controlchan::spawn_loop(config, tcp_stream, permit).await {
                                slog::error!(self.logger, "could not spawn control loop for {}: {}", peer, err);
                            }
                        }
                        Err(_) => {
                            slog::warn!(self.logger, "session limit reached, turning away {}", peer);
                            deny_session(tcp_stream).await;
                        }
                    }
                }
                Err(err) => {
                    slog::error!(self.logger, "error accepting incoming control connection: {}", err);
                }
            }
        }
    }
}

fn default_logger() -> slog::Logger {
    use slog::Drain;
    slog::Logger::root(slog_stdlog::StdLog {}.fuse(), slog::o!())
}

async fn deny_session(mut stream: TcpStream) {
    let _ = stream.write_all(b"421 Service not available, closing control connection.\r\n").await;
    let _ = stream.shutdown().await;
}
