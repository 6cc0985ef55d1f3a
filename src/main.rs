//! portsided: the portside FTP daemon.

use clap::Parser;
use portside::Server;
use portside::auth::CsvFileAuthenticator;
use std::path::PathBuf;
use std::sync::Arc;

/// A small multi-user FTP server speaking RFC 959 active mode.
#[derive(Parser, Debug)]
#[command(name = "portsided", version, about)]
struct Args {
    /// Address to bind the control channel to.
    #[arg(long, default_value = "0.0.0.0")]
    bind_address: String,

    /// Control channel port.
    #[arg(long, default_value_t = 21)]
    port: u16,

    /// Source port for active-mode data connections (0 = ephemeral).
    #[arg(long, default_value_t = 20)]
    data_port: u16,

    /// Server root; per-user jails are created beneath it.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Credentials file with one `username,password` record per line.
    #[arg(long)]
    users: PathBuf,

    /// Maximum number of concurrent sessions.
    #[arg(long, default_value_t = 10)]
    max_sessions: usize,

    /// Greeting sent in the 220 reply.
    #[arg(long)]
    greeting: Option<String>,
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    let authenticator = match CsvFileAuthenticator::from_file(&args.users) {
        Ok(authenticator) => authenticator,
        Err(err) => {
            eprintln!("portsided: {err}");
            std::process::exit(1);
        }
    };

    let mut server = Server::new(args.root, Arc::new(authenticator))
        .data_port(args.data_port)
        .max_sessions(args.max_sessions);
    if let Some(greeting) = args.greeting {
        server = server.greeting(greeting);
    }

    let addr = format!("{}:{}", args.bind_address, args.port);
    if let Err(err) = server.listen(&addr).await {
        eprintln!("portsided: {err}");
        std::process::exit(1);
    }
}
