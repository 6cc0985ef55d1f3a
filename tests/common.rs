#![allow(missing_docs)]
#![allow(dead_code)]

use portside::Server;
use portside::auth::CsvFileAuthenticator;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const CREDENTIALS: &str = "alice,wonderland\nbob,builder\n";

/// Starts a server on 127.0.0.1:`port` with a fresh temp root and the test
/// credentials. Each test uses its own port so the suites can run in
/// parallel. The data source port is ephemeral: binding 20 needs privileges.
pub async fn spawn_server(port: u16) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let users = root.path().join("users.csv");
    std::fs::write(&users, CREDENTIALS).unwrap();
    let authenticator = CsvFileAuthenticator::from_file(&users).unwrap();
    let server = Server::new(root.path().to_path_buf(), Arc::new(authenticator)).data_port(0);
    let addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        server.listen(&addr).await.unwrap();
    });
    root
}

/// A minimal blocking-style FTP control client for the tests.
pub struct FtpClient {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl FtpClient {
    /// Connects to the control port, retrying while the server comes up.
    pub async fn connect(port: u16) -> FtpClient {
        let mut attempts = 0;
        loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => {
                    return FtpClient {
                        stream,
                        buf: Vec::new(),
                    };
                }
                Err(e) => {
                    attempts += 1;
                    assert!(attempts < 50, "server never came up: {e}");
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                }
            }
        }
    }

    pub async fn send(&mut self, line: &str) {
        self.stream.write_all(line.as_bytes()).await.unwrap();
    }

    /// Reads exactly one CRLF-terminated reply line.
    pub async fn read_reply(&mut self) -> String {
        loop {
            if let Some(pos) = self.buf.windows(2).position(|w| w == b"\r\n") {
                let line: Vec<u8> = self.buf.drain(..pos + 2).collect();
                return String::from_utf8(line).unwrap();
            }
            let mut chunk = [0_u8; 1024];
            let n = self.stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "server closed the control connection unexpectedly");
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// True when the server has closed the control connection.
    pub async fn at_eof(&mut self) -> bool {
        let mut chunk = [0_u8; 64];
        self.stream.read(&mut chunk).await.unwrap() == 0
    }
}

/// Connects and logs in as alice.
pub async fn login(port: u16) -> FtpClient {
    let mut client = FtpClient::connect(port).await;
    assert_eq!(client.read_reply().await, "220 Service ready for new user.\r\n");
    client.send("USER alice\r\n").await;
    assert_eq!(client.read_reply().await, "331 Username OK, need password.\r\n");
    client.send("PASS wonderland\r\n").await;
    assert_eq!(client.read_reply().await, "230 User logged in, proceed.\r\n");
    client
}

/// Opens a listener for the data connection and declares it with PORT.
pub async fn declare_data_endpoint(client: &mut FtpClient) -> TcpListener {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    client.send(&format!("PORT 127,0,0,1,{},{}\r\n", port / 256, port % 256)).await;
    assert_eq!(client.read_reply().await, "200 PORT command successful.\r\n");
    listener
}

/// Accepts the server's active-mode connection and drains it.
pub async fn receive_data(listener: TcpListener) -> Vec<u8> {
    let (mut stream, _) = listener.accept().await.unwrap();
    let mut data = Vec::new();
    stream.read_to_end(&mut data).await.unwrap();
    data
}

/// Accepts the server's active-mode connection, uploads `data`, and closes.
pub async fn send_data(listener: TcpListener, data: &[u8]) {
    let (mut stream, _) = listener.accept().await.unwrap();
    stream.write_all(data).await.unwrap();
    stream.shutdown().await.unwrap();
}
