//! Contains code pertaining to the FTP *data* channel, active mode only.
//!
//! The server originates every data connection: a fresh socket is bound to
//! the configured source port (20 unless relaxed) with address reuse, then
//! connected to the endpoint the client declared with PORT. The transfer
//! itself runs in a spawned worker that owns the data stream and a snapshot
//! of the paths it needs; it reports back to the control loop over a message
//! channel and never touches session state.

use crate::server::chancomms::ControlChanMsg;
use crate::storage::{self, Vfs};

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpSocket, TcpStream};
use tokio::sync::mpsc::Sender;

/// Establishes the active-mode data connection from the server's data source
/// port to the client-declared endpoint.
pub async fn connect_active(source_port: u16, peer: SocketAddrV4) -> std::io::Result<TcpStream> {
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, source_port)))?;
    socket.connect(SocketAddr::V4(peer)).await
}

/// Executes one data transfer. Constructed by a LIST/RETR/STOR handler after
/// the preconditions passed and the 150 went out; consumed by the spawned
/// worker task.
#[derive(Debug)]
pub struct DataCommandExecutor {
    pub logger: slog::Logger,
    pub tx: Sender<ControlChanMsg>,
    pub source_port: u16,
    pub peer: SocketAddrV4,
    pub vfs: Vfs,
}

impl DataCommandExecutor {
    /// RETR: stream the file at `path` to the client and close.
    pub async fn send_file(self, path: PathBuf) {
        let Some(mut socket) = self.connect().await else {
            return;
        };
        let mut reader = match self.vfs.open_read(&path).await {
            Ok(reader) => reader,
            Err(err) => {
                slog::warn!(self.logger, "RETR of {:?} failed to open: {}", path, err);
                self.notify(ControlChanMsg::StorageError(err)).await;
                return;
            }
        };
        match tokio::io::copy(&mut reader, &mut socket).await {
            Ok(bytes) => {
                if let Err(err) = socket.shutdown().await {
                    slog::warn!(self.logger, "RETR could not close the data connection: {}", err);
                    self.notify(ControlChanMsg::StorageError(storage::Error::new(storage::ErrorKind::LocalError, err)))
                        .await;
                    return;
                }
                self.notify(ControlChanMsg::SentData { bytes }).await;
            }
            Err(err) => {
                slog::warn!(self.logger, "RETR of {:?} aborted mid-stream: {}", path, err);
                self.notify(ControlChanMsg::StorageError(storage::Error::new(storage::ErrorKind::LocalError, err)))
                    .await;
            }
        }
    }

    /// STOR: receive the client's upload into `dest` via a temp file.
    pub async fn receive_file(self, dest: PathBuf) {
        let Some(mut socket) = self.connect().await else {
            return;
        };
        match self.vfs.store(&dest, &mut socket).await {
            Ok(bytes) => self.notify(ControlChanMsg::WrittenData { bytes }).await,
            Err(err) => {
                slog::warn!(self.logger, "STOR into {:?} failed: {}", dest, err);
                self.notify(ControlChanMsg::StorageError(err)).await;
            }
        }
    }

    /// LIST: send the entry names of `dir`, one per CRLF-terminated line.
    pub async fn send_list(self, dir: PathBuf) {
        let Some(mut socket) = self.connect().await else {
            return;
        };
        let names = match self.vfs.list_names(&dir).await {
            Ok(names) => names,
            Err(err) => {
                slog::warn!(self.logger, "LIST of {:?} failed: {}", dir, err);
                self.notify(ControlChanMsg::StorageError(err)).await;
                return;
            }
        };
        let mut payload = String::new();
        for name in &names {
            payload.push_str(name);
            payload.push_str("\r\n");
        }
        let written = async {
            socket.write_all(payload.as_bytes()).await?;
            socket.shutdown().await
        }
        .await;
        match written {
            Ok(()) => self.notify(ControlChanMsg::DirectoryListed).await,
            Err(err) => {
                slog::warn!(self.logger, "LIST could not write to the data connection: {}", err);
                self.notify(ControlChanMsg::StorageError(storage::Error::new(storage::ErrorKind::LocalError, err)))
                    .await;
            }
        }
    }

    async fn connect(&self) -> Option<TcpStream> {
        match connect_active(self.source_port, self.peer).await {
            Ok(socket) => Some(socket),
            Err(err) => {
                slog::warn!(self.logger, "failed to open data connection to {}: {}", self.peer, err);
                self.notify(ControlChanMsg::DataConnectionFailed).await;
                None
            }
        }
    }

    async fn notify(&self, msg: ControlChanMsg) {
        if let Err(err) = self.tx.send(msg).await {
            // The control connection went away mid-transfer; the reply is discarded.
            slog::warn!(self.logger, "could not notify the control loop: {}", err);
        }
    }
}
