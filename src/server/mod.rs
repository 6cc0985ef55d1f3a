//! The FTP server implementation: the accept loop, per-connection control
//! channels, and the active-mode data channel.

pub(crate) mod chancomms;
pub(crate) mod controlchan;
pub(crate) mod datachan;
pub(crate) mod ftpserver;
pub(crate) mod session;
