//! Contains the implementations of the FTP commands this server speaks.

mod cwd;
mod dele;
mod list;
mod mkd;
mod pass;
mod port;
mod pwd;
mod quit;
mod retr;
mod rmd;
mod rnfr;
mod rnto;
mod stor;
mod user;

pub use cwd::Cwd;
pub use dele::Dele;
pub use list::List;
pub use mkd::Mkd;
pub use pass::Pass;
pub use port::Port;
pub use pwd::Pwd;
pub use quit::Quit;
pub use retr::Retr;
pub use rmd::Rmd;
pub use rnfr::Rnfr;
pub use rnto::Rnto;
pub use stor::Stor;
pub use user::User;

use crate::server::controlchan::reply::{Reply, ReplyCode};
use crate::storage;

/// Maps a storage failure to its reply: 550 for filesystem conditions
/// (missing, permission, sandbox escape), 451 for local processing errors.
pub fn storage_error_reply(err: &storage::Error) -> Reply {
    match err.kind() {
        storage::ErrorKind::PermanentFileNotAvailable => Reply::new(ReplyCode::FileError, "No such file or directory."),
        storage::ErrorKind::PermissionDenied | storage::ErrorKind::SandboxViolation => {
            Reply::new(ReplyCode::FileError, "Permission denied.")
        }
        storage::ErrorKind::LocalError => Reply::new(ReplyCode::LocalError, "Requested action aborted. Local error in processing."),
    }
}
