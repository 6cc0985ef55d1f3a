use std::fmt;
use std::net::SocketAddrV4;

/// A password submitted with PASS. Kept in a newtype so that session logs
/// and instrumented handlers can never print it.
#[derive(PartialEq, Eq, Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Password(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"******\"")
    }
}

/// A parsed control-channel command.
///
/// Arguments that name files keep their embedded spaces; the line parser
/// only strips the verb and the single separating space.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    User {
        /// The username the client wants to log in as.
        username: String,
    },
    Pass {
        /// The password belonging to the previously named user.
        password: Password,
    },
    Quit,
    Port {
        /// The client-declared active-mode data endpoint.
        addr: SocketAddrV4,
    },
    List,
    Retr {
        /// The file the client would like to retrieve.
        path: String,
    },
    Stor {
        /// The file the client would like to store.
        path: String,
    },
    Cwd {
        /// The directory the client would like to change to.
        path: String,
    },
    Pwd,
    Mkd {
        /// The directory the client wants to create.
        path: String,
    },
    Rmd {
        /// The directory to delete.
        path: String,
    },
    Dele {
        /// The (regular) file to delete.
        path: String,
    },
    Rnfr {
        /// The file to be renamed.
        path: String,
    },
    Rnto {
        /// The name to rename to.
        path: String,
    },
    /// A well-formed verb this server does not implement.
    Other {
        /// The verb as received, uppercased.
        command_name: String,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
