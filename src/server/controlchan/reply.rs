/// A reply to the FTP client: a 3-digit code and a single line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: ReplyCode,
    pub msg: String,
}

/// The reply codes used by this server, according to RFC 959.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ReplyCode {
    FileStatusOkay = 150,

    CommandOkay = 200,
    CommandOkayNotImplemented = 202,
    ServiceReady = 220,
    ClosingControlConnection = 221,
    ClosingDataConnection = 226,
    UserLoggedIn = 230,
    FileActionOkay = 250,
    DirCreated = 257,

    NeedPassword = 331,
    FileActionPending = 350,

    ServiceNotAvailable = 421,
    CantOpenDataConnection = 425,
    LocalError = 451,

    CommandSyntaxError = 500,
    ParameterSyntaxError = 501,
    BadCommandSequence = 503,
    NotLoggedIn = 530,
    FileError = 550,
}

impl Reply {
    pub fn new(code: ReplyCode, message: &str) -> Self {
        Reply {
            code,
            msg: message.to_string(),
        }
    }

    pub fn new_with_string(code: ReplyCode, msg: String) -> Self {
        Reply { code, msg }
    }
}
