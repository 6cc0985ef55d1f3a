use super::error::{ParseErrorKind, Result};
use crate::server::controlchan::command::{Command, Password};

use std::net::{Ipv4Addr, SocketAddrV4};
use std::str;

/// Parse one control line (terminator included) into a [`Command`].
///
/// The first whitespace-delimited token is the verb, compared upper-case;
/// the remainder, left-trimmed, is the argument string and may contain
/// spaces. CR and LF are stripped before parsing.
pub fn parse<T: AsRef<[u8]>>(line: T) -> Result<Command> {
    let mut line = line.as_ref();
    if let Some(stripped) = line.strip_suffix(b"\n") {
        line = stripped;
    }
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }
    let text = str::from_utf8(line)?;

    let mut split = text.splitn(2, ' ');
    let verb = split.next().unwrap_or("");
    let args = split.next().unwrap_or("").trim_start();
    if verb.is_empty() {
        return Err(ParseErrorKind::EmptyLine.into());
    }

    let cmd = match verb.to_uppercase().as_str() {
        "USER" => Command::User {
            username: required(args)?.to_string(),
        },
        "PASS" => Command::Pass {
            password: Password::new(required(args)?.to_string()),
        },
        "QUIT" => {
            no_args(args)?;
            Command::Quit
        }
        "PORT" => Command::Port {
            addr: parse_host_port(required(args)?)?,
        },
        // Any LIST argument (options or a path) is accepted and ignored;
        // the listing is always of the session's current directory.
        "LIST" => Command::List,
        "RETR" => Command::Retr {
            path: required(args)?.to_string(),
        },
        "STOR" => Command::Stor {
            path: required(args)?.to_string(),
        },
        "CWD" => Command::Cwd {
            path: required(args)?.to_string(),
        },
        "PWD" => {
            no_args(args)?;
            Command::Pwd
        }
        "MKD" => Command::Mkd {
            path: required(args)?.to_string(),
        },
        "RMD" => Command::Rmd {
            path: required(args)?.to_string(),
        },
        "DELE" => Command::Dele {
            path: required(args)?.to_string(),
        },
        "RNFR" => Command::Rnfr {
            path: required(args)?.to_string(),
        },
        "RNTO" => Command::Rnto {
            path: required(args)?.to_string(),
        },
        other => Command::Other {
            command_name: other.to_string(),
        },
    };

    Ok(cmd)
}

fn required(args: &str) -> Result<&str> {
    if args.is_empty() {
        return Err(ParseErrorKind::InvalidParameter.into());
    }
    Ok(args)
}

fn no_args(args: &str) -> Result<()> {
    if !args.is_empty() {
        return Err(ParseErrorKind::InvalidParameter.into());
    }
    Ok(())
}

/// Parses the RFC 959 `h1,h2,h3,h4,p1,p2` host-port specification. Each
/// field must be a decimal integer in 0..=255; the port is `p1 * 256 + p2`.
fn parse_host_port(spec: &str) -> Result<SocketAddrV4> {
    let fields = spec
        .split(',')
        .map(str::parse::<u8>)
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|_| ParseErrorKind::InvalidParameter)?;
    let [h1, h2, h3, h4, p1, p2] = fields[..] else {
        return Err(ParseErrorKind::InvalidParameter.into());
    };
    let ip = Ipv4Addr::new(h1, h2, h3, h4);
    let port = u16::from(p1) * 256 + u16::from(p2);
    Ok(SocketAddrV4::new(ip, port))
}
