use super::command::Command;
use super::error::{ControlChanError, ControlChanErrorKind};
use super::line_parser::error::ParseError;
use super::line_parser::parse;
use super::reply::Reply;

use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

// A session reads "up to a line buffer's worth"; a peer that streams more
// than this without a newline gets disconnected.
const MAX_LINE_LEN: usize = 1024;

/// FtpCodec implements tokio's `Decoder` and `Encoder` traits for the
/// control channel, decoding FTP commands and encoding replies.
///
/// Parse failures are yielded as `Ok(Err(ParseError))` items so the control
/// loop can answer 500/501 and keep the session alive; a decode-level `Err`
/// is fatal to the connection.
#[derive(Default)]
pub struct FtpCodec {
    // Stored index of the next index to examine for a '\n' character. This
    // avoids re-scanning bytes that were already seen on a previous call.
    next_index: usize,
}

impl FtpCodec {
    pub fn new() -> Self {
        FtpCodec::default()
    }
}

impl Decoder for FtpCodec {
    type Item = Result<Command, ParseError>;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(newline_offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') {
            let newline_index = newline_offset + self.next_index;
            let line = buf.split_to(newline_index + 1);
            self.next_index = 0;
            Ok(Some(parse(line)))
        } else if buf.len() > MAX_LINE_LEN {
            Err(ControlChanErrorKind::CommandLineTooLong.into())
        } else {
            self.next_index = buf.len();
            Ok(None)
        }
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    // Every reply is a single `NNN SP text CRLF` line.
    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buffer = vec![];
        if reply.msg.is_empty() {
            writeln!(buffer, "{}\r", reply.code as u32)?;
        } else {
            writeln!(buffer, "{} {}\r", reply.code as u32, reply.msg)?;
        }
        buf.extend(&buffer);
        Ok(())
    }
}
