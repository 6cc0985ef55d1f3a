//! Contains everything that makes up the control channel: wire framing, the
//! line parser, the command set with one handler per verb, and the
//! per-connection event loop.

pub mod codecs;
pub mod command;
pub mod commands;
pub mod control_loop;
pub mod error;
pub mod handler;
pub mod line_parser;
pub mod reply;

pub use control_loop::{LoopConfig, spawn_loop};
