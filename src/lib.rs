//! The debuggee side of JDWP, for interpreters that want to be debugged by
//! stock Java debuggers.
//!
//! An embedder implements [vm::Debuggee] and [vm::SourceInfo], accepts a
//! debugger with [server::JdwpServer], and drives a [thread::DebugThread]
//! from each interpreter thread.

#![deny(missing_debug_implementations, clippy::undocumented_unsafe_blocks)]

extern crate self as jdwp_server;

pub mod codec;
pub mod config;
pub mod jvm;
pub mod modifiers;
pub mod requests;
pub mod server;
pub mod session;
pub mod spec;
pub mod stepping;
pub mod thread;
pub mod vm;

mod handlers;

pub use handlers::CommandError;

pub(crate) use jdwp_macros::jdwp_command;
