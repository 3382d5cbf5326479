//! Wire-level definitions: constants, identifiers and values, packet
//! framing, and every command this back-end understands.

mod commands;
mod constants;
mod protocol;
mod types;

pub use commands::*;
pub use constants::*;
pub use protocol::*;
pub use types::*;
