//! Protocol module containing message types and the JSON codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_event, encode_command, ProtocolError};
pub use messages::*;
