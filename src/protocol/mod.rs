//! VICI protocol implementation
//!
//! The Versatile IKE Control Interface is charon's request/response and
//! event protocol, described in
//! https://github.com/strongswan/strongswan/blob/master/src/libcharon/plugins/vici/README.md

pub mod codec;
pub mod message;

pub use codec::ViciCodec;
pub use message::{Packet, PacketType, Section, Value};
