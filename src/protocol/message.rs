//! VICI message tree and packet types

use crate::error::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Maximum nesting of sections, guarding against hostile peers
const MAX_DEPTH: usize = 64;

/// VICI packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    CmdRequest = 0,
    CmdResponse = 1,
    CmdUnknown = 2,
    EventRegister = 3,
    EventUnregister = 4,
    EventConfirm = 5,
    EventUnknown = 6,
    Event = 7,
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => PacketType::CmdRequest,
            1 => PacketType::CmdResponse,
            2 => PacketType::CmdUnknown,
            3 => PacketType::EventRegister,
            4 => PacketType::EventUnregister,
            5 => PacketType::EventConfirm,
            6 => PacketType::EventUnknown,
            7 => PacketType::Event,
            other => {
                return Err(Error::InvalidMessage(format!(
                    "Unknown packet type {}",
                    other
                )));
            }
        })
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        value as u8
    }
}

impl PacketType {
    /// Whether packets of this type carry a command or event name
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            PacketType::CmdRequest
                | PacketType::EventRegister
                | PacketType::EventUnregister
                | PacketType::Event
        )
    }

    /// Whether packets of this type carry a message body
    fn has_message(&self) -> bool {
        matches!(
            self,
            PacketType::CmdRequest | PacketType::CmdResponse | PacketType::Event
        )
    }
}

/// Message element types
mod element {
    pub const SECTION_START: u8 = 1;
    pub const SECTION_END: u8 = 2;
    pub const KEY_VALUE: u8 = 3;
    pub const LIST_START: u8 = 4;
    pub const LIST_ITEM: u8 = 5;
    pub const LIST_END: u8 = 6;
}

/// A value stored under a key of a [`Section`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    List(Vec<String>),
    Section(Section),
}

/// An ordered set of key/value pairs, the body of every VICI message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: Vec<(String, Value)>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, keeping insertion order
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style [`Section::insert`] for a string value
    pub fn with_str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Value::Str(value.into()));
        self
    }

    /// Builder-style [`Section::insert`] for a subsection
    pub fn with_section(mut self, key: impl Into<String>, section: Section) -> Self {
        self.insert(key, Value::Section(section));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_section(&self, key: &str) -> Option<&Section> {
        match self.get(key)? {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Subsections with their keys, skipping plain values and lists
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.entries.iter().filter_map(|(k, v)| match v {
            Value::Section(s) => Some((k.as_str(), s)),
            _ => None,
        })
    }

    /// Append all entries of `other`
    pub fn extend(&mut self, other: Section) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the section as a sequence of message elements
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf)?;
        Ok(buf.freeze())
    }

    fn encode_into(&self, buf: &mut BytesMut) -> Result<()> {
        for (key, value) in &self.entries {
            match value {
                Value::Str(s) => {
                    buf.put_u8(element::KEY_VALUE);
                    put_name(buf, key)?;
                    put_value(buf, s)?;
                }
                Value::List(items) => {
                    buf.put_u8(element::LIST_START);
                    put_name(buf, key)?;
                    for item in items {
                        buf.put_u8(element::LIST_ITEM);
                        put_value(buf, item)?;
                    }
                    buf.put_u8(element::LIST_END);
                }
                Value::Section(section) => {
                    buf.put_u8(element::SECTION_START);
                    put_name(buf, key)?;
                    section.encode_into(buf)?;
                    buf.put_u8(element::SECTION_END);
                }
            }
        }
        Ok(())
    }

    /// Decode a message body
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut buf = data;
        let section = Self::decode_from(&mut buf, 0)?;
        if buf.has_remaining() {
            return Err(Error::InvalidMessage(
                "Unexpected section end at top level".to_string(),
            ));
        }
        Ok(section)
    }

    fn decode_from(buf: &mut &[u8], depth: usize) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(Error::InvalidMessage(format!(
                "Sections nested deeper than {}",
                MAX_DEPTH
            )));
        }

        let mut section = Section::new();
        while buf.has_remaining() {
            match buf[0] {
                element::SECTION_END => {
                    if depth == 0 {
                        break;
                    }
                    buf.advance(1);
                    return Ok(section);
                }
                element::SECTION_START => {
                    buf.advance(1);
                    let name = get_name(buf)?;
                    let sub = Self::decode_from(buf, depth + 1)?;
                    section.insert(name, Value::Section(sub));
                }
                element::KEY_VALUE => {
                    buf.advance(1);
                    let name = get_name(buf)?;
                    let value = get_value(buf)?;
                    section.insert(name, Value::Str(value));
                }
                element::LIST_START => {
                    buf.advance(1);
                    let name = get_name(buf)?;
                    let mut items = Vec::new();
                    loop {
                        if !buf.has_remaining() {
                            return Err(Error::InvalidMessage("List truncated".to_string()));
                        }
                        match buf.get_u8() {
                            element::LIST_ITEM => items.push(get_value(buf)?),
                            element::LIST_END => break,
                            other => {
                                return Err(Error::InvalidMessage(format!(
                                    "Unexpected element {} in list",
                                    other
                                )));
                            }
                        }
                    }
                    section.insert(name, Value::List(items));
                }
                other => {
                    return Err(Error::InvalidMessage(format!(
                        "Unexpected element {}",
                        other
                    )));
                }
            }
        }

        if depth > 0 {
            return Err(Error::InvalidMessage("Section truncated".to_string()));
        }
        Ok(section)
    }
}

fn put_name(buf: &mut BytesMut, name: &str) -> Result<()> {
    let len = u8::try_from(name.len())
        .map_err(|_| Error::InvalidMessage(format!("Name too long: {}", name.len())))?;
    buf.put_u8(len);
    buf.put_slice(name.as_bytes());
    Ok(())
}

fn put_value(buf: &mut BytesMut, value: &str) -> Result<()> {
    let len = u16::try_from(value.len())
        .map_err(|_| Error::InvalidMessage(format!("Value too long: {}", value.len())))?;
    buf.put_u16(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn get_name(buf: &mut &[u8]) -> Result<String> {
    if !buf.has_remaining() {
        return Err(Error::InvalidMessage("Name truncated".to_string()));
    }
    let len = usize::from(buf.get_u8());
    get_string(buf, len, "Name")
}

fn get_value(buf: &mut &[u8]) -> Result<String> {
    if buf.remaining() < 2 {
        return Err(Error::InvalidMessage("Value truncated".to_string()));
    }
    let len = usize::from(buf.get_u16());
    get_string(buf, len, "Value")
}

fn get_string(buf: &mut &[u8], len: usize, what: &str) -> Result<String> {
    if buf.remaining() < len {
        return Err(Error::InvalidMessage(format!("{} truncated", what)));
    }
    let s = String::from_utf8_lossy(&buf[..len]).into_owned();
    buf.advance(len);
    Ok(s)
}

/// A VICI packet: type, optional name and optional message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub packet_type: PacketType,
    pub name: Option<String>,
    pub message: Section,
}

impl Packet {
    /// Create a command request
    pub fn request(command: &str, message: Section) -> Self {
        Self {
            packet_type: PacketType::CmdRequest,
            name: Some(command.to_string()),
            message,
        }
    }

    /// Create an event (un)registration
    pub fn event_registration(event: &str, register: bool) -> Self {
        Self {
            packet_type: if register {
                PacketType::EventRegister
            } else {
                PacketType::EventUnregister
            },
            name: Some(event.to_string()),
            message: Section::new(),
        }
    }

    /// Create a packet without name or body, as sent by the daemon
    pub fn bare(packet_type: PacketType) -> Self {
        Self {
            packet_type,
            name: None,
            message: Section::new(),
        }
    }

    /// Encode the packet body (excluding the length prefix)
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        buf.put_u8(self.packet_type.into());
        if self.packet_type.is_named() {
            let name = self.name.as_deref().ok_or_else(|| {
                Error::Protocol(format!("{:?} packet requires a name", self.packet_type))
            })?;
            put_name(&mut buf, name)?;
        }
        if self.packet_type.has_message() {
            self.message.encode_into(&mut buf)?;
        }
        Ok(buf.freeze())
    }

    /// Decode a packet body (excluding the length prefix)
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut buf = data;
        if !buf.has_remaining() {
            return Err(Error::InvalidMessage("Empty packet".to_string()));
        }
        let packet_type = PacketType::try_from(buf.get_u8())?;
        let name = if packet_type.is_named() {
            Some(get_name(&mut buf)?)
        } else {
            None
        };
        let message = Section::decode(buf)?;
        Ok(Self {
            packet_type,
            name,
            message,
        })
    }
}
