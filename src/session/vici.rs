//! Read-only VICI session with charon

use crate::error::{Error, Result};
use crate::protocol::{Packet, PacketType, Section, ViciCodec};
use crate::session::{ControlPlane, SaFilter};
use tokio::net::UnixStream;
use tracing::trace;

/// An open connection to charon's VICI socket
///
/// The socket is closed when the session is dropped.
#[derive(Debug)]
pub struct ViciSession {
    stream: UnixStream,
}

impl ViciSession {
    pub fn new(stream: UnixStream) -> Self {
        Self { stream }
    }

    /// Send a packet and read the next one
    async fn send_receive(&mut self, packet: &Packet) -> Result<Packet> {
        trace!(packet_type = ?packet.packet_type, name = ?packet.name, "Sending VICI packet");
        ViciCodec::write(&mut self.stream, packet).await?;
        self.receive().await
    }

    async fn receive(&mut self) -> Result<Packet> {
        let packet = ViciCodec::read(&mut self.stream).await?.ok_or_else(|| {
            Error::Protocol("charon closed the VICI connection unexpectedly".to_string())
        })?;
        trace!(packet_type = ?packet.packet_type, name = ?packet.name, "Received VICI packet");
        Ok(packet)
    }

    /// Issue a simple command and return its response
    async fn request(&mut self, command: &str, message: Section) -> Result<Section> {
        let response = self.send_receive(&Packet::request(command, message)).await?;
        match response.packet_type {
            PacketType::CmdResponse => check_success(command, response.message),
            PacketType::CmdUnknown => Err(Error::Protocol(format!(
                "Command '{}' unknown to charon",
                command
            ))),
            other => Err(Error::Protocol(format!(
                "Unexpected {:?} in response to '{}'",
                other, command
            ))),
        }
    }

    async fn register(&mut self, event: &str, register: bool) -> Result<()> {
        let response = self
            .send_receive(&Packet::event_registration(event, register))
            .await?;
        match response.packet_type {
            PacketType::EventConfirm => Ok(()),
            PacketType::EventUnknown => Err(Error::Protocol(format!(
                "Event '{}' unknown to charon",
                event
            ))),
            other => Err(Error::Protocol(format!(
                "Unexpected {:?} while (un)registering '{}'",
                other, event
            ))),
        }
    }

    /// Issue a command whose results arrive as events, merging all event
    /// messages into one section
    async fn streamed(&mut self, command: &str, event: &str, message: Section) -> Result<Section> {
        self.register(event, true).await?;

        ViciCodec::write(&mut self.stream, &Packet::request(command, message)).await?;
        let mut merged = Section::new();
        loop {
            let packet = self.receive().await?;
            match packet.packet_type {
                PacketType::Event if packet.name.as_deref() == Some(event) => {
                    merged.extend(packet.message);
                }
                PacketType::Event => {}
                PacketType::CmdResponse => {
                    check_success(command, packet.message)?;
                    break;
                }
                PacketType::CmdUnknown => {
                    return Err(Error::Protocol(format!(
                        "Command '{}' unknown to charon",
                        command
                    )));
                }
                other => {
                    return Err(Error::Protocol(format!(
                        "Unexpected {:?} while streaming '{}'",
                        other, command
                    )));
                }
            }
        }

        self.register(event, false).await?;
        Ok(merged)
    }
}

/// Turn a `success = no` response into an error
fn check_success(command: &str, response: Section) -> Result<Section> {
    if response.get_str("success") == Some("no") {
        let errmsg = response.get_str("errmsg").unwrap_or("unknown error");
        return Err(Error::Protocol(format!("'{}' failed: {}", command, errmsg)));
    }
    Ok(response)
}

impl ControlPlane for ViciSession {
    async fn list_conns(&mut self, ike: Option<&str>) -> Result<Section> {
        let mut message = Section::new();
        if let Some(ike) = ike {
            message = message.with_str("ike", ike);
        }
        self.streamed("list-conns", "list-conn", message).await
    }

    async fn list_sas(&mut self, filter: &SaFilter) -> Result<Section> {
        let mut message = Section::new().with_str("noblock", "yes");
        match filter {
            SaFilter::All => {}
            SaFilter::IkeName(name) => message = message.with_str("ike", name.as_str()),
            SaFilter::IkeId(id) => message = message.with_str("ike-id", id.as_str()),
        }
        self.streamed("list-sas", "list-sa", message).await
    }

    async fn get_pools(&mut self) -> Result<Section> {
        self.request("get-pools", Section::new()).await
    }
}
