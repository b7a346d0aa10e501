//! VICI packet codec for tokio

use crate::error::{Error, Result};
use crate::protocol::message::Packet;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum packet size accepted by charon's VICI transport (512 KiB)
const MAX_PACKET_SIZE: u32 = 512 * 1024;

/// Codec for reading and writing length-prefixed VICI packets
pub struct ViciCodec;

impl ViciCodec {
    /// Read a packet from an async reader
    ///
    /// Returns `None` when the peer closed the connection cleanly.
    pub async fn read<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Packet>> {
        // Read length prefix (4 bytes)
        let mut len_buf = [0u8; 4];
        match reader.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_be_bytes(len_buf);
        if len == 0 {
            return Err(Error::InvalidMessage("Zero-length packet".to_string()));
        }
        if len > MAX_PACKET_SIZE {
            return Err(Error::InvalidMessage(format!(
                "Packet too large: {} bytes",
                len
            )));
        }

        let mut buf = vec![0u8; len as usize];
        reader.read_exact(&mut buf).await?;

        let packet = Packet::decode(&buf)?;
        Ok(Some(packet))
    }

    /// Write a packet to an async writer
    pub async fn write<W: AsyncWrite + Unpin>(writer: &mut W, packet: &Packet) -> Result<()> {
        let body = packet.encode()?;
        let len = u32::try_from(body.len())
            .ok()
            .filter(|len| *len <= MAX_PACKET_SIZE)
            .ok_or_else(|| {
                Error::InvalidMessage(format!("Packet too large: {} bytes", body.len()))
            })?;

        writer.write_all(&len.to_be_bytes()).await?;
        writer.write_all(&body).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::{PacketType, Section};

    #[tokio::test]
    async fn test_write_then_read() {
        let packet = Packet::request("list-conns", Section::new().with_str("ike", "home"));
        let mut wire = Vec::new();
        ViciCodec::write(&mut wire, &packet).await.unwrap();

        let body_len = u32::from_be_bytes([wire[0], wire[1], wire[2], wire[3]]) as usize;
        assert_eq!(body_len, wire.len() - 4);

        let mut reader = &wire[..];
        let read = ViciCodec::read(&mut reader).await.unwrap().unwrap();
        assert_eq!(read, packet);
    }

    #[tokio::test]
    async fn test_read_eof() {
        let mut reader: &[u8] = &[];
        assert!(ViciCodec::read(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_zero_length() {
        let mut reader: &[u8] = &[0, 0, 0, 0];
        let err = ViciCodec::read(&mut reader).await.unwrap_err();
        assert!(err.to_string().contains("Zero-length"));
    }

    #[tokio::test]
    async fn test_read_oversized() {
        let mut reader: &[u8] = &[0, 0x10, 0, 0];
        let err = ViciCodec::read(&mut reader).await.unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn test_read_bare_response() {
        let mut reader: &[u8] = &[0, 0, 0, 1, PacketType::CmdUnknown as u8];
        let packet = ViciCodec::read(&mut reader).await.unwrap().unwrap();
        assert_eq!(packet.packet_type, PacketType::CmdUnknown);
        assert!(packet.name.is_none());
    }
}
