//! UDP receive side: one datagram in, one decoded packet out.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use tokio::net::UdpSocket;
use tracing::info;

use crate::error::DecodeError;
use crate::{Packet, decode_packet};

/// Default F1 telemetry UDP port.
pub const DEFAULT_PORT: u16 = 20777;

/// Receive buffer size; larger than any F1 2022 datagram.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// A bound UDP socket that decodes every datagram it receives.
pub struct PacketListener {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl PacketListener {
    /// Bind on all interfaces at `port`. Port 0 picks an ephemeral port.
    pub async fn bind(port: u16) -> Result<Self, DecodeError> {
        let bind_addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        let socket = UdpSocket::bind(bind_addr).await?;
        info!(addr = %bind_addr, "listening for F1 2022 telemetry");
        Ok(Self {
            socket,
            buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DecodeError> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait for the next datagram and decode it.
    ///
    /// Socket failures surface as [`DecodeError::Io`]; malformed datagrams as
    /// the other variants. Either way the listener stays usable.
    pub async fn recv(&mut self) -> Result<Packet, DecodeError> {
        let len = self.socket.recv(&mut self.buf).await?;
        let datagram = self.buf.get(..len).unwrap_or_default();
        decode_packet(datagram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::build_car_telemetry_packet;
    use crate::kind::PacketKind;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[tokio::test]
    async fn receives_and_decodes_a_datagram() -> TestResult {
        let mut listener = PacketListener::bind(0).await?;
        let port = listener.local_addr()?.port();

        let sender = UdpSocket::bind("127.0.0.1:0").await?;
        let raw = build_car_telemetry_packet(0, &[(287, 7, 11_500)]);
        sender.send_to(&raw, ("127.0.0.1", port)).await?;

        let packet = listener.recv().await?;
        assert_eq!(packet.kind(), PacketKind::CarTelemetry);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_datagram_does_not_poison_listener() -> TestResult {
        let mut listener = PacketListener::bind(0).await?;
        let port = listener.local_addr()?.port();
        let sender = UdpSocket::bind("127.0.0.1:0").await?;

        sender.send_to(&[1, 2, 3], ("127.0.0.1", port)).await?;
        assert!(matches!(
            listener.recv().await,
            Err(DecodeError::Truncated { .. })
        ));

        let raw = build_car_telemetry_packet(0, &[(100, 3, 8000)]);
        sender.send_to(&raw, ("127.0.0.1", port)).await?;
        assert_eq!(listener.recv().await?.kind(), PacketKind::CarTelemetry);
        Ok(())
    }
}
