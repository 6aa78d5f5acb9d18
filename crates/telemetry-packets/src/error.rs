//! Decoder error types.

use thiserror::Error;

/// Errors produced while turning a UDP datagram into a typed [`crate::Packet`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer ended before a field could be read.
    #[error("packet truncated: needed {needed} bytes at offset {offset}, buffer is {len} bytes")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The header carries a packet format other than the supported one.
    #[error("unsupported packet format {0} (expected 2022)")]
    UnsupportedFormat(u16),

    /// The packet id is valid on the wire but not decoded by this crate.
    #[error("unsupported packet id {0}")]
    UnsupportedPacket(u8),

    /// The socket failed while waiting for a datagram.
    #[error("UDP receive failed: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True when the packet is well-formed but simply not handled here.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            DecodeError::UnsupportedPacket(_) | DecodeError::UnsupportedFormat(_)
        )
    }
}
