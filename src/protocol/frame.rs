//! Inbound frame codec and the handshake acknowledgment encoder.
//!
//! Wire layout of a server-received datagram:
//!
//! | Offset | Size      | Field                                         |
//! |--------|-----------|-----------------------------------------------|
//! | 0      | 1         | channel id (`1` reliable, `2` unreliable)     |
//! | 1      | 4         | cookie, unsigned 32-bit, little-endian        |
//! | 5      | remainder | opaque payload for the reliable engine        |
//!
//! The cookie travels little-endian; this matches the paired client
//! encoder and is part of the wire contract.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::FrameError;
use crate::protocol::constants::{
    CHANNEL_ID_RELIABLE, CHANNEL_ID_UNRELIABLE, FRAME_HEADER_SIZE, HANDSHAKE_ACK_ID,
    HANDSHAKE_ACK_SIZE, MIN_FRAME_SIZE,
};

/// Delivery class multiplexed over a single UDP flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Ordered delivery with retransmission.
    Reliable,
    /// Unordered fire-and-forget delivery.
    Unreliable,
}

impl Channel {
    /// Resolve a wire channel id byte, or `None` for non-protocol noise.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            CHANNEL_ID_RELIABLE => Some(Channel::Reliable),
            CHANNEL_ID_UNRELIABLE => Some(Channel::Unreliable),
            _ => None,
        }
    }

    /// The wire id byte for this channel.
    pub fn id(self) -> u8 {
        match self {
            Channel::Reliable => CHANNEL_ID_RELIABLE,
            Channel::Unreliable => CHANNEL_ID_UNRELIABLE,
        }
    }
}

/// A parsed inbound frame: raw channel id, sender-claimed cookie and the
/// opaque payload.
///
/// The channel id is kept raw here because the demux validates the claimed
/// cookie before it classifies the channel; resolve it with
/// [`Frame::channel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Channel id byte exactly as received.
    pub channel_id: u8,
    /// Sender-claimed cookie, decoded little-endian.
    pub cookie: u32,
    /// Payload view from offset 5 onward. A zero-copy slice of the input
    /// datagram, never mutated.
    pub payload: Bytes,
}

impl Frame {
    /// Build an outbound frame for a known channel.
    pub fn new(channel: Channel, cookie: u32, payload: Bytes) -> Self {
        Self {
            channel_id: channel.id(),
            cookie,
            payload,
        }
    }

    /// Split a raw datagram into framing fields.
    ///
    /// Only the size floor is enforced here; the cookie and channel id are
    /// handed back for the caller to judge in its own order.
    pub fn decode(datagram: Bytes) -> Result<Self, FrameError> {
        if datagram.len() < MIN_FRAME_SIZE {
            return Err(FrameError::TooShort {
                len: datagram.len(),
            });
        }

        let cookie = u32::from_le_bytes([datagram[1], datagram[2], datagram[3], datagram[4]]);

        Ok(Self {
            channel_id: datagram[0],
            cookie,
            payload: datagram.slice(FRAME_HEADER_SIZE..),
        })
    }

    /// Resolve the raw channel id into a delivery class.
    pub fn channel(&self) -> Result<Channel, FrameError> {
        Channel::from_id(self.channel_id).ok_or(FrameError::UnknownChannel(self.channel_id))
    }

    /// Encode the frame into `dst` in wire layout.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.channel_id);
        dst.put_u32_le(self.cookie);
        dst.put_slice(&self.payload);
    }

    /// Encode the frame into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Encode the handshake acknowledgment that reveals `cookie` to the remote.
///
/// Sent once, on the authenticated notification, before the application's
/// connected callback fires. Layout: [`HANDSHAKE_ACK_ID`] marker byte
/// followed by the cookie, little-endian.
pub fn encode_handshake_ack(cookie: u32) -> [u8; HANDSHAKE_ACK_SIZE] {
    let mut buf = [0u8; HANDSHAKE_ACK_SIZE];
    buf[0] = HANDSHAKE_ACK_ID;
    buf[1..5].copy_from_slice(&cookie.to_le_bytes());
    buf
}
