//! Shared wire-level constants for the server frame format.
//!
//! These values are part of the wire contract with the paired client
//! implementation and must not be changed independently of it.

// === Channel ids ===

/// Channel id byte selecting the reliable, ordered delivery class.
pub const CHANNEL_ID_RELIABLE: u8 = 1;
/// Channel id byte selecting the unreliable, unordered delivery class.
pub const CHANNEL_ID_UNRELIABLE: u8 = 2;

// === Framing sizes ===

/// Fixed inbound frame header: 1 channel id byte + 4 cookie bytes.
pub const FRAME_HEADER_SIZE: usize = 5;

/// Minimum total inbound frame size: the header plus at least one payload
/// byte. Anything shorter is dropped unconditionally, which also rejects
/// zero-length noise packets without a separate branch.
pub const MIN_FRAME_SIZE: usize = FRAME_HEADER_SIZE + 1;

// === Handshake acknowledgment ===

/// Marker byte leading the outbound handshake acknowledgment.
pub const HANDSHAKE_ACK_ID: u8 = 0;

/// Total size of the handshake acknowledgment: marker byte + cookie.
///
/// Kept below [`MIN_FRAME_SIZE`] so a reflected ack can never parse as an
/// inbound data frame.
pub const HANDSHAKE_ACK_SIZE: usize = 5;

const _: () = {
    assert!(
        HANDSHAKE_ACK_SIZE < MIN_FRAME_SIZE,
        "handshake ack must stay below the inbound frame size floor"
    );
};
