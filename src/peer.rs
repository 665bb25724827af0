//! Capability interface onto the reliable-delivery engine.
//!
//! The engine itself (handshake, sliding window, retransmission,
//! reassembly) lives outside this crate. What is modelled here is the seam:
//! the engine exposes per-channel ingestion entry points and drives a
//! [`PeerEvents`] sink with lifecycle notifications while it processes a
//! payload. [`ServerConnection`] supplies that sink and owns the engine by
//! composition.
//!
//! [`ServerConnection`]: crate::ServerConnection

use bytes::Bytes;

use crate::protocol::frame::Channel;

/// Lifecycle state of the engine's internal handshake.
///
/// Strictly monotonic: `Handshaking → Authenticated → Disconnected`, no
/// cycles. In particular an engine must never report `Handshaking` again
/// once it has reported `Authenticated`; the demux's cookie policy depends
/// on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Handshake in progress; inbound cookies are not yet checked.
    Handshaking,
    /// Handshake complete; every inbound frame must carry the connection
    /// cookie.
    Authenticated,
    /// Terminal. No further notifications may fire.
    Disconnected,
}

/// Classification attached to engine-reported errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerErrorKind {
    /// The engine's internal handshake failed.
    Handshake,
    /// A payload failed to decode inside the reliable engine.
    Decode,
    /// A transport-level fault reported by the engine.
    Transport,
}

/// Notification sink the engine drives while ingesting payloads.
///
/// All five hooks execute synchronously on the calling thread, before the
/// ingestion call returns. Contract, relied upon by the bridge in this
/// crate:
///
/// - `on_authenticated` fires at most once, exactly when the handshake
///   completes;
/// - `on_disconnected` fires at most once and is terminal: no hook may
///   fire after it;
/// - `on_error` is non-terminal and may fire any number of times;
/// - `raw_send` may fire whenever the engine needs bytes on the wire
///   (handshake frames, data, acks, keepalives).
pub trait PeerEvents {
    /// The engine completed its internal handshake.
    fn on_authenticated(&mut self);

    /// A fully reassembled application message arrived on `channel`.
    fn on_data(&mut self, payload: Bytes, channel: Channel);

    /// The connection ended. Terminal.
    fn on_disconnected(&mut self);

    /// The engine reported a non-fatal error.
    fn on_error(&mut self, kind: PeerErrorKind, message: &str);

    /// The engine wants `bytes` emitted to the remote address.
    fn raw_send(&mut self, bytes: &[u8]);
}

/// Per-channel ingestion surface of the reliable-delivery engine.
///
/// Construction of a concrete engine takes its own configuration plus the
/// connection's assigned cookie; that is the implementor's affair. Both
/// ingestion calls are synchronous and one-shot: the engine processes the
/// payload to completion, driving `events` as needed, before returning.
///
/// Not safe for concurrent invocation on one instance; the `&mut self`
/// receivers make the compiler enforce what the transport's threading
/// contract demands.
pub trait PeerEngine {
    /// Current lifecycle state.
    fn state(&self) -> PeerState;

    /// Feed a validated payload into the reliable channel.
    fn ingest_reliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents);

    /// Feed a validated payload into the unreliable channel.
    fn ingest_unreliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents);
}
