//! Per-peer server connection: raw datagram demux, cookie enforcement and
//! lifecycle bridging.
//!
//! One [`ServerConnection`] exists per remote endpoint. The owning Listener
//! looks connections up by source address and feeds each inbound datagram to
//! [`ServerConnection::handle_raw_input`]; validated payloads flow into the
//! reliable-delivery engine, whose notifications come back out through the
//! application callbacks supplied at construction.
//!
//! Instances are not meant to be shared: every entry point takes `&mut
//! self`, so concurrent calls into one connection do not compile. Callers
//! that need parallelism shard connections across workers keyed by remote
//! address.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::builders::connection::ServerConnectionConfig;
use crate::peer::{PeerEngine, PeerErrorKind, PeerEvents, PeerState};
use crate::protocol::frame::{encode_handshake_ack, Channel, Frame};

/// Application-facing callback bundle, fixed at construction.
///
/// All five handles are mandatory: every notification path has a valid
/// target for the connection's whole lifetime, and none is ever reassigned.
pub struct ConnectionCallbacks {
    /// The remote completed the handshake and has been told its cookie.
    pub on_connected: Box<dyn FnMut(SocketAddr) + Send>,
    /// A fully reassembled application message arrived.
    pub on_data: Box<dyn FnMut(Bytes, Channel) + Send>,
    /// The connection ended. Fired at most once.
    pub on_disconnected: Box<dyn FnMut() + Send>,
    /// The engine reported a non-fatal error.
    pub on_error: Box<dyn FnMut(PeerErrorKind, &str) + Send>,
    /// Bytes to put on the wire, addressed to the connection's remote.
    pub on_raw_send: Box<dyn FnMut(&[u8]) + Send>,
}

impl std::fmt::Debug for ConnectionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionCallbacks").finish_non_exhaustive()
    }
}

/// Demux counters, updated synchronously per datagram.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Datagrams handed to the demux, valid or not.
    pub frames_received: u64,
    /// Frames below the size floor.
    pub dropped_malformed: u64,
    /// Frames whose channel id named no delivery class.
    pub dropped_unknown_channel: u64,
    /// Post-authentication frames whose claimed cookie did not match.
    pub dropped_cookie_mismatch: u64,
    /// Frames that arrived after the terminal disconnect notification.
    pub dropped_disconnected: u64,
    /// Payloads handed to the engine's ingestion entry points.
    pub payloads_forwarded: u64,
}

/// One server-side connection to a single remote peer.
///
/// Owns the security cookie and the reliable-delivery engine, implements
/// the raw-datagram demux and validation protocol, and wires the engine's
/// lifecycle notifications to the application callbacks.
pub struct ServerConnection<E> {
    remote_addr: SocketAddr,
    cookie: u32,
    engine: E,
    callbacks: ConnectionCallbacks,
    stats: ConnectionStats,
}

impl<E: PeerEngine> ServerConnection<E> {
    /// Create a connection from its configuration and engine.
    ///
    /// The engine is expected to have been constructed with the same cookie
    /// carried by `config`; the Listener assigns it once per connection.
    pub fn new(config: ServerConnectionConfig, engine: E) -> Self {
        Self {
            remote_addr: config.remote_addr,
            cookie: config.cookie,
            engine,
            callbacks: config.callbacks,
            stats: ConnectionStats::default(),
        }
    }

    /// The remote endpoint this connection serves. Immutable.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// The connection's security cookie. Immutable.
    pub fn cookie(&self) -> u32 {
        self.cookie
    }

    /// Current engine lifecycle state.
    pub fn state(&self) -> PeerState {
        self.engine.state()
    }

    /// Demux counters accumulated so far.
    pub fn stats(&self) -> ConnectionStats {
        self.stats
    }

    /// Shared access to the owned engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the owned engine, for outbound sends and
    /// Listener-driven maintenance.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Process one raw inbound datagram to completion.
    ///
    /// Never fails, whatever the input: malformed or hostile frames are
    /// dropped and logged. Processing is synchronous and one-shot; any
    /// callbacks it triggers have returned by the time this call returns,
    /// and no reference to `datagram` is retained afterwards.
    pub fn handle_raw_input(&mut self, datagram: Bytes) {
        self.stats.frames_received += 1;

        // The Listener discards a connection after the terminal notification,
        // but a late datagram can still race that teardown. Nothing may reach
        // the engine once it has reported the end.
        if self.engine.state() == PeerState::Disconnected {
            self.stats.dropped_disconnected += 1;
            tracing::warn!(peer = %self.remote_addr, "dropping frame after disconnect");
            return;
        }

        let frame = match Frame::decode(datagram) {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.dropped_malformed += 1;
                tracing::warn!(peer = %self.remote_addr, error = %e, "dropping malformed frame");
                return;
            }
        };

        // The first inbound frames cannot know the server-assigned cookie;
        // it only reaches the client in the handshake ack. Enforcement
        // starts the moment the engine reports the handshake complete.
        if self.engine.state() == PeerState::Authenticated && frame.cookie != self.cookie {
            self.stats.dropped_cookie_mismatch += 1;
            tracing::warn!(
                peer = %self.remote_addr,
                claimed = %format_args!("{:#010x}", frame.cookie),
                "cookie mismatch, dropping frame"
            );
            return;
        }

        let channel = match frame.channel() {
            Ok(channel) => channel,
            Err(e) => {
                self.stats.dropped_unknown_channel += 1;
                tracing::warn!(peer = %self.remote_addr, error = %e, "dropping frame on unknown channel");
                return;
            }
        };

        self.stats.payloads_forwarded += 1;
        tracing::trace!(peer = %self.remote_addr, ?channel, len = frame.payload.len(), "forwarding payload");

        let mut bridge = EventBridge {
            remote_addr: self.remote_addr,
            cookie: self.cookie,
            callbacks: &mut self.callbacks,
        };
        match channel {
            Channel::Reliable => self.engine.ingest_reliable(frame.payload, &mut bridge),
            Channel::Unreliable => self.engine.ingest_unreliable(frame.payload, &mut bridge),
        }
    }
}

/// Forwards engine notifications to the application callbacks.
///
/// Holds disjoint borrows of the connection so the engine can drive it
/// while being mutated itself.
struct EventBridge<'a> {
    remote_addr: SocketAddr,
    cookie: u32,
    callbacks: &'a mut ConnectionCallbacks,
}

impl PeerEvents for EventBridge<'_> {
    fn on_authenticated(&mut self) {
        // Hard ordering contract: the ack reveals the cookie to the remote
        // before the application ever observes the connection, so nothing
        // the connected callback sends can race the remote learning it.
        let ack = encode_handshake_ack(self.cookie);
        (self.callbacks.on_raw_send)(&ack);

        tracing::debug!(peer = %self.remote_addr, "peer authenticated");
        (self.callbacks.on_connected)(self.remote_addr);
    }

    fn on_data(&mut self, payload: Bytes, channel: Channel) {
        (self.callbacks.on_data)(payload, channel);
    }

    fn on_disconnected(&mut self) {
        tracing::debug!(peer = %self.remote_addr, "peer disconnected");
        (self.callbacks.on_disconnected)();
    }

    fn on_error(&mut self, kind: PeerErrorKind, message: &str) {
        tracing::debug!(peer = %self.remote_addr, ?kind, message, "peer error");
        (self.callbacks.on_error)(kind, message);
    }

    fn raw_send(&mut self, bytes: &[u8]) {
        (self.callbacks.on_raw_send)(bytes);
    }
}
