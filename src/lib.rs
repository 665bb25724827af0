//! Server-side connection front-end for a reliable-UDP transport.
//!
//! One [`ServerConnection`] represents a single remote peer. It splits raw
//! inbound datagrams into framing fields, enforces a per-connection
//! anti-spoof cookie, and bridges the reliable-delivery engine's lifecycle
//! notifications to a fixed set of application callbacks. The engine itself
//! and the socket-owning listener are external collaborators, consumed
//! through the [`peer::PeerEngine`] trait and the raw-send callback.
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use relnet::{
//!     Channel, PeerEngine, PeerEvents, PeerState, ServerConnection,
//!     ServerConnectionConfigBuilder,
//! };
//!
//! // The reliable-delivery engine lives outside this crate; any type
//! // implementing `PeerEngine` plugs in here.
//! struct EchoEngine;
//!
//! impl PeerEngine for EchoEngine {
//!     fn state(&self) -> PeerState {
//!         PeerState::Handshaking
//!     }
//!     fn ingest_reliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents) {
//!         events.on_data(payload, Channel::Reliable);
//!     }
//!     fn ingest_unreliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents) {
//!         events.on_data(payload, Channel::Unreliable);
//!     }
//! }
//!
//! let config = ServerConnectionConfigBuilder::new()
//!     .remote_addr("203.0.113.7:19700".parse::<std::net::SocketAddr>()?)
//!     .cookie(0xAABBCCDD)
//!     .on_connected(|addr| println!("{addr} connected"))
//!     .on_data(|payload, channel| println!("{channel:?}: {payload:?}"))
//!     .on_disconnected(|| println!("remote gone"))
//!     .on_error(|kind, msg| eprintln!("{kind:?}: {msg}"))
//!     .on_raw_send(|bytes| {
//!         // socket.send_to(bytes, remote_addr)
//!         let _ = bytes;
//!     })
//!     .build()?;
//!
//! let mut conn = ServerConnection::new(config, EchoEngine);
//! conn.handle_raw_input(Bytes::from_static(&[0x01, 0, 0, 0, 0, b'h', b'i']));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builders;
pub mod connection;
pub mod error;
pub mod peer;
pub mod protocol;

pub use builders::connection::{ServerConnectionConfig, ServerConnectionConfigBuilder};
pub use connection::{ConnectionCallbacks, ConnectionStats, ServerConnection};
pub use error::{FrameError, RelnetError};
pub use peer::{PeerEngine, PeerErrorKind, PeerEvents, PeerState};
pub use protocol::frame::{Channel, Frame};
