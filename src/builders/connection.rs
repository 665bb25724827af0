//! Configuration and builder for [`ServerConnection`].
//!
//! [`ServerConnection`]: crate::ServerConnection

use std::net::SocketAddr;

use bytes::Bytes;

use crate::connection::ConnectionCallbacks;
use crate::error::RelnetError;
use crate::peer::PeerErrorKind;
use crate::protocol::frame::Channel;

/// Configuration for a [`ServerConnection`].
///
/// Everything here is fixed for the connection's lifetime once built.
///
/// [`ServerConnection`]: crate::ServerConnection
#[derive(Debug)]
pub struct ServerConnectionConfig {
    /// Where outbound bytes for this connection must be sent.
    pub remote_addr: SocketAddr,

    /// Security cookie the remote must echo on every post-handshake frame.
    pub cookie: u32,

    /// Application callback bundle.
    pub callbacks: ConnectionCallbacks,
}

impl ServerConnectionConfig {
    /// Creates a builder for [`ServerConnectionConfig`].
    pub fn builder() -> ServerConnectionConfigBuilder {
        ServerConnectionConfigBuilder::new()
    }
}

/// Builder for [`ServerConnectionConfig`].
///
/// The remote address and all five callbacks are mandatory. The cookie is
/// optional: when the Listener does not assign one, [`build`] draws a
/// random cookie so no connection ever runs without one.
///
/// [`build`]: ServerConnectionConfigBuilder::build
#[derive(Default)]
pub struct ServerConnectionConfigBuilder {
    remote_addr: Option<SocketAddr>,
    cookie: Option<u32>,
    on_connected: Option<Box<dyn FnMut(SocketAddr) + Send>>,
    on_data: Option<Box<dyn FnMut(Bytes, Channel) + Send>>,
    on_disconnected: Option<Box<dyn FnMut() + Send>>,
    on_error: Option<Box<dyn FnMut(PeerErrorKind, &str) + Send>>,
    on_raw_send: Option<Box<dyn FnMut(&[u8]) + Send>>,
}

impl ServerConnectionConfigBuilder {
    /// Creates a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the remote endpoint this connection serves.
    #[must_use]
    pub fn remote_addr(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    /// Sets the Listener-assigned cookie.
    #[must_use]
    pub fn cookie(mut self, cookie: u32) -> Self {
        self.cookie = Some(cookie);
        self
    }

    /// Sets the connected callback.
    #[must_use]
    pub fn on_connected(mut self, f: impl FnMut(SocketAddr) + Send + 'static) -> Self {
        self.on_connected = Some(Box::new(f));
        self
    }

    /// Sets the data callback.
    #[must_use]
    pub fn on_data(mut self, f: impl FnMut(Bytes, Channel) + Send + 'static) -> Self {
        self.on_data = Some(Box::new(f));
        self
    }

    /// Sets the disconnected callback.
    #[must_use]
    pub fn on_disconnected(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_disconnected = Some(Box::new(f));
        self
    }

    /// Sets the error callback.
    #[must_use]
    pub fn on_error(mut self, f: impl FnMut(PeerErrorKind, &str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Sets the raw-send hook.
    #[must_use]
    pub fn on_raw_send(mut self, f: impl FnMut(&[u8]) + Send + 'static) -> Self {
        self.on_raw_send = Some(Box::new(f));
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RelnetError::MissingConfigValue`] naming the first missing
    /// mandatory field.
    pub fn build(self) -> Result<ServerConnectionConfig, RelnetError> {
        let remote_addr = self
            .remote_addr
            .ok_or(RelnetError::MissingConfigValue("remote_addr"))?;

        let callbacks = ConnectionCallbacks {
            on_connected: self
                .on_connected
                .ok_or(RelnetError::MissingConfigValue("on_connected"))?,
            on_data: self
                .on_data
                .ok_or(RelnetError::MissingConfigValue("on_data"))?,
            on_disconnected: self
                .on_disconnected
                .ok_or(RelnetError::MissingConfigValue("on_disconnected"))?,
            on_error: self
                .on_error
                .ok_or(RelnetError::MissingConfigValue("on_error"))?,
            on_raw_send: self
                .on_raw_send
                .ok_or(RelnetError::MissingConfigValue("on_raw_send"))?,
        };

        Ok(ServerConnectionConfig {
            remote_addr,
            cookie: self.cookie.unwrap_or_else(rand::random),
            callbacks,
        })
    }
}
