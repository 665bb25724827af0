use thiserror::Error;

/// Errors that may occur while interpreting an inbound wire frame.
///
/// These never escape [`ServerConnection::handle_raw_input`]: the demux
/// degrades every decode failure to drop-and-log, since undersized or
/// unrecognised frames are expected background noise on a public UDP port.
///
/// [`ServerConnection::handle_raw_input`]: crate::ServerConnection::handle_raw_input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The datagram is shorter than the frame header plus one payload byte.
    #[error("frame too short: {len} bytes, minimum is 6")]
    TooShort { len: usize },

    /// The channel id byte did not name a known delivery class.
    #[error("unknown channel id: {0:#04x}")]
    UnknownChannel(u8),
}

/// Top-level error type for this crate.
#[derive(Error, Debug)]
pub enum RelnetError {
    /// A required configuration value was not supplied to a builder.
    #[error("missing config value: {0}")]
    MissingConfigValue(&'static str),

    /// Wrapper for frame decode errors.
    #[error(transparent)]
    Frame(#[from] FrameError),
}
