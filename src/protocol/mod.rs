//! Wire-level protocol pieces: framing constants and the frame codec.

pub mod constants;
pub mod frame;
