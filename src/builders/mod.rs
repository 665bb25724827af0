//! Builders for configuration objects.

pub mod connection;
