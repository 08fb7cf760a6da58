use thiserror::Error;

/// Error types for the relaynet library
#[derive(Error, Debug)]
pub enum RelayError {
    /// Address resolution errors (unparseable or unresolvable host/port)
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// UDP-related errors (bind, send, receive)
    #[error("UDP error: {0}")]
    Udp(std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the relaynet library
pub type Result<T> = std::result::Result<T, RelayError>;

pub mod client;
pub mod common;
pub mod packet;
pub mod server;

// Re-export main types for convenience
pub use client::{ClientConfig, RelayClient};
pub use common::Callback;
pub use packet::{Encoding, Packet};
pub use server::{RelayServer, ServerConfig, SessionSet};
