use std::net::SocketAddr;

/// Server-side configuration
///
/// # Examples
///
/// ```
/// use relaynet::ServerConfig;
///
/// let config = ServerConfig {
///     bind_addr: "0.0.0.0:8080".parse().unwrap(),
///     max_sessions: 16,
///     wait_for_all: false,
///     buffer_size: 2048,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the relay socket to
    pub bind_addr: SocketAddr,
    /// Maximum number of concurrently tracked sessions; `usize::MAX` means
    /// unbounded
    pub max_sessions: usize,
    /// When set, relaying is paused until `max_sessions` endpoints have
    /// registered. Only meaningful together with a bounded `max_sessions`.
    pub wait_for_all: bool,
    /// Buffer size for receiving datagrams
    pub buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".parse().unwrap(), // Use port 0 for testing
            max_sessions: usize::MAX,
            wait_for_all: false,
            buffer_size: 2048,
        }
    }
}
