/// Client-side configuration
///
/// # Examples
///
/// ```
/// use relaynet::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.buffer_size, 2048);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Buffer size for receiving datagrams
    pub buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { buffer_size: 2048 }
    }
}
