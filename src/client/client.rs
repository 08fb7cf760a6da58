use super::config::ClientConfig;
use crate::common::Callback;
use crate::packet::{Encoding, Packet};
use crate::{RelayError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{UdpSocket, lookup_host};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// UDP client endpoint bound to exactly one server address.
///
/// Connecting resolves the server address, binds an ephemeral local port and
/// immediately sends the (still empty) pending packet as a registration
/// handshake, so the server learns this client's address before any payload
/// flows. A background task then receives relayed datagrams and hands each
/// one to the registered handler.
///
/// Outbound messages are accumulated field by field into an internal pending
/// packet; [`send`](RelayClient::send) transmits that buffer without
/// clearing it, so the caller decides when a message is complete with
/// [`clear_buffer`](RelayClient::clear_buffer).
///
/// # Examples
///
/// ```no_run
/// use relaynet::RelayClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = RelayClient::connect("127.0.0.1", 8080).await?;
///     client.on_receive(|mut packet| {
///         if let Some(text) = packet.try_read_string() {
///             println!("relayed: {text}");
///         }
///     });
///
///     client.write_i32(42);
///     client.write_string("hi");
///     client.send().await?;
///     client.clear_buffer();
///
///     client.disconnect();
///     Ok(())
/// }
/// ```
pub struct RelayClient {
    shared: Arc<ClientShared>,
    pending: Packet,
    server_addr: SocketAddr,
    shutdown_signal: broadcast::Sender<()>,
}

/// State shared with the background receive task.
struct ClientShared {
    socket: UdpSocket,
    on_receive: Callback<Packet>,
}

impl RelayClient {
    /// Connects to a relay server with the default configuration.
    ///
    /// Fails with [`RelayError::InvalidAddress`] when `host:port` does not
    /// resolve to a socket address.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        Self::connect_with(host, port, ClientConfig::default()).await
    }

    /// Connects to a relay server with the given configuration.
    pub async fn connect_with(host: &str, port: u16, config: ClientConfig) -> Result<Self> {
        let server_addr = resolve(host, port).await?;

        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(RelayError::Udp)?;
        let shared = Arc::new(ClientShared {
            socket,
            on_receive: Callback::new(),
        });
        let (shutdown_signal, shutdown_rx) = broadcast::channel(1);

        let client = Self {
            shared: Arc::clone(&shared),
            pending: Packet::new(),
            server_addr,
            shutdown_signal,
        };

        // Registration handshake: the pending buffer is still empty, so the
        // datagram's only effect is introducing this client's address.
        client.send().await?;

        tokio::spawn(receive_loop(shared, shutdown_rx, config.buffer_size));

        Ok(client)
    }

    /// Registers the inbound packet handler. Returns `false` when a handler
    /// is already registered.
    pub fn on_receive(&self, handler: impl Fn(Packet) + Send + Sync + 'static) -> bool {
        self.shared.on_receive.set(handler)
    }

    /// The resolved server address this client sends to.
    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// The ephemeral local address the client socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.shared.socket.local_addr().map_err(RelayError::Udp)
    }

    /// Current length of the pending outbound buffer.
    pub fn buffer_size(&self) -> usize {
        self.pending.len()
    }

    // --- pending-buffer writes, mirroring the packet codec ---

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.pending.write_bytes(data);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.pending.write_i16(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.pending.write_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.pending.write_i64(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.pending.write_f32(value);
    }

    pub fn write_string(&mut self, value: &str) {
        self.pending.write_string(value);
    }

    pub fn write_string_with(&mut self, value: &str, encoding: Encoding) {
        self.pending.write_string_with(value, encoding);
    }

    pub fn write_i16_array(&mut self, values: &[i16]) {
        self.pending.write_i16_array(values);
    }

    pub fn write_i32_array(&mut self, values: &[i32]) {
        self.pending.write_i32_array(values);
    }

    pub fn write_i64_array(&mut self, values: &[i64]) {
        self.pending.write_i64_array(values);
    }

    pub fn write_f32_array(&mut self, values: &[f32]) {
        self.pending.write_f32_array(values);
    }

    pub fn write_string_array<S: AsRef<str>>(&mut self, values: &[S]) {
        self.pending.write_string_array(values);
    }

    /// Resets the pending outbound buffer between messages.
    pub fn clear_buffer(&mut self) {
        self.pending.clear();
    }

    /// Transmits the pending buffer to the server.
    ///
    /// The buffer is not cleared, so repeated sends retransmit the same
    /// accumulated fields until [`clear_buffer`](RelayClient::clear_buffer)
    /// is called. Safe to call concurrently with the receive loop.
    pub async fn send(&self) -> Result<()> {
        self.shared
            .socket
            .send_to(self.pending.as_slice(), self.server_addr)
            .await
            .map(|_| ())
            .map_err(RelayError::Udp)
    }

    /// Stops the background receive loop. The socket is released once the
    /// loop task has exited and the client itself is dropped; dropping the
    /// client disconnects implicitly.
    pub fn disconnect(&self) {
        let _ = self.shutdown_signal.send(());
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let target = format!("{host}:{port}");
    lookup_host(target.as_str())
        .await
        .map_err(|e| RelayError::InvalidAddress(format!("{target}: {e}")))?
        .next()
        .ok_or_else(|| RelayError::InvalidAddress(target.clone()))
}

async fn receive_loop(
    shared: Arc<ClientShared>,
    mut shutdown_rx: broadcast::Receiver<()>,
    buffer_size: usize,
) {
    let mut buffer = vec![0; buffer_size];

    loop {
        tokio::select! {
            recv_result = shared.socket.recv_from(&mut buffer) => {
                match recv_result {
                    Ok((n, addr)) => {
                        debug!(%addr, size = n, "Received datagram");
                        shared.on_receive.invoke(Packet::from_bytes(&buffer[..n]));
                    }
                    Err(e) => {
                        // Disconnect is the only documented exit path; a
                        // transient receive failure does not take the loop
                        // down.
                        warn!(error = %e, "Failed to receive datagram");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("Client receive loop stopped");
                break;
            }
        }
    }
}
