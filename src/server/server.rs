use super::config::ServerConfig;
use super::session::SessionSet;
use crate::common::Callback;
use crate::packet::Packet;
use crate::{RelayError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::signal;
use tracing::{debug, info, warn};

/// UDP relay server that tracks a bounded set of sessions and forwards
/// every inbound datagram to all other known sessions.
///
/// A sender becomes a session on its first datagram, capacity permitting;
/// that first datagram is never relayed. There is no disconnect message in
/// the protocol: a session is removed only when relaying to it fails, so a
/// silent-but-reachable client is never pruned.
///
/// # Examples
///
/// Basic server setup and running:
///
/// ```no_run
/// use relaynet::{RelayServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig {
///         bind_addr: "127.0.0.1:8080".parse()?,
///         max_sessions: 16,
///         wait_for_all: false,
///         buffer_size: 2048,
///     };
///
///     let server = RelayServer::bind(config).await?;
///     server.on_connect(|addr| println!("session registered: {addr}"));
///     server.run().await?;
///     Ok(())
/// }
/// ```
///
/// Server with graceful shutdown:
///
/// ```no_run
/// use relaynet::{RelayServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = RelayServer::bind(ServerConfig::default()).await?;
///     let shutdown_signal = server.shutdown_signal();
///
///     // Run server in background
///     let server_handle = tokio::spawn(async move {
///         server.run().await
///     });
///
///     // Do other work...
///
///     // Gracefully shutdown
///     let _ = shutdown_signal.send(());
///     server_handle.await??;
///     Ok(())
/// }
/// ```
pub struct RelayServer {
    config: ServerConfig,
    socket: UdpSocket,
    on_receive: Callback<Packet>,
    on_connect: Callback<SocketAddr>,
    on_disconnect: Callback<SocketAddr>,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl RelayServer {
    /// Binds the relay socket and prepares the server to run.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let socket = UdpSocket::bind(config.bind_addr)
            .await
            .map_err(RelayError::Udp)?;
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);

        Ok(Self {
            config,
            socket,
            on_receive: Callback::new(),
            on_connect: Callback::new(),
            on_disconnect: Callback::new(),
            shutdown_signal: Arc::new(shutdown_signal),
        })
    }

    /// The address the relay socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(RelayError::Udp)
    }

    /// Registers the ingestion hook, invoked with every non-empty inbound
    /// datagram from new and known senders alike. Returns `false` when a
    /// handler is already registered.
    pub fn on_receive(&self, handler: impl Fn(Packet) + Send + Sync + 'static) -> bool {
        self.on_receive.set(handler)
    }

    /// Registers the session-registration hook. Returns `false` when a
    /// handler is already registered.
    pub fn on_connect(&self, handler: impl Fn(SocketAddr) + Send + Sync + 'static) -> bool {
        self.on_connect.set(handler)
    }

    /// Registers the session-removal hook, invoked when relaying to a
    /// session fails. Returns `false` when a handler is already registered.
    pub fn on_disconnect(&self, handler: impl Fn(SocketAddr) + Send + Sync + 'static) -> bool {
        self.on_disconnect.set(handler)
    }

    /// Returns a shutdown signal sender that can be used to gracefully stop
    /// the server.
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }

    /// Runs the receive loop until a shutdown signal or Ctrl-C arrives.
    pub async fn run(&self) -> Result<()> {
        info!(address = %self.local_addr()?, "UDP relay server listening");

        let mut sessions = SessionSet::new(self.config.max_sessions);
        let mut buffer = vec![0; self.config.buffer_size];
        let mut shutdown_rx = self.shutdown_signal.subscribe();

        loop {
            tokio::select! {
                recv_result = self.socket.recv_from(&mut buffer) => {
                    match recv_result {
                        Ok((n, addr)) => {
                            self.handle_datagram(&buffer[..n], addr, &mut sessions).await;
                        }
                        Err(e) => {
                            // A single failed receive never terminates the loop
                            warn!(error = %e, "Failed to receive datagram");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("UDP relay server stopped");
        Ok(())
    }

    async fn handle_datagram(
        &self,
        payload: &[u8],
        sender: SocketAddr,
        sessions: &mut SessionSet,
    ) {
        if !payload.is_empty() {
            debug!(%sender, size = payload.len(), "Received datagram");
            self.on_receive.invoke(Packet::from_bytes(payload));
        }

        if !sessions.contains(&sender) {
            if !sessions.try_insert(sender) {
                debug!(%sender, "Session pool full, dropping datagram");
                return;
            }
            info!(%sender, sessions = sessions.len(), "Session registered");
            self.on_connect.invoke(sender);
            // The datagram that introduced a new endpoint is never relayed
            return;
        }

        if self.config.wait_for_all && sessions.len() < self.config.max_sessions {
            debug!(%sender, sessions = sessions.len(), "Session pool not full yet, relay paused");
            return;
        }

        // Relay verbatim to every other session; a failed send means that
        // session is gone. Removal is deferred so the sweep still reaches
        // the remaining sessions.
        let mut disconnected = Vec::new();
        for &session in sessions.iter() {
            if session == sender {
                continue;
            }
            if let Err(e) = self.socket.send_to(payload, session).await {
                warn!(%session, error = %e, "Failed to relay datagram, dropping session");
                disconnected.push(session);
            }
        }
        for session in disconnected {
            sessions.remove(&session);
            self.on_disconnect.invoke(session);
        }
    }
}
