#[cfg(test)]
mod tests {
    use crate::server::{RelayServer, ServerConfig, SessionSet};

    fn addr(port: u16) -> std::net::SocketAddr {
        format!("127.0.0.1:{port}").parse().unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.max_sessions, usize::MAX);
        assert!(!config.wait_for_all);
        assert_eq!(config.buffer_size, 2048);
    }

    #[test]
    fn sessions_register_in_order_without_duplicates() {
        let mut sessions = SessionSet::new(4);
        assert!(sessions.try_insert(addr(1000)));
        assert!(sessions.try_insert(addr(1001)));
        assert!(!sessions.try_insert(addr(1000)));

        assert_eq!(sessions.len(), 2);
        assert!(sessions.contains(&addr(1000)));
        let order: Vec<_> = sessions.iter().copied().collect();
        assert_eq!(order, vec![addr(1000), addr(1001)]);
    }

    #[test]
    fn session_capacity_is_never_exceeded() {
        let mut sessions = SessionSet::new(2);
        assert!(sessions.try_insert(addr(1000)));
        assert!(sessions.try_insert(addr(1001)));
        assert!(sessions.is_full());

        for port in 1002..1100 {
            assert!(!sessions.try_insert(addr(port)));
        }
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn removal_frees_capacity() {
        let mut sessions = SessionSet::new(1);
        assert!(sessions.try_insert(addr(1000)));
        assert!(!sessions.try_insert(addr(1001)));

        assert!(sessions.remove(&addr(1000)));
        assert!(!sessions.remove(&addr(1000)));
        assert!(sessions.is_empty());

        assert!(sessions.try_insert(addr(1001)));
    }

    #[test]
    fn unbounded_set_accepts_many_sessions() {
        let mut sessions = SessionSet::new(usize::MAX);
        for port in 1000..1512 {
            assert!(sessions.try_insert(addr(port)));
        }
        assert_eq!(sessions.len(), 512);
        assert!(!sessions.is_full());
    }

    #[tokio::test]
    async fn bind_reports_local_address() {
        let server = RelayServer::bind(ServerConfig::default()).await.unwrap();
        let local = server.local_addr().unwrap();
        assert_ne!(local.port(), 0);
        assert!(server.shutdown_signal().receiver_count() == 0);
    }

    #[tokio::test]
    async fn handlers_register_exactly_once() {
        let server = RelayServer::bind(ServerConfig::default()).await.unwrap();
        assert!(server.on_receive(|_| {}));
        assert!(!server.on_receive(|_| {}));
        assert!(server.on_connect(|_| {}));
        assert!(!server.on_connect(|_| {}));
        assert!(server.on_disconnect(|_| {}));
        assert!(!server.on_disconnect(|_| {}));
    }
}
