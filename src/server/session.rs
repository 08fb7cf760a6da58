use std::net::SocketAddr;
use std::slice;

/// Bounded, duplicate-free set of remote endpoints in registration order.
///
/// A session is nothing more than the address of a remote endpoint that has
/// sent at least one datagram and was accepted within capacity; there are no
/// sequence numbers or last-seen timestamps. Only the server's receive loop
/// touches the set, so it needs no synchronization.
#[derive(Debug)]
pub struct SessionSet {
    sessions: Vec<SocketAddr>,
    capacity: usize,
}

impl SessionSet {
    /// Creates an empty set holding at most `capacity` sessions.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sessions.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, addr: &SocketAddr) -> bool {
        self.sessions.contains(addr)
    }

    /// Registers a new endpoint. Returns `false` when the endpoint is
    /// already present or the set is at capacity.
    pub fn try_insert(&mut self, addr: SocketAddr) -> bool {
        if self.is_full() || self.contains(&addr) {
            return false;
        }
        self.sessions.push(addr);
        true
    }

    /// Removes an endpoint, returning whether it was present.
    pub fn remove(&mut self, addr: &SocketAddr) -> bool {
        match self.sessions.iter().position(|session| session == addr) {
            Some(index) => {
                self.sessions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Iterates sessions in registration order.
    pub fn iter(&self) -> slice::Iter<'_, SocketAddr> {
        self.sessions.iter()
    }
}
