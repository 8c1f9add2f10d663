use std::collections::BTreeMap;
use std::net::TcpStream;
use std::os::unix::io::{AsRawFd, RawFd};

use super::client::Client;

/// Owns every live client and its socket.
///
/// Ids are monotonic, start at 1 and are never reused within a
/// server lifetime. Iteration follows id order, which keeps event
/// and broadcast ordering deterministic.
#[derive(Debug, Default)]
pub(super) struct Registry {
    clients: BTreeMap<u64, Client>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Allocate the next id and take ownership of the socket.
    pub fn insert(&mut self, stream: TcpStream) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.clients.insert(id, Client::new(id, stream));
        id
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// Extract the entry. The socket closes when the client drops.
    pub fn remove(&mut self, id: u64) -> Option<Client> {
        self.clients.remove(&id)
    }

    /// Upgraded, not yet closed clients, in id order.
    pub fn iter_upgraded_mut(&mut self) -> impl Iterator<Item = &mut Client> {
        self.clients
            .values_mut()
            .filter(|c| c.upgraded && !c.closed)
    }

    /// `(id, fd)` for every client that still owns an open socket,
    /// in id order.
    pub fn poll_fds(&self) -> Vec<(u64, RawFd)> {
        self.clients
            .values()
            .filter(|c| !c.closed)
            .map(|c| (c.id, c.stream.as_raw_fd()))
            .collect()
    }
}
