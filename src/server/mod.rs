//! Poll driven chat server core.
//!
//! One thread drives everything: [`Server::accept`] multiplexes the
//! listening socket with every client socket through `poll(2)` and
//! turns raw bytes into a single ordered stream of [`Event`]s. The
//! handshake runs synchronously when the listener becomes readable;
//! afterwards each readable client socket is fed through the frame
//! codec. All suspension happens inside the poll call and inside
//! blocking socket reads and writes.

mod client;
mod event;
mod poll;
mod registry;

pub use event::Event;

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use crate::assets;
use crate::error::{Error, HandshakeError, ServerError};
use crate::frame::codec::{read_frame, write_frame, Incoming, MAX_PAYLOAD};
use crate::frame::OpCode;
use crate::handshake::{status_response, upgrade_response, HttpRequest, RequestKind, MAX_REQUEST};

use poll::PollSet;
use registry::Registry;

/// Poll timeout; bounds how long `accept` sleeps between shutdown checks.
const POLL_TIMEOUT_MS: i32 = 5_000;

/// Read timeout on upgraded sockets; a peer stalling mid-frame is evicted.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// The chat server. An explicit handle, created once and driven by a
/// single caller.
pub struct Server {
    listener: Option<TcpListener>,
    registry: Registry,
    queue: VecDeque<Event>,
    running: bool,
    static_root: PathBuf,
    max_payload: usize,
}

impl Server {
    pub fn new() -> Self {
        Self {
            listener: None,
            registry: Registry::new(),
            queue: VecDeque::new(),
            running: true,
            static_root: PathBuf::from("static"),
            max_payload: MAX_PAYLOAD,
        }
    }

    /// Directory the asset responder serves from. Default `static`.
    pub fn set_static_root(&mut self, root: impl AsRef<Path>) {
        self.static_root = root.as_ref().to_owned();
    }

    /// Bind the listening socket.
    pub fn listen(&mut self, port: u16) -> Result<(), Error> {
        if port == 0 {
            return Err(ServerError::InvalidPort.into());
        }
        if self.listener.is_some() {
            return Err(ServerError::AlreadyListening.into());
        }

        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
        info!("listening on port {}", port);

        self.listener = Some(listener);
        self.running = true;
        Ok(())
    }

    /// Produce the next event, blocking until one is available.
    ///
    /// Pending events queued by an earlier poll cycle drain first, in
    /// FIFO order. Within one cycle, new connections are queued before
    /// events of existing clients; existing clients follow id order.
    pub fn accept(&mut self) -> Event {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return event;
            }
            if !self.running || self.listener.is_none() {
                return Event::Shutdown;
            }

            if let Err(e) = self.poll_once() {
                // poll itself failed; the loop cannot continue
                warn!("poll failed: {}", e);
                self.running = false;
                self.queue.push_back(Event::Error(format!("poll failed: {}", e)));
            }
        }
    }

    /// Stop the server. `accept` observes the flag at the next poll
    /// timeout and returns [`Event::Shutdown`] once the queue drains.
    pub fn shutdown(&mut self) {
        self.running = false;
    }

    /// Send one text frame to one client.
    pub fn send(&mut self, id: u64, text: &str) -> Result<(), Error> {
        let client = self
            .registry
            .get_mut(id)
            .ok_or(ServerError::UnknownClient(id))?;
        if !client.upgraded || client.closed {
            return Err(ServerError::ClientClosed(id).into());
        }

        match write_frame(&mut client.stream, OpCode::Text, text.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.evict(id, "write failed");
                Err(e)
            }
        }
    }

    /// Send one text frame to every upgraded client, the caller
    /// included if it is still connected. Write failures evict the
    /// failing client and are otherwise swallowed.
    pub fn broadcast(&mut self, text: &str) {
        let mut failed = Vec::new();

        for client in self.registry.iter_upgraded_mut() {
            if let Err(e) = write_frame(&mut client.stream, OpCode::Text, text.as_bytes()) {
                warn!("client {}: broadcast write failed: {}", client.id, e);
                failed.push(client.id);
            }
        }

        for id in failed {
            self.evict(id, "write failed");
        }
    }

    /// Close one client. Idempotent; unknown ids are ignored.
    pub fn close(&mut self, id: u64) {
        if let Some(mut client) = self.registry.remove(id) {
            debug!("client {}: closed by application", id);
            if client.upgraded {
                let _ = write_frame(&mut client.stream, OpCode::Close, &[]);
                self.queue.push_back(Event::Disconnected(id));
            }
        }
    }

    /// Run one poll cycle and queue whatever it produced.
    fn poll_once(&mut self) -> std::io::Result<()> {
        let listener_fd = match &self.listener {
            Some(listener) => listener.as_raw_fd(),
            None => return Ok(()),
        };

        let clients = self.registry.poll_fds();

        let mut set = PollSet::with_capacity(clients.len() + 1);
        set.push(listener_fd);
        for (_, fd) in &clients {
            set.push(*fd);
        }

        if set.wait(POLL_TIMEOUT_MS)? == 0 {
            // timeout; the caller re-checks the running flag
            return Ok(());
        }

        // new connections first
        if set.readiness(0).readable {
            self.accept_connection();
        }

        // then existing clients, readable data before hang-ups
        for (idx, (id, _)) in clients.iter().enumerate() {
            let readiness = set.readiness(idx + 1);
            if readiness.readable {
                self.service_client(*id);
            }
            if readiness.hangup {
                self.evict(*id, "connection reset");
            }
        }

        Ok(())
    }

    /// Accept one pending connection and run the handshake on it.
    fn accept_connection(&mut self) {
        let listener = match &self.listener {
            Some(listener) => listener,
            None => return,
        };

        let (stream, addr) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(e) => {
                self.queue.push_back(Event::Error(format!("accept failed: {}", e)));
                return;
            }
        };

        // a silent or stalled peer must not hold the loop forever
        if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
            self.queue.push_back(Event::Error(format!("accept failed: {}", e)));
            return;
        }

        let id = self.registry.insert(stream);
        debug!("client {}: tcp accepted from {}", id, addr);

        if let Err(e) = self.handshake(id) {
            // pre-upgrade failure: no Connected was emitted, so the
            // client vanishes without a Disconnected
            warn!("client {}: handshake failed: {}", id, e);
            self.registry.remove(id);
            self.queue
                .push_back(Event::Error(format!("client {}: {}", id, e)));
        }
    }

    /// Read and answer the opening request of a fresh connection.
    fn handshake(&mut self, id: u64) -> Result<(), Error> {
        let client = match self.registry.get_mut(id) {
            Some(client) => client,
            None => return Ok(()),
        };

        let mut buf = [0_u8; MAX_REQUEST];
        let mut filled = 0;

        let request = loop {
            if filled == buf.len() {
                return Err(HandshakeError::RequestTooLarge.into());
            }

            let n = client.stream.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(HandshakeError::UnexpectedEof.into());
            }
            filled += n;

            match HttpRequest::decode(&buf[..filled]) {
                Ok(request) => break request,
                Err(HandshakeError::NotEnoughData) => continue,
                Err(e) => {
                    // a broken request still deserves an answer
                    let _ = client.stream.write_all(&status_response(400, "Bad Request"));
                    return Err(e.into());
                }
            }
        };

        match request.kind {
            RequestKind::Upgrade { sec_key } => {
                client.stream.write_all(&upgrade_response(&sec_key))?;
                client.upgraded = true;
                debug!("client {}: upgraded ({})", id, request.path);
                self.queue.push_back(Event::Connected(id));
            }
            RequestKind::Plain => {
                debug!("client {}: static {}", id, request.path);
                if let Err(e) = assets::serve(&mut client.stream, &self.static_root, &request.path)
                {
                    debug!("client {}: asset write failed: {}", id, e);
                }
                // static requests never produce events
                self.registry.remove(id);
            }
        }

        Ok(())
    }

    /// Feed one readable client through the frame codec.
    fn service_client(&mut self, id: u64) {
        let client = match self.registry.get_mut(id) {
            Some(client) => client,
            None => return,
        };

        match read_frame(&mut client.stream, self.max_payload) {
            Ok(Incoming::Text(text)) => {
                debug!("client {}: text frame, {} bytes", id, text.len());
                self.queue.push_back(Event::Message {
                    client_id: id,
                    text,
                });
            }
            Ok(Incoming::Close(payload)) => {
                // mirror the close, then tear down
                client.closed = true;
                let _ = write_frame(&mut client.stream, OpCode::Close, &payload);
                self.evict(id, "close frame");
            }
            Ok(Incoming::Ping(payload)) => {
                debug!("client {}: ping, {} bytes", id, payload.len());
                if write_frame(&mut client.stream, OpCode::Pong, &payload).is_err() {
                    self.evict(id, "write failed");
                }
            }
            Ok(Incoming::Pong) => {}
            Ok(Incoming::Eof) => {
                self.evict(id, "peer closed");
            }
            Err(e) => {
                warn!("client {}: {}", id, e);
                self.evict(id, "protocol or io error");
            }
        }
    }

    /// Drop one client. Emits `Disconnected` exactly once for clients
    /// that had completed the handshake; a failure on one client never
    /// affects another.
    fn evict(&mut self, id: u64, reason: &str) {
        if let Some(client) = self.registry.remove(id) {
            debug!("client {}: evicted ({})", id, reason);
            if client.upgraded {
                self.queue.push_back(Event::Disconnected(id));
            }
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}
