//! High level events.

/// A tagged event handed to the application layer by
/// [`Server::accept`](super::Server::accept).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A websocket handshake just completed. Always the first
    /// event for an id.
    Connected(u64),

    /// The peer is gone. Always the last event for an id.
    Disconnected(u64),

    /// A complete text frame arrived from a peer.
    Message { client_id: u64, text: String },

    /// A recoverable condition worth surfacing; the loop keeps running.
    Error(String),

    /// The server is no longer running.
    Shutdown,
}
