//! Websocket handshake.
//!
//! From [RFC-6455 Section 4.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2):
//!
//! When a client starts a WebSocket connection, it sends its part of the
//! opening handshake. The server must parse at least part of this
//! handshake in order to obtain the necessary information to generate
//! the server part of the handshake.
//!
//! Requests that are not an upgrade are classified as plain GETs and
//! dispatched to the static asset responder instead.

pub mod key;
pub mod request;
pub mod response;

pub use key::derive_accept_key;
pub use request::{HttpRequest, RequestKind};
pub use response::{status_response, upgrade_response};

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Upper bound of an inbound request head.
pub const MAX_REQUEST: usize = 4096;

/// 32
pub const MAX_HEADERS: usize = 32;
