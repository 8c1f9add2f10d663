//! Self-contained realtime websocket chat server.
//!
//! One port carries everything: plain GETs are answered from a static
//! asset directory, upgrade requests become websocket peers, and every
//! text frame a peer sends is rebroadcast to all peers. The core is a
//! single-threaded event loop multiplexed with `poll(2)`; see
//! [`server::Server`].

pub mod assets;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod server;
