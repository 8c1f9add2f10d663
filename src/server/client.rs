use std::net::TcpStream;

/// One live peer. The registry owns the socket exclusively.
#[derive(Debug)]
pub(super) struct Client {
    pub id: u64,
    pub stream: TcpStream,
    /// The websocket handshake has completed.
    pub upgraded: bool,
    /// A close was sent or received; the socket is about to go.
    pub closed: bool,
}

impl Client {
    pub fn new(id: u64, stream: TcpStream) -> Self {
        Self {
            id,
            stream,
            upgraded: false,
            closed: false,
        }
    }
}
