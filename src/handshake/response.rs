//! Server response emission.
//!
//! The accepting side answers an upgrade with exactly:
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! ```
//!

use super::derive_accept_key;

/// Build the 101 response for the given `sec-websocket-key` value.
pub fn upgrade_response(sec_key: &[u8]) -> Vec<u8> {
    let accept = derive_accept_key(sec_key);

    let mut buf = Vec::with_capacity(160);
    buf.extend_from_slice(b"HTTP/1.1 101 Switching Protocols\r\n");
    buf.extend_from_slice(b"Upgrade: websocket\r\n");
    buf.extend_from_slice(b"Connection: Upgrade\r\n");
    buf.extend_from_slice(b"Sec-WebSocket-Accept: ");
    buf.extend_from_slice(&accept);
    buf.extend_from_slice(b"\r\n\r\n");
    buf
}

/// Build an empty-bodied status response, e.g. `400 Bad Request`.
pub fn status_response(code: u16, reason: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n",
        code, reason
    )
    .into_bytes()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn upgrade_response_bytes() {
        let response = upgrade_response(b"dGhlIHNhbXBsZSBub25jZQ==");
        assert_eq!(
            response,
            b"HTTP/1.1 101 Switching Protocols\r\n\
              Upgrade: websocket\r\n\
              Connection: Upgrade\r\n\
              Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\
              \r\n"
        );
    }

    #[test]
    fn status_response_bytes() {
        let response = status_response(400, "Bad Request");
        assert_eq!(
            response,
            b"HTTP/1.1 400 Bad Request\r\n\
              Content-Length: 0\r\n\
              Connection: close\r\n\
              \r\n"
        );
    }
}
