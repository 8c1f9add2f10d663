//! Client request parsing and classification.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! Once a connection to the server has been established, the client
//! MUST send an opening handshake to the server. The handshake consists
//! of an HTTP Upgrade request, along with a list of required and
//! optional header fields.
//!
//! Example:
//!
//! ```text
//! GET /path HTTP/1.1
//! host: www.example.com
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==
//! sec-websocket-version: 13
//! ```
//!

use super::MAX_HEADERS;
use crate::error::HandshakeError;

/// A parsed http request, classified by kind.
#[derive(Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub kind: RequestKind,
}

/// What the request asks of the server.
#[derive(Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// Websocket upgrade, carries the raw `sec-websocket-key` value.
    Upgrade { sec_key: Vec<u8> },
    /// Plain GET, served by the static asset responder.
    Plain,
}

impl HttpRequest {
    /// Parse from a provided buffer and classify.
    ///
    /// A request is an upgrade iff `upgrade` contains the token
    /// `websocket` and `connection` contains the token `upgrade`,
    /// both case insensitive. An upgrade must also carry
    /// `sec-websocket-version: 13` and a non-empty key.
    ///
    /// If the buffer does not hold a complete http request yet,
    /// a [`HandshakeError::NotEnoughData`] error will be returned
    /// and the caller should read more.
    pub fn decode(buf: &[u8]) -> Result<Self, HandshakeError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut request = httparse::Request::new(&mut headers);

        match request.parse(buf)? {
            httparse::Status::Complete(n) => n,
            httparse::Status::Partial => return Err(HandshakeError::NotEnoughData),
        };

        // check method
        // method/path/version are always present once parse is complete
        // ref: https://docs.rs/httparse/latest/httparse/struct.Request.html
        if request.method.unwrap() != "GET" {
            return Err(HandshakeError::HttpMethod);
        }

        // check version, should be HTTP/1.1
        if request.version.unwrap() != 1_u8 {
            return Err(HandshakeError::HttpVersion);
        }

        let path = request.path.unwrap().to_owned();

        // pick out the headers the upgrade cares about,
        // names are case insensitive
        let mut upgrade: Option<&[u8]> = None;
        let mut connection: Option<&[u8]> = None;
        let mut sec_key: Option<&[u8]> = None;
        let mut sec_version: Option<&[u8]> = None;

        for hdr in request.headers.iter() {
            let slot = match hdr.name {
                n if n.eq_ignore_ascii_case("upgrade") => &mut upgrade,
                n if n.eq_ignore_ascii_case("connection") => &mut connection,
                n if n.eq_ignore_ascii_case("sec-websocket-key") => &mut sec_key,
                n if n.eq_ignore_ascii_case("sec-websocket-version") => &mut sec_version,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(hdr.value);
            }
        }

        // not an upgrade: hand over to the static responder
        if !has_token(upgrade, "websocket") || !has_token(connection, "upgrade") {
            return Ok(Self {
                path,
                kind: RequestKind::Plain,
            });
        }

        // ref: https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.1
        match sec_version {
            Some(v) if v.trim_ascii() == b"13" => {}
            _ => return Err(HandshakeError::SecWebSocketVersion),
        }

        let sec_key = match sec_key {
            Some(k) if !k.trim_ascii().is_empty() => k.trim_ascii().to_vec(),
            _ => return Err(HandshakeError::SecWebSocketKey),
        };

        Ok(Self {
            path,
            kind: RequestKind::Upgrade { sec_key },
        })
    }
}

/// Case-insensitive token search in a comma separated header value.
fn has_token(value: Option<&[u8]>, token: &str) -> bool {
    let value = match value.map(std::str::from_utf8) {
        Some(Ok(v)) => v,
        _ => return false,
    };
    value
        .split(',')
        .any(|t| t.trim().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod test {
    use super::*;

    const UPGRADE: &str = "GET /chat HTTP/1.1\r\n\
        Host: www.example.com\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
        Sec-WebSocket-Version: 13\r\n\
        \r\n";

    #[test]
    fn upgrade_request() {
        let request = HttpRequest::decode(UPGRADE.as_bytes()).unwrap();
        assert_eq!(request.path, "/chat");
        assert_eq!(
            request.kind,
            RequestKind::Upgrade {
                sec_key: b"dGhlIHNhbXBsZSBub25jZQ==".to_vec()
            }
        );
    }

    #[test]
    fn upgrade_request_case_insensitive() {
        let raw = UPGRADE
            .replace("Upgrade: websocket", "upgrade: WebSocket")
            .replace("Connection: Upgrade", "CONNECTION: upgrade");
        let request = HttpRequest::decode(raw.as_bytes()).unwrap();
        assert!(matches!(request.kind, RequestKind::Upgrade { .. }));
    }

    #[test]
    fn upgrade_request_token_list() {
        // browsers behind proxies send connection token lists
        let raw = UPGRADE.replace("Connection: Upgrade", "Connection: keep-alive, Upgrade");
        let request = HttpRequest::decode(raw.as_bytes()).unwrap();
        assert!(matches!(request.kind, RequestKind::Upgrade { .. }));
    }

    #[test]
    fn plain_request() {
        let raw = "GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n";
        let request = HttpRequest::decode(raw.as_bytes()).unwrap();
        assert_eq!(request.path, "/index.html");
        assert_eq!(request.kind, RequestKind::Plain);
    }

    #[test]
    fn plain_request_without_upgrade_token() {
        // connection alone does not make an upgrade
        let raw = "GET / HTTP/1.1\r\nHost: x\r\nConnection: Upgrade\r\n\r\n";
        let request = HttpRequest::decode(raw.as_bytes()).unwrap();
        assert_eq!(request.kind, RequestKind::Plain);
    }

    #[test]
    fn partial_request() {
        let raw = UPGRADE.as_bytes();
        for cut in [0, 1, 4, 16, raw.len() - 1] {
            assert!(matches!(
                HttpRequest::decode(&raw[..cut]),
                Err(HandshakeError::NotEnoughData)
            ));
        }
    }

    #[test]
    fn bad_method() {
        let raw = "POST / HTTP/1.1\r\nHost: x\r\n\r\n";
        assert!(matches!(
            HttpRequest::decode(raw.as_bytes()),
            Err(HandshakeError::HttpMethod)
        ));
    }

    #[test]
    fn bad_version() {
        let raw = UPGRADE.replace("Sec-WebSocket-Version: 13", "Sec-WebSocket-Version: 8");
        assert!(matches!(
            HttpRequest::decode(raw.as_bytes()),
            Err(HandshakeError::SecWebSocketVersion)
        ));
    }

    #[test]
    fn missing_key() {
        let raw = UPGRADE.replace("Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n", "");
        assert!(matches!(
            HttpRequest::decode(raw.as_bytes()),
            Err(HandshakeError::SecWebSocketKey)
        ));
    }

    #[test]
    fn token_search() {
        assert!(has_token(Some(b"websocket"), "websocket"));
        assert!(has_token(Some(b"WebSocket"), "websocket"));
        assert!(has_token(Some(b"keep-alive, Upgrade"), "upgrade"));
        assert!(!has_token(Some(b"keep-alive"), "upgrade"));
        assert!(!has_token(None, "upgrade"));
    }
}
