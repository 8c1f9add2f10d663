//! Static asset responder.
//!
//! Serves the browser client for plain GET requests that share the
//! listening port with the websocket endpoint. Files are read whole
//! into a transient buffer and streamed with `Connection: close`.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use log::debug;

use crate::handshake::status_response;

/// Files above this size respond `500`.
pub const MAX_FILE_SIZE: u64 = 1 << 20;

/// Serve one request for `path` below `root` and write the
/// response to the IO sink.
///
/// `/` maps to `/index.html`. Paths holding `..` or a NUL byte are
/// rejected with `400`; missing files respond `404`; everything else
/// that fails responds `500`.
pub fn serve<IO: Write>(io: &mut IO, root: &Path, path: &str) -> io::Result<()> {
    if path.contains("..") || path.contains('\0') {
        io.write_all(&status_response(400, "Bad Request"))?;
        return Ok(());
    }

    let path = if path == "/" { "/index.html" } else { path };
    let file = root.join(path.trim_start_matches('/'));

    let meta = match fs::metadata(&file) {
        Ok(meta) => meta,
        Err(ref e) if e.kind() == ErrorKind::NotFound => {
            debug!("asset {}: not found", path);
            io.write_all(&status_response(404, "Not Found"))?;
            return Ok(());
        }
        Err(_) => {
            io.write_all(&status_response(500, "Internal Server Error"))?;
            return Ok(());
        }
    };

    if !meta.is_file() || meta.len() > MAX_FILE_SIZE {
        io.write_all(&status_response(500, "Internal Server Error"))?;
        return Ok(());
    }

    let body = match fs::read(&file) {
        Ok(body) => body,
        Err(_) => {
            io.write_all(&status_response(500, "Internal Server Error"))?;
            return Ok(());
        }
    };

    debug!("asset {}: {} bytes", path, body.len());

    let head = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        content_type(path),
        body.len()
    );

    io.write_all(head.as_bytes())?;
    io.write_all(&body)?;

    Ok(())
}

/// Infer the content type from the path suffix.
fn content_type(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "text/html"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".json") {
        "application/json"
    } else {
        "application/octet-stream"
    }
}
