use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use chatws::server::{Event, Server};

use log::debug;

const PORT: u16 = 10801;

const REQUEST: &[u8] = b"GET / HTTP/1.1\r\n\
    Host: x\r\n\
    Upgrade: websocket\r\n\
    Connection: Upgrade\r\n\
    Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
    Sec-WebSocket-Version: 13\r\n\
    \r\n";

#[test]
fn handshake() {
    env_logger::init();

    let mut server = Server::new();
    server.listen(PORT).unwrap();

    let t = thread::spawn(move || {
        let mut events = Vec::new();
        loop {
            match server.accept() {
                event @ Event::Connected(_) => events.push(event),
                event @ Event::Disconnected(_) => {
                    events.push(event);
                    break;
                }
                Event::Message { .. } | Event::Error(_) => {}
                Event::Shutdown => break,
            }
        }
        events
    });

    thread::sleep(Duration::from_millis(200));
    let mut tcp = TcpStream::connect(("127.0.0.1", PORT)).unwrap();
    debug!("client: tcp connected!");

    tcp.write_all(REQUEST).unwrap();

    let response = read_response_head(&mut tcp);
    debug!("client: response received");

    assert!(response.starts_with("HTTP/1.1 101 Switching Protocols\r\n"));
    assert!(response.contains("Upgrade: websocket\r\n"));
    assert!(response.contains("Connection: Upgrade\r\n"));
    assert!(response.contains("Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n"));

    // a plain socket shutdown must surface as a disconnect
    drop(tcp);

    let events = t.join().unwrap();
    assert_eq!(events, [Event::Connected(1), Event::Disconnected(1)]);
}

fn read_response_head(tcp: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut byte = [0_u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        tcp.read_exact(&mut byte).unwrap();
        buf.push(byte[0]);
    }
    String::from_utf8(buf).unwrap()
}
