use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use chatws::envelope::Envelope;
use chatws::server::{Event, Server};

/// Self-contained realtime chat server.
#[derive(Debug, Parser)]
#[command(name = "chatws", version, about)]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Directory holding the browser client.
    #[arg(short, long, default_value = "static")]
    static_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut server = Server::new();
    server.set_static_root(&args.static_dir);
    server
        .listen(args.port)
        .with_context(|| format!("failed to listen on port {}", args.port))?;

    loop {
        match server.accept() {
            Event::Connected(id) => {
                let welcome = Envelope::system(format!("Welcome! You are client {}", id));
                if let Err(e) = server.send(id, &welcome.to_json()?) {
                    warn!("client {}: welcome failed: {}", id, e);
                }
                let joined = Envelope::system(format!("Client {} joined", id));
                server.broadcast(&joined.to_json()?);
            }
            Event::Message { client_id, text } => {
                let message = Envelope::message(client_id, text);
                server.broadcast(&message.to_json()?);
            }
            Event::Disconnected(id) => {
                let left = Envelope::system(format!("Client {} left", id));
                server.broadcast(&left.to_json()?);
            }
            Event::Error(description) => warn!("{}", description),
            Event::Shutdown => break,
        }
    }

    info!("shut down cleanly");
    Ok(())
}
