//! Json envelope exchanged with the browser ui.
//!
//! Server to ui frames carry one of two shapes:
//!
//! ```text
//! {"type":"system","text":"Client 1 joined"}
//! {"type":"message","clientId":1,"text":"hello"}
//! ```
//!
//! Ui to server frames are opaque utf-8 and never parsed.

use serde::{Deserialize, Serialize};

/// One server-to-ui message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// Join, leave and welcome notices.
    System { text: String },
    /// A broadcast from a peer, tagged with its sender.
    Message {
        #[serde(rename = "clientId")]
        client_id: u64,
        text: String,
    },
}

impl Envelope {
    /// System notice.
    #[inline]
    pub fn system(text: impl Into<String>) -> Self {
        Envelope::System { text: text.into() }
    }

    /// Peer broadcast.
    #[inline]
    pub fn message(client_id: u64, text: impl Into<String>) -> Self {
        Envelope::Message {
            client_id,
            text: text.into(),
        }
    }

    /// Encode for the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
