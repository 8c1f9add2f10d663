//! Key exchange.

use super::GUID;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha1::{Digest, Sha1};

/// Derive `sec-websocket-accept` from `sec-websocket-key`.
#[inline]
pub fn derive_accept_key(sec_key: &[u8]) -> [u8; 28] {
    let mut sha1 = Sha1::default();
    sha1.update(sec_key);
    sha1.update(GUID);
    let input = sha1.finalize();
    let mut output = [0_u8; 28];
    Engine::encode_slice(&STANDARD, input, &mut output).unwrap();
    output
}
