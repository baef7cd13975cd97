//! Random token material.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// `len` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn alphanumeric(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `bytes` random bytes encoded as unpadded URL-safe base64.
pub fn url_safe_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// A fresh anti-forgery token handed out with every login and refresh.
pub fn csrf_token() -> String {
    url_safe_token(32)
}
