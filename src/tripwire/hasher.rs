//! FIM-002: SHA-256 content hashing for watched files.

use crate::core::error::{IntegrityError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

const STREAM_BUF_SIZE: usize = 65536;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hash a file's contents by streaming it. Returns lowercase hex.
pub fn hash_file(path: &Path) -> Result<String> {
    let hash_err = |source| IntegrityError::Hash {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(hash_err)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; STREAM_BUF_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(hash_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash an in-memory buffer. Returns lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Whether `s` looks like a digest this module produces.
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
