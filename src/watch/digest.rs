// src/watch/digest.rs

use std::fmt;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;
use tracing::trace;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Hex-encoded BLAKE3 fingerprint of a file's full contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Length of the hex representation (32 bytes, two chars each).
    pub const HEX_LEN: usize = 64;

    /// Digest of an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Digest(blake3::hash(bytes).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the digest of a single file.
///
/// Fails with `PollwatchError::IoError` if the file cannot be opened or read.
/// That means "state could not be confirmed", not "the file is gone".
pub fn compute_file_digest(fs: &dyn FileSystem, path: &Path) -> Result<Digest> {
    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = Digest(hasher.finalize().to_hex().to_string());
    trace!(?path, digest = %digest, "computed file digest");
    Ok(digest)
}
