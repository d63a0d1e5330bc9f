//! # Content Digests
//!
//! SHA-256 fingerprints of canonical bytes. Two calculations over the same
//! claim and the same reference data produce the same digest, which is how
//! callers detect that a cached estimate is still current.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A SHA-256 digest over [`CanonicalBytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            // Writing to a String cannot fail.
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Fingerprint a canonical snapshot.
pub fn sha256_digest(snapshot: &CanonicalBytes) -> ContentDigest {
    ContentDigest(Sha256::digest(snapshot.as_bytes()).into())
}

/// Hex string of [`sha256_digest`].
pub fn sha256_hex(snapshot: &CanonicalBytes) -> String {
    sha256_digest(snapshot).to_hex()
}
