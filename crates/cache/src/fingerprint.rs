//! Content fingerprint of a source bundle, used as the memoization key.

use pulse_ingest::SourceBundle;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 over the four sources and the ingestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFingerprint(String);

impl SourceFingerprint {
    /// Two bundles share a fingerprint only if every source has identical
    /// bytes (or is absent in both) and `settings` match. Source origins do
    /// not participate: the same bytes from a different path ingest the same.
    pub fn of(bundle: &SourceBundle, settings: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((settings.len() as u64).to_le_bytes());
        hasher.update(settings.as_bytes());
        for (name, source) in bundle.named() {
            hasher.update(name.as_bytes());
            match source {
                Some(source) => {
                    hasher.update([1u8]);
                    hasher.update((source.bytes.len() as u64).to_le_bytes());
                    hasher.update(&source.bytes);
                }
                None => hasher.update([0u8]),
            }
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for SourceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
