use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Caller-supplied document metadata. Keys are sorted (BTreeMap) so the
/// hash preimage is canonical regardless of insertion order.
pub type Metadata = BTreeMap<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Metadata value for key '{0}' must be a scalar")]
    NonScalarValue(String),

    #[error("Failed to encode hash preimage: {0}")]
    Encoding(String),
}

/// A SHA-256 digest of (content, metadata, generation timestamp),
/// lowercase hex. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentHash(String);

impl DocumentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 produces exactly 64 hex characters.
    pub fn is_valid_format(s: &str) -> bool {
        s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Accept a caller-supplied hash string, normalizing case.
    pub fn parse(s: &str) -> Option<Self> {
        if Self::is_valid_format(s) {
            Some(Self(s.to_ascii_lowercase()))
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The serialized shape fed to SHA-256. Content is hex-encoded so binary
/// documents survive JSON without lossy conversion.
#[derive(Serialize)]
struct HashPreimage<'a> {
    content: String,
    metadata: &'a Metadata,
    timestamp: i64,
}

/// Compute the document hash with the current time as freshness marker.
///
/// Two notarizations of byte-identical content at different instants yield
/// different hashes: each notarization is a distinct event, not a
/// content-addressed deduplication key.
pub fn compute_hash(content: &[u8], metadata: &Metadata) -> Result<DocumentHash, HashError> {
    compute_hash_at(content, metadata, chrono::Utc::now().timestamp_millis())
}

/// Same as [`compute_hash`] with an explicit generation timestamp.
/// Deterministic: identical (content, metadata, timestamp) tuples always
/// produce the identical digest.
pub fn compute_hash_at(
    content: &[u8],
    metadata: &Metadata,
    timestamp_millis: i64,
) -> Result<DocumentHash, HashError> {
    let trimmed = content.trim_ascii();
    if trimmed.is_empty() {
        return Err(HashError::EmptyContent);
    }
    validate_metadata(metadata)?;

    let preimage = HashPreimage {
        content: hex::encode(trimmed),
        metadata,
        timestamp: timestamp_millis,
    };
    let bytes = serde_json::to_vec(&preimage).map_err(|e| HashError::Encoding(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(DocumentHash(format!("{:x}", hasher.finalize())))
}

/// Metadata values must be scalars (string, number, bool, null); nested
/// structures are rejected rather than silently flattened.
pub fn validate_metadata(metadata: &Metadata) -> Result<(), HashError> {
    for (key, value) in metadata {
        if value.is_object() || value.is_array() {
            return Err(HashError::NonScalarValue(key.clone()));
        }
    }
    Ok(())
}
