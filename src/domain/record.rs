use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::{DocumentHash, Metadata};

/// Tag identifying a notarization memo on the ledger. Any note without it
/// is not one of ours.
pub const RECORD_TYPE: &str = "LEGAL_DOCUMENT_NOTARIZATION";

/// Result of a successful notarization submission. Immutable; corrections
/// require a new notarization, not an edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotarizationRecord {
    pub document_hash: DocumentHash,
    /// Durable external identifier used for later verification.
    pub transaction_reference: String,
    /// Ledger round/block the transaction was confirmed in.
    pub ledger_position: u64,
    pub submitted_at_millis: i64,
    /// True when the record was produced by the fallback simulator rather
    /// than a confirmed ledger transaction. Callers that care about real
    /// anchoring must check this before treating the record as meaningful.
    pub simulated: bool,
}

/// Outcome of a verification call. Created fresh on every call and never
/// cached as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub transaction_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_hash: Option<DocumentHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub simulated: bool,
}

impl VerificationResult {
    /// "Document not notarized" is an expected outcome, not a fault.
    pub fn not_found(reference: &str, detail: &str) -> Self {
        Self {
            verified: false,
            transaction_reference: reference.to_string(),
            ledger_position: None,
            observed_hash: None,
            metadata: None,
            timestamp: None,
            error: Some(format!("Transaction not found: {detail}")),
            simulated: false,
        }
    }

    /// The ledger could not be consulted at all. Distinct from
    /// [`VerificationResult::not_found`]: absence from the ledger is a
    /// verdict, unreachability is not.
    pub fn unavailable(reference: &str, detail: &str) -> Self {
        Self {
            verified: false,
            transaction_reference: reference.to_string(),
            ledger_position: None,
            observed_hash: None,
            metadata: None,
            timestamp: None,
            error: Some(format!("Verification failed: {detail}")),
            simulated: false,
        }
    }

    /// Memo present but undecodable or the wrong shape.
    pub fn malformed(reference: &str, detail: &str) -> Self {
        Self {
            verified: false,
            transaction_reference: reference.to_string(),
            ledger_position: None,
            observed_hash: None,
            metadata: None,
            timestamp: None,
            error: Some(format!("Malformed notarization record: {detail}")),
            simulated: false,
        }
    }

    /// A decoded memo compared against the expected hash. A mismatch still
    /// carries the observed hash and metadata so callers can audit it.
    pub fn compared(
        reference: &str,
        expected_hash: &str,
        memo: MemoPayload,
        ledger_position: u64,
        timestamp: i64,
    ) -> Self {
        let verified = memo.document_hash.as_str() == expected_hash;
        Self {
            verified,
            transaction_reference: reference.to_string(),
            ledger_position: Some(ledger_position),
            observed_hash: Some(memo.document_hash),
            metadata: Some(memo.metadata),
            timestamp: Some(timestamp),
            error: None,
            simulated: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum MemoError {
    #[error("Note is not valid UTF-8 JSON: {0}")]
    Decode(String),

    #[error("Unexpected record type '{0}'")]
    WrongRecordType(String),
}

/// The wire format carried in the transaction note field. Exact shape:
/// `{"recordType":"LEGAL_DOCUMENT_NOTARIZATION","documentHash":"<hex>",
/// "metadata":{...,"notarizedAt":"<ISO-8601>","platform":"<string>"}}`.
/// Changing this shape breaks compatibility with existing records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoPayload {
    #[serde(rename = "recordType")]
    pub record_type: String,
    #[serde(rename = "documentHash")]
    pub document_hash: DocumentHash,
    pub metadata: Metadata,
}

impl MemoPayload {
    /// Build the memo for submission: caller metadata plus the
    /// engine-injected `notarizedAt` and `platform` fields.
    pub fn new(document_hash: DocumentHash, mut metadata: Metadata, platform: &str) -> Self {
        metadata.insert(
            "notarizedAt".to_string(),
            serde_json::Value::String(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        );
        metadata.insert(
            "platform".to_string(),
            serde_json::Value::String(platform.to_string()),
        );
        Self {
            record_type: RECORD_TYPE.to_string(),
            document_hash,
            metadata,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MemoError> {
        serde_json::to_vec(self).map_err(|e| MemoError::Decode(e.to_string()))
    }

    pub fn decode(note: &[u8]) -> Result<Self, MemoError> {
        let payload: Self =
            serde_json::from_slice(note).map_err(|e| MemoError::Decode(e.to_string()))?;
        if payload.record_type != RECORD_TYPE {
            return Err(MemoError::WrongRecordType(payload.record_type));
        }
        Ok(payload)
    }
}

/// Compact structure suitable for rendering as a scannable code.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationPayload {
    pub platform: String,
    #[serde(rename = "transactionReference")]
    pub transaction_reference: String,
    #[serde(rename = "documentHash")]
    pub document_hash: DocumentHash,
    #[serde(rename = "verifyUrl")]
    pub verify_url: String,
}

impl VerificationPayload {
    /// `url_template` substitutes `{reference}` with the transaction
    /// reference, e.g. `https://example.org/verify/{reference}`.
    pub fn new(
        platform: &str,
        transaction_reference: &str,
        document_hash: DocumentHash,
        url_template: &str,
    ) -> Self {
        Self {
            platform: platform.to_string(),
            transaction_reference: transaction_reference.to_string(),
            document_hash,
            verify_url: url_template.replace("{reference}", transaction_reference),
        }
    }
}
