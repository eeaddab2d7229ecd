use rand::Rng;

use crate::domain::hash::DocumentHash;
use crate::domain::record::{NotarizationRecord, VerificationResult};

/// Reserved prefix marking a synthetic transaction reference. Real ledger
/// transaction ids never carry it, so both the submitter and the verifier
/// can tell simulated records apart without any shared state.
pub const SIMULATED_PREFIX: &str = "DEMO_";

/// Upper bound for the synthetic ledger position.
const SYNTHETIC_ROUND_CEILING: u64 = 1_000_000;

pub fn is_simulated_reference(reference: &str) -> bool {
    reference.starts_with(SIMULATED_PREFIX)
}

/// Build a structurally valid record without touching the ledger. The hash
/// is the same one the real path computed; only the anchoring is synthetic,
/// and `simulated: true` is the single source of truth about that.
pub fn simulate(document_hash: DocumentHash, submitted_at_millis: i64) -> NotarizationRecord {
    NotarizationRecord {
        document_hash,
        transaction_reference: format!(
            "{}{}_{}",
            SIMULATED_PREFIX,
            submitted_at_millis,
            uuid::Uuid::new_v4().simple()
        ),
        ledger_position: rand::thread_rng().gen_range(1..SYNTHETIC_ROUND_CEILING),
        submitted_at_millis,
        simulated: true,
    }
}

/// Deterministic verification for simulated references: always verified,
/// echoing the expected hash back. Exists to keep demo round trips
/// internally consistent, not to provide any trust guarantee.
pub fn simulate_verify(reference: &str, expected_hash: &DocumentHash) -> VerificationResult {
    if !is_simulated_reference(reference) {
        return VerificationResult::not_found(reference, "not a simulated reference");
    }

    VerificationResult {
        verified: true,
        transaction_reference: reference.to_string(),
        ledger_position: Some(rand::thread_rng().gen_range(1..SYNTHETIC_ROUND_CEILING)),
        observed_hash: Some(expected_hash.clone()),
        metadata: None,
        timestamp: Some(chrono::Utc::now().timestamp()),
        error: None,
        simulated: true,
    }
}
