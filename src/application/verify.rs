use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::hash::DocumentHash;
use crate::domain::record::{MemoPayload, VerificationResult};
use crate::infrastructure::ledger::{LedgerClient, LedgerError};

use super::simulate;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Invalid hash format: must be 64 hexadecimal characters")]
    InvalidHashFormat,
}

/// Re-derives and checks a notarization proof: fetch the confirmed
/// transaction, decode its note, compare hashes. A pure read; safe to call
/// arbitrarily many times.
pub struct VerifyUseCase {
    ledger: Arc<dyn LedgerClient>,
}

impl VerifyUseCase {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Only a malformed `expected_hash` is a hard error. Absent
    /// transactions and undecodable memos are expected outcomes and come
    /// back as `verified: false` with a diagnostic, never as `Err`.
    pub async fn execute(
        &self,
        transaction_reference: &str,
        expected_hash: &str,
    ) -> Result<VerificationResult, VerifyError> {
        let expected = DocumentHash::parse(expected_hash).ok_or(VerifyError::InvalidHashFormat)?;

        // Simulated references never touch the ledger; this mirrors the
        // submitter's fallback so demo round trips stay consistent.
        if simulate::is_simulated_reference(transaction_reference) {
            debug!(reference = transaction_reference, "Verifying simulated record");
            return Ok(simulate::simulate_verify(transaction_reference, &expected));
        }

        let transaction = match self.ledger.lookup(transaction_reference).await {
            Ok(txn) => txn,
            Err(LedgerError::NotFound(detail)) => {
                return Ok(VerificationResult::not_found(transaction_reference, &detail));
            }
            Err(e) => {
                // Ledger unreachable on the read side: we cannot attest
                // either way, so report unverified with the cause.
                return Ok(VerificationResult::unavailable(
                    transaction_reference,
                    &e.to_string(),
                ));
            }
        };

        let memo = match MemoPayload::decode(&transaction.note) {
            Ok(memo) => memo,
            Err(e) => {
                return Ok(VerificationResult::malformed(
                    transaction_reference,
                    &e.to_string(),
                ));
            }
        };

        let result = VerificationResult::compared(
            transaction_reference,
            expected.as_str(),
            memo,
            transaction.confirmed_round,
            transaction.round_time,
        );
        info!(
            reference = transaction_reference,
            verified = result.verified,
            "Verification completed"
        );
        Ok(result)
    }
}
