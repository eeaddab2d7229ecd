use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{FallbackPolicy, NotaryConfig};
use crate::domain::hash::{self, HashError, Metadata};
use crate::domain::record::{MemoPayload, NotarizationRecord};
use crate::infrastructure::identity::{IdentityError, IdentityProvider, LedgerIdentity};
use crate::infrastructure::ledger::{LedgerClient, LedgerError};
use crate::infrastructure::transaction::PaymentTransaction;

use super::simulate;

#[derive(Error, Debug)]
pub enum NotarizeError {
    #[error(transparent)]
    InvalidInput(#[from] HashError),

    /// Identity is a precondition, not a network concern: no fallback.
    #[error(transparent)]
    KeyGeneration(#[from] IdentityError),

    /// Surfaced only under [`FallbackPolicy::FailFast`].
    #[error("Notarization failed: {0}")]
    LedgerUnavailable(String),
}

/// Anchors a document hash on the ledger via a zero-value self-to-self
/// transaction whose note carries the notarization memo.
pub struct NotarizeUseCase {
    ledger: Arc<dyn LedgerClient>,
    identity: Arc<dyn IdentityProvider>,
    config: NotaryConfig,
}

impl NotarizeUseCase {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        identity: Arc<dyn IdentityProvider>,
        config: NotaryConfig,
    ) -> Self {
        Self {
            ledger,
            identity,
            config,
        }
    }

    /// Hash the content, sign and submit the anchoring transaction, and
    /// block until ledger confirmation (bounded by the configured round
    /// count). On any ledger failure the call degrades to a simulated
    /// record instead of a hard error, unless configured fail-fast.
    pub async fn execute(
        &self,
        content: &[u8],
        metadata: Metadata,
    ) -> Result<NotarizationRecord, NotarizeError> {
        // Input validation errors are hard failures regardless of policy.
        let document_hash = hash::compute_hash(content, &metadata)?;

        // KeyGenerationFailed is fatal too: never fall back to a fixed key.
        let identity = self.identity.create_identity()?;

        let memo = MemoPayload::new(document_hash.clone(), metadata, &self.config.platform);

        // The ephemeral identity lives only within this call; its key
        // material is zeroized on drop on every exit path, including
        // cancellation of the await below.
        match self.submit_anchored(&identity, &memo).await {
            Ok((tx_id, confirmed_round)) => {
                info!(tx_id = %tx_id, confirmed_round, "Document notarized on ledger");
                Ok(NotarizationRecord {
                    document_hash,
                    transaction_reference: tx_id,
                    ledger_position: confirmed_round,
                    submitted_at_millis: chrono::Utc::now().timestamp_millis(),
                    simulated: false,
                })
            }
            Err(e) => match self.config.fallback {
                FallbackPolicy::FailFast => Err(NotarizeError::LedgerUnavailable(e.to_string())),
                FallbackPolicy::Simulate => {
                    warn!(error = %e, "Ledger path failed, producing simulated record");
                    Ok(simulate::simulate(
                        document_hash,
                        chrono::Utc::now().timestamp_millis(),
                    ))
                }
            },
        }
    }

    async fn submit_anchored(
        &self,
        identity: &LedgerIdentity,
        memo: &MemoPayload,
    ) -> Result<(String, u64), LedgerError> {
        let note = memo
            .encode()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;
        let params = self.ledger.network_params().await?;

        let signed = PaymentTransaction::zero_value_self(identity.address(), &note, &params)
            .sign(identity)
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;
        let bytes = signed
            .to_bytes()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;

        let tx_id = self.ledger.submit(&bytes).await?;
        let confirmed_round = self
            .ledger
            .wait_for_confirmation(&tx_id, self.config.max_confirmation_rounds)
            .await?;

        Ok((tx_id, confirmed_round))
    }
}
