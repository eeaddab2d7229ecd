use std::sync::Arc;

use crate::config::NotaryConfig;
use crate::domain::hash::{self, DocumentHash, HashError, Metadata};
use crate::domain::record::{NotarizationRecord, VerificationPayload, VerificationResult};
use crate::infrastructure::identity::{EphemeralIdentityProvider, IdentityProvider};
use crate::infrastructure::ledger::{HttpLedgerClient, LedgerClient};

use super::notarize::{NotarizeError, NotarizeUseCase};
use super::verify::{VerifyError, VerifyUseCase};

/// The caller-facing surface: notarize, verify, hash, and verification
/// payload generation behind one handle.
pub struct NotaryService {
    notarize: NotarizeUseCase,
    verify: VerifyUseCase,
    config: NotaryConfig,
}

impl NotaryService {
    pub fn new(
        config: NotaryConfig,
        ledger: Arc<dyn LedgerClient>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            notarize: NotarizeUseCase::new(ledger.clone(), identity, config.clone()),
            verify: VerifyUseCase::new(ledger),
            config,
        }
    }

    /// Wire up the HTTP ledger client and ephemeral identities from config.
    pub fn from_config(config: NotaryConfig) -> Self {
        let ledger: Arc<dyn LedgerClient> =
            Arc::new(HttpLedgerClient::new(&config.node_url, &config.indexer_url));
        Self::new(config, ledger, Arc::new(EphemeralIdentityProvider))
    }

    /// Long-latency: blocks until ledger confirmation or fallback.
    pub async fn notarize(
        &self,
        content: &[u8],
        metadata: Metadata,
    ) -> Result<NotarizationRecord, NotarizeError> {
        self.notarize.execute(content, metadata).await
    }

    pub async fn verify(
        &self,
        transaction_reference: &str,
        expected_hash: &str,
    ) -> Result<VerificationResult, VerifyError> {
        self.verify.execute(transaction_reference, expected_hash).await
    }

    pub fn compute_hash(
        &self,
        content: &[u8],
        metadata: &Metadata,
    ) -> Result<DocumentHash, HashError> {
        hash::compute_hash(content, metadata)
    }

    /// Compact structure suitable for rendering as a scannable code.
    pub fn verification_payload(
        &self,
        transaction_reference: &str,
        document_hash: DocumentHash,
    ) -> VerificationPayload {
        VerificationPayload::new(
            &self.config.platform,
            transaction_reference,
            document_hash,
            &self.config.verify_url_template,
        )
    }
}
