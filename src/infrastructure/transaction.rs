use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identity::LedgerIdentity;
use super::ledger::NetworkParams;

/// Domain prefix mixed into the signing bytes so a transaction signature
/// can never be replayed as a signature over some other message type.
const SIGNING_DOMAIN: &[u8] = b"LXTX1";

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Failed to encode transaction: {0}")]
    Encoding(String),
}

/// A payment transaction. Notarization uses the zero-value self-to-self
/// form: the transaction's only purpose is to timestamp the note on the
/// ledger, not to move funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    /// Base64-encoded note bytes (the notarization memo).
    pub note: String,
}

impl PaymentTransaction {
    pub fn zero_value_self(address: &str, note: &[u8], params: &NetworkParams) -> Self {
        Self {
            sender: address.to_string(),
            receiver: address.to_string(),
            amount: 0,
            fee: params.min_fee,
            first_valid: params.last_round,
            last_valid: params.last_round + params.validity_window,
            genesis_id: params.genesis_id.clone(),
            note: base64::engine::general_purpose::STANDARD.encode(note),
        }
    }

    /// Canonical bytes covered by the signature: domain prefix plus the
    /// JSON body (serde emits struct fields in declaration order, so the
    /// encoding is deterministic).
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let body = serde_json::to_vec(self).map_err(|e| TransactionError::Encoding(e.to_string()))?;
        let mut bytes = Vec::with_capacity(SIGNING_DOMAIN.len() + body.len());
        bytes.extend_from_slice(SIGNING_DOMAIN);
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn sign(self, identity: &LedgerIdentity) -> Result<SignedTransaction, TransactionError> {
        let signature = identity.sign(&self.signing_bytes()?);
        Ok(SignedTransaction {
            signature: base64::engine::general_purpose::STANDARD.encode(signature),
            public_key: base64::engine::general_purpose::STANDARD
                .encode(identity.public_key_bytes()),
            transaction: self,
        })
    }
}

/// A transaction plus its ed25519 signature, ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(rename = "txn")]
    pub transaction: PaymentTransaction,
    #[serde(rename = "sig")]
    pub signature: String,
    #[serde(rename = "key")]
    pub public_key: String,
}

impl SignedTransaction {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        serde_json::to_vec(self).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    pub fn note_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.transaction.note)
            .map_err(|e| TransactionError::Encoding(e.to_string()))
    }
}
