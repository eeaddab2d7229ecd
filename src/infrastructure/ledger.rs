use async_trait::async_trait;
use base64::Engine;
use hyper::{Body, Client, Method, Request, StatusCode};
use hyper_tls::HttpsConnector;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// How long one ledger round is assumed to take when polling for
/// confirmation.
const ROUND_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Network error, timeout, or unconfigured endpoint. Triggers the
    /// write-side fallback to the simulator.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction rejected by ledger: {0}")]
    Rejected(String),

    #[error("Transaction not confirmed within {0} rounds")]
    ConfirmationTimeout(u64),

    #[error("Transaction not found: {0}")]
    NotFound(String),
}

/// Suggested parameters for building a transaction.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    pub min_fee: u64,
    pub last_round: u64,
    pub validity_window: u64,
    pub genesis_id: String,
}

/// A confirmed transaction as read back from the ledger's index.
#[derive(Debug, Clone)]
pub struct ConfirmedTransaction {
    pub note: Vec<u8>,
    pub confirmed_round: u64,
    /// Epoch seconds the containing round was sealed.
    pub round_time: i64,
}

/// The external ledger collaborator. The write path uses the node
/// endpoints; the read path uses the indexer.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn network_params(&self) -> Result<NetworkParams, LedgerError>;

    /// Submit signed transaction bytes; returns the transaction id.
    async fn submit(&self, signed: &[u8]) -> Result<String, LedgerError>;

    /// Block until the transaction is confirmed, polling once per round up
    /// to `max_rounds`.
    async fn wait_for_confirmation(&self, tx_id: &str, max_rounds: u64)
        -> Result<u64, LedgerError>;

    /// Pure read; never mutates ledger state.
    async fn lookup(&self, tx_id: &str) -> Result<ConfirmedTransaction, LedgerError>;
}

/// REST client for an algod/indexer-style node pair. Speaks both http
/// (local test nodes) and https (the public endpoints).
pub struct HttpLedgerClient {
    client: Client<HttpsConnector<hyper::client::HttpConnector>>,
    node_url: String,
    indexer_url: String,
}

#[derive(Deserialize)]
struct ParamsResponse {
    #[serde(rename = "min-fee")]
    min_fee: u64,
    #[serde(rename = "last-round")]
    last_round: u64,
    #[serde(rename = "genesis-id")]
    genesis_id: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Deserialize)]
struct PendingResponse {
    #[serde(rename = "confirmed-round")]
    confirmed_round: Option<u64>,
    #[serde(rename = "pool-error")]
    pool_error: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    transaction: LookupTransaction,
}

#[derive(Deserialize)]
struct LookupTransaction {
    /// Base64-encoded note bytes.
    note: Option<String>,
    #[serde(rename = "confirmed-round")]
    confirmed_round: u64,
    #[serde(rename = "round-time")]
    round_time: i64,
}

impl HttpLedgerClient {
    pub fn new(node_url: &str, indexer_url: &str) -> Self {
        Self {
            client: Client::builder().build(HttpsConnector::new()),
            node_url: node_url.trim_end_matches('/').to_string(),
            indexer_url: indexer_url.trim_end_matches('/').to_string(),
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        uri: String,
        body: Option<Vec<u8>>,
    ) -> Result<T, LedgerError> {
        let request = Request::builder()
            .method(method)
            .uri(&uri)
            .header("content-type", "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let status = response.status();
        let bytes = hyper::body::to_bytes(response)
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(uri));
        }
        if !status.is_success() {
            let detail = String::from_utf8_lossy(&bytes).into_owned();
            return Err(if status.is_client_error() {
                LedgerError::Rejected(format!("HTTP {status}: {detail}"))
            } else {
                LedgerError::Unavailable(format!("HTTP {status}: {detail}"))
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::Unavailable(format!("Invalid response body: {e}")))
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn network_params(&self) -> Result<NetworkParams, LedgerError> {
        let params: ParamsResponse = self
            .request_json(
                Method::GET,
                format!("{}/v2/transactions/params", self.node_url),
                None,
            )
            .await?;

        Ok(NetworkParams {
            min_fee: params.min_fee,
            last_round: params.last_round,
            validity_window: 1000,
            genesis_id: params.genesis_id,
        })
    }

    async fn submit(&self, signed: &[u8]) -> Result<String, LedgerError> {
        let response: SubmitResponse = self
            .request_json(
                Method::POST,
                format!("{}/v2/transactions", self.node_url),
                Some(signed.to_vec()),
            )
            .await?;

        debug!(tx_id = %response.tx_id, "Transaction submitted");
        Ok(response.tx_id)
    }

    async fn wait_for_confirmation(
        &self,
        tx_id: &str,
        max_rounds: u64,
    ) -> Result<u64, LedgerError> {
        for round in 0..max_rounds {
            let pending: PendingResponse = self
                .request_json(
                    Method::GET,
                    format!("{}/v2/transactions/pending/{}", self.node_url, tx_id),
                    None,
                )
                .await?;

            if let Some(err) = pending.pool_error.filter(|e| !e.is_empty()) {
                return Err(LedgerError::Rejected(err));
            }
            if let Some(confirmed) = pending.confirmed_round.filter(|r| *r > 0) {
                debug!(tx_id, confirmed_round = confirmed, "Transaction confirmed");
                return Ok(confirmed);
            }

            if round + 1 < max_rounds {
                tokio::time::sleep(std::time::Duration::from_millis(ROUND_POLL_INTERVAL_MS)).await;
            }
        }

        warn!(tx_id, max_rounds, "Confirmation wait exhausted");
        Err(LedgerError::ConfirmationTimeout(max_rounds))
    }

    async fn lookup(&self, tx_id: &str) -> Result<ConfirmedTransaction, LedgerError> {
        let response: LookupResponse = self
            .request_json(
                Method::GET,
                format!("{}/v2/transactions/{}", self.indexer_url, tx_id),
                None,
            )
            .await
            .map_err(|e| match e {
                LedgerError::NotFound(_) => LedgerError::NotFound(tx_id.to_string()),
                other => other,
            })?;

        let note = match response.transaction.note {
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| LedgerError::Unavailable(format!("Invalid note encoding: {e}")))?,
            None => Vec::new(),
        };

        Ok(ConfirmedTransaction {
            note,
            confirmed_round: response.transaction.confirmed_round,
            round_time: response.transaction.round_time,
        })
    }
}
