use std::env;

/// Default public testnet endpoints; overridable via environment.
const DEFAULT_NODE_URL: &str = "https://testnet-api.algonode.cloud";
const DEFAULT_INDEXER_URL: &str = "https://testnet-idx.algonode.cloud";
const DEFAULT_PLATFORM: &str = "LexAnchor";
const DEFAULT_VERIFY_URL: &str = "https://lexanchor.example/verify/{reference}";

/// Bounded confirmation wait, in ledger rounds.
pub const DEFAULT_MAX_CONFIRMATION_ROUNDS: u64 = 4;

/// What to do when the ledger is unreachable during notarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Return a structurally valid record tagged `simulated: true`.
    /// Preserves availability for demo/offline use; callers must check the
    /// flag before treating the record as legally meaningful.
    #[default]
    Simulate,
    /// Surface the ledger failure as a hard error. For deployments where a
    /// simulated record is worse than no record.
    FailFast,
}

#[derive(Debug, Clone)]
pub struct NotaryConfig {
    pub node_url: String,
    pub indexer_url: String,
    /// Platform tag injected into every memo's metadata.
    pub platform: String,
    /// Template for scannable verification links; `{reference}` is replaced
    /// with the transaction reference.
    pub verify_url_template: String,
    pub max_confirmation_rounds: u64,
    pub fallback: FallbackPolicy,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            indexer_url: DEFAULT_INDEXER_URL.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            verify_url_template: DEFAULT_VERIFY_URL.to_string(),
            max_confirmation_rounds: DEFAULT_MAX_CONFIRMATION_ROUNDS,
            fallback: FallbackPolicy::Simulate,
        }
    }
}

impl NotaryConfig {
    /// Build from `LEXANCHOR_*` environment variables, falling back to the
    /// testnet defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            node_url: env::var("LEXANCHOR_NODE_URL").unwrap_or(defaults.node_url),
            indexer_url: env::var("LEXANCHOR_INDEXER_URL").unwrap_or(defaults.indexer_url),
            platform: env::var("LEXANCHOR_PLATFORM").unwrap_or(defaults.platform),
            verify_url_template: env::var("LEXANCHOR_VERIFY_URL")
                .unwrap_or(defaults.verify_url_template),
            max_confirmation_rounds: env::var("LEXANCHOR_MAX_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONFIRMATION_ROUNDS),
            fallback: match env::var("LEXANCHOR_FALLBACK").as_deref() {
                Ok("fail-fast") => FallbackPolicy::FailFast,
                _ => FallbackPolicy::Simulate,
            },
        }
    }
}
