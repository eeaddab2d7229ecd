pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{NotarizeError, NotarizeUseCase, NotaryService, VerifyError, VerifyUseCase};
pub use config::{FallbackPolicy, NotaryConfig};
pub use domain::{DocumentHash, Metadata, NotarizationRecord, VerificationPayload, VerificationResult};
pub use infrastructure::{EphemeralIdentityProvider, IdentityProvider, LedgerClient};
