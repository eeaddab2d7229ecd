pub mod hash;
pub mod record;

pub use hash::{DocumentHash, HashError, Metadata};
pub use record::{MemoPayload, NotarizationRecord, VerificationPayload, VerificationResult};
