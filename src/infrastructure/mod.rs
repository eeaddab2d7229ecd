pub mod identity;
pub mod ledger;
pub mod transaction;

pub use identity::{EphemeralIdentityProvider, IdentityError, IdentityProvider, LedgerIdentity};
pub use ledger::{ConfirmedTransaction, HttpLedgerClient, LedgerClient, LedgerError, NetworkParams};
pub use transaction::{PaymentTransaction, SignedTransaction};
