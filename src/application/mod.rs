mod notarize;
mod service;
pub mod simulate;
mod verify;

pub use notarize::{NotarizeError, NotarizeUseCase};
pub use service::NotaryService;
pub use simulate::SIMULATED_PREFIX;
pub use verify::{VerifyError, VerifyUseCase};
