pub mod clients;
mod error;
mod retry;
mod runner;
mod types;

pub use clients::{CandleSource, UpbitApiClient};
pub use error::{AlertError, DeliveryError, DeliveryErrorType, FetchError, Retryable};
pub use retry::{RetryConfig, RetryHandler};
pub use runner::{AlertRunner, RunSettings};
pub use types::{InstrumentOutcome, RunSummary};
