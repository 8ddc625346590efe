use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Close price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("No candles returned")]
    Empty,
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorType {
    NetworkError,
    ServerError,
    RateLimited,
    Rejected,
}

impl DeliveryError {
    pub fn error_type(&self) -> DeliveryErrorType {
        match self {
            DeliveryError::Http(_) => DeliveryErrorType::NetworkError,
            DeliveryError::Status { status: 429, .. } => DeliveryErrorType::RateLimited,
            DeliveryError::Status { status, .. } if (400..500).contains(status) => {
                DeliveryErrorType::Rejected
            }
            DeliveryError::Status { .. } => DeliveryErrorType::ServerError,
        }
    }
}

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for DeliveryError {
    fn is_retryable(&self) -> bool {
        !matches!(self.error_type(), DeliveryErrorType::Rejected)
    }
}

impl Retryable for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::MissingField(_) | FetchError::NonPositivePrice(_) | FetchError::Empty => {
                false
            }
        }
    }
}

/// Per-instrument failure. Never crosses into another instrument's evaluation.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("fetch failed for {instrument} ({timeframe}m candles): {source}")]
    Fetch {
        instrument: String,
        timeframe: u32,
        #[source]
        source: FetchError,
    },

    #[error("delivery failed for {instrument}: {source}")]
    Delivery {
        instrument: String,
        #[source]
        source: DeliveryError,
    },
}

impl AlertError {
    pub fn stage(&self) -> &'static str {
        match self {
            AlertError::Fetch { .. } => "fetch",
            AlertError::Delivery { .. } => "delivery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> DeliveryError {
        DeliveryError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn client_errors_are_not_retried() {
        assert!(!status(400).is_retryable());
        assert!(!status(403).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(502).is_retryable());
    }

    #[test]
    fn malformed_responses_are_not_retried() {
        assert!(!FetchError::MissingField("trade_price").is_retryable());
        assert!(!FetchError::Empty.is_retryable());
        assert!(!FetchError::NonPositivePrice(Decimal::ZERO).is_retryable());
    }

    #[test]
    fn alert_error_names_its_stage() {
        let err = AlertError::Fetch {
            instrument: "KRW-BTC".to_string(),
            timeframe: 60,
            source: FetchError::Empty,
        };
        assert_eq!(err.stage(), "fetch");
        assert_eq!(err.to_string(), "fetch failed for KRW-BTC (60m candles): No candles returned");
    }
}
