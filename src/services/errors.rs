use crate::models::SeriesError;
use std::time::Duration;
use thiserror::Error;

/// Errors from the market-data collaborator
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("market data request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("market data request timed out after {0:?}")]
    Timeout(Duration),

    #[error("rate limited by market data provider")]
    RateLimited,

    #[error("market data provider returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("market data provider rejected credentials: {0}")]
    Unauthorized(String),

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("unexpected market data response: {0}")]
    Schema(String),

    #[error("invalid price series: {0}")]
    InvalidSeries(#[from] SeriesError),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FetchError::Unauthorized(_) | FetchError::UnknownSymbol(_)
        )
    }
}

/// Errors from the narration collaborator
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("narration request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("narration timed out after {0:?}")]
    Timeout(Duration),

    #[error("narration service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("narration service returned no text")]
    EmptyResponse,
}

/// Errors from the delivery collaborator
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),

    #[error("delivery endpoint returned {status}: {description}")]
    Api { status: u16, description: String },
}

/// Errors while building an HTTP-backed collaborator
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
