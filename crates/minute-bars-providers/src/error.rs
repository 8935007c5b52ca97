use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ProviderError {
    /// Connection failures and timeouts mean the provider could not be reached at all.
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ProviderError::Unavailable(err.to_string())
        } else {
            ProviderError::Http(err)
        }
    }
}
