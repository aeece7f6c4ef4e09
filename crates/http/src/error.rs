use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unsupported HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {0}")]
    InvalidHeader(String),

    #[error("invalid connection options: {0}")]
    InvalidOptions(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("cannot decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            HttpError::Timeout(error.to_string())
        } else if error.is_connect() {
            HttpError::Connection(error.to_string())
        } else {
            HttpError::Request(error)
        }
    }
}
