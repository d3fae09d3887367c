//! Common error type shared across the sdk crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid coordinates '{coordinates}': {reason}")]
    InvalidCoordinates { coordinates: String, reason: String },

    #[error("failed to parse {file_type}: {message}")]
    Parse { file_type: String, message: String },

    #[error("component '{component}' is not resolved")]
    NotResolved { component: String },

    #[error("no {category} repository configured")]
    NoRepository { category: String },

    #[error("metadata store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;

impl SdkError {
    /// Wrap a reqwest error together with the URL that produced it.
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    pub fn parse(file_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file_type: file_type.into(),
            message: message.into(),
        }
    }
}
