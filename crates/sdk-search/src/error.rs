//! Errors for repository search backends.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to parse {repository} search response: {source}")]
    Response {
        repository: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("repository '{repository}' is missing {what}")]
    Misconfigured { repository: String, what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] sdk_core::SdkError),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl From<SearchError> for sdk_core::SdkError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Response { source, .. } => Self::Json(source),
            SearchError::Misconfigured { repository, what } => {
                Self::Store(format!("repository '{repository}' is missing {what}"))
            }
            SearchError::Io(e) => Self::Io(e),
            SearchError::Core(e) => e,
        }
    }
}
