//! Errors for component resolution and management.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("component '{coordinates}' is not resolved")]
    NotResolved { coordinates: String },

    #[error("no component matching '{coordinates}' in the metadata store")]
    UnknownComponent { coordinates: String },

    #[error("no {category} repository configured")]
    NoRepository { category: String },

    #[error("invalid component reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error(transparent)]
    Maven(#[from] sdk_maven::MavenError),

    #[error(transparent)]
    Search(#[from] sdk_search::SearchError),

    #[error(transparent)]
    Core(#[from] sdk_core::SdkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata store file is corrupt: {0}")]
    Store(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
