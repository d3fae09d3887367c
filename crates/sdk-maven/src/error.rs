//! Errors specific to POM handling and artifact transfer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("failed to parse pom.xml: {message}")]
    PomParse { message: String },

    #[error("failed to parse maven-metadata.xml: {message}")]
    MetadataParse { message: String },

    #[error("{coordinates} ({file}) is not in the local storage")]
    NotInStorage { coordinates: String, file: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] sdk_core::SdkError),
}

pub type Result<T> = std::result::Result<T, MavenError>;

impl From<MavenError> for sdk_core::SdkError {
    fn from(err: MavenError) -> Self {
        match err {
            MavenError::PomParse { message } => Self::parse("pom.xml", message),
            MavenError::MetadataParse { message } => Self::parse("maven-metadata.xml", message),
            MavenError::NotInStorage { coordinates, file } => {
                Self::Store(format!("{coordinates} ({file}) missing from local storage"))
            }
            MavenError::Io(e) => Self::Io(e),
            MavenError::Core(e) => e,
        }
    }
}
