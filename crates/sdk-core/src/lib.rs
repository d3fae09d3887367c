//! Shared domain model and plumbing for cuba-sdk.
//!
//! This crate holds the types every other sdk crate speaks in: Maven
//! coordinates and classifiers, component trees, repository descriptions,
//! the cached HTTP client, Maven-style version ordering, and the common
//! error type.

pub mod component;
pub mod coordinates;
pub mod error;
pub mod http;
pub mod progress;
pub mod repository;
pub mod version;

pub use component::{Component, ComponentKind};
pub use coordinates::{Classifier, MvnArtifact};
pub use error::{Result, SdkError};
pub use http::HttpClient;
pub use progress::{NoProgress, Progress};
pub use repository::{Authentication, Repository, RepositoryKind, RepositoryTarget};
