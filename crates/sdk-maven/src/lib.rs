//! Maven plumbing for cuba-sdk.
//!
//! POM and maven-metadata.xml parsing, `${...}` property interpolation,
//! repository path/URL layout, the local Maven-layout artifact storage,
//! and the [`ArtifactManager`] that moves files between repositories.

pub mod error;
pub mod layout;
pub mod manager;
pub mod metadata;
pub mod pom;
pub mod properties;
pub mod storage;

pub use error::{MavenError, Result};
pub use manager::{ArtifactManager, UploadOutcome};
pub use metadata::{RepositoryMetadata, parse_metadata};
pub use pom::{Exclusion, ParentRef, Pom, PomDependency, PomScope, parse_pom};
pub use properties::interpolate;
pub use storage::LocalStorage;
