//! Repository search for cuba-sdk.
//!
//! One [`RepositorySearch`] trait, four backends: Nexus 2 (lucene API),
//! Nexus 3 (REST v1 search), Bintray, and local Maven-layout
//! directories. All of them normalize results into `sdk-core` types.

pub mod bintray;
pub mod error;
pub mod local;
pub mod nexus2;
pub mod nexus3;
pub mod types;

pub use bintray::BintraySearch;
pub use error::{Result, SearchError};
pub use local::LocalSearch;
pub use nexus2::Nexus2Search;
pub use nexus3::Nexus3Search;
pub use types::{RepositorySearch, SearchHit, searcher_for};
