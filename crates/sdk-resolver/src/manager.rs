//! Component manager: resolve / push / remove orchestration.
//!
//! Drives the closure walker, verifies which classifiers actually
//! downloaded, uploads to target repositories with per-file
//! skip-if-present, and guards removal of artifacts shared between
//! resolved components. Independent transfers run with bounded
//! concurrency.

use crate::closure::resolve_closure;
use crate::error::{ResolveError, Result};
use crate::store::MetadataStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use sdk_core::{Component, MvnArtifact, Progress, Repository};
use sdk_maven::{ArtifactManager, UploadOutcome};
use sdk_search::RepositorySearch;
use sdk_core::version::compare_versions;
use std::sync::Arc;
use tracing::{debug, warn};

const DOWNLOAD_CONCURRENCY: usize = 8;
const UPLOAD_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub uploaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveSummary {
    /// Artifacts deleted from local storage.
    pub removed: usize,
    /// Artifacts kept because another resolved component owns them.
    pub retained: usize,
}

pub struct ComponentManager {
    artifacts: Arc<ArtifactManager>,
    store: Arc<MetadataStore>,
    targets: Vec<Repository>,
    searchers: Vec<Box<dyn RepositorySearch>>,
}

impl ComponentManager {
    pub fn new(
        artifacts: Arc<ArtifactManager>,
        store: Arc<MetadataStore>,
        targets: Vec<Repository>,
        searchers: Vec<Box<dyn RepositorySearch>>,
    ) -> Self {
        Self {
            artifacts,
            store,
            targets,
            searchers,
        }
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Resolves a component template: walks the dependency closure,
    /// downloads every required variant, records what was actually
    /// obtained, and persists the component as resolved.
    pub async fn resolve(
        &self,
        mut component: Component,
        progress: &dyn Progress,
    ) -> Result<Component> {
        let mut seeds = component.template_artifacts();
        self.enrich_from_searchers(&mut seeds).await;

        progress.begin_phase("resolving dependency closure", 0);
        let closure = resolve_closure(
            self.artifacts.as_ref(),
            seeds,
            &component.classifiers,
            progress,
        )
        .await?;
        for coordinates in &closure.missing {
            warn!(coordinates = %coordinates, "not resolvable, skipped");
        }

        let total: u64 = closure
            .artifacts
            .iter()
            .map(|a| a.classifiers.len() as u64)
            .sum();
        progress.begin_phase("downloading artifacts", total);

        let manager = self.artifacts.as_ref();
        let mut downloaded: Vec<(usize, MvnArtifact)> =
            stream::iter(closure.artifacts.into_iter().enumerate())
                .map(|(i, artifact)| async move {
                    let mut kept = MvnArtifact::new(
                        &artifact.group_id,
                        &artifact.artifact_id,
                        &artifact.version,
                    );
                    for classifier in &artifact.classifiers {
                        match manager.download(&artifact, classifier).await? {
                            Some(_) => {
                                kept.add_classifier(classifier.clone());
                            }
                            None => debug!(
                                artifact = %artifact,
                                classifier = %classifier,
                                "variant not published, skipped"
                            ),
                        }
                        progress.advance(1);
                    }
                    Ok::<_, ResolveError>((i, kept))
                })
                .buffer_unordered(DOWNLOAD_CONCURRENCY)
                .try_collect()
                .await?;

        downloaded.sort_by_key(|(i, _)| *i);
        component.artifacts = downloaded
            .into_iter()
            .map(|(_, artifact)| artifact)
            .filter(|artifact| !artifact.classifiers.is_empty())
            .collect();

        self.store.save_resolved(&component)?;
        progress.finish();
        Ok(component)
    }

    /// Uploads a resolved component to target repositories. With a
    /// repository name only that target is used; otherwise every
    /// configured TARGET repository.
    pub async fn push(
        &self,
        coordinates: &str,
        target_name: Option<&str>,
        progress: &dyn Progress,
    ) -> Result<(Component, PushSummary)> {
        let component =
            self.store
                .find_resolved(coordinates)
                .ok_or_else(|| ResolveError::NotResolved {
                    coordinates: coordinates.to_string(),
                })?;

        let targets: Vec<&Repository> = match target_name {
            Some(name) => self.targets.iter().filter(|r| r.name == name).collect(),
            None => self.targets.iter().filter(|r| r.is_target()).collect(),
        };
        if targets.is_empty() {
            return Err(ResolveError::NoRepository {
                category: "target".into(),
            });
        }

        let files: u64 = component
            .artifacts
            .iter()
            .map(|a| a.classifiers.len() as u64)
            .sum();
        progress.begin_phase("uploading artifacts", files * targets.len() as u64);

        let mut summary = PushSummary::default();
        for target in targets {
            let manager = self.artifacts.as_ref();
            let outcomes: Vec<PushSummary> = stream::iter(component.artifacts.iter())
                .map(|artifact| async move {
                    let mut counts = PushSummary::default();
                    for classifier in &artifact.classifiers {
                        progress.message(&format!(
                            "{} ({classifier}) -> {}",
                            artifact.coordinates(),
                            target.name
                        ));
                        match manager.upload(artifact, classifier, target).await? {
                            UploadOutcome::Uploaded => counts.uploaded += 1,
                            UploadOutcome::Skipped => counts.skipped += 1,
                        }
                        progress.advance(1);
                    }
                    Ok::<_, ResolveError>(counts)
                })
                .buffer_unordered(UPLOAD_CONCURRENCY)
                .try_collect()
                .await?;
            for counts in outcomes {
                summary.uploaded += counts.uploaded;
                summary.skipped += counts.skipped;
            }
        }

        self.store.save_installed(&component)?;
        progress.finish();
        Ok((component, summary))
    }

    /// Removes a component. Local files are deleted only for artifacts
    /// no other resolved component owns; with `remote` the same
    /// artifacts are also deleted from every TARGET repository.
    pub async fn remove(&self, coordinates: &str, remote: bool) -> Result<RemoveSummary> {
        let component = self
            .store
            .find_resolved(coordinates)
            .or_else(|| self.store.find_installed(coordinates))
            .ok_or_else(|| ResolveError::UnknownComponent {
                coordinates: coordinates.to_string(),
            })?;
        let full = component.coordinates();

        let mut summary = RemoveSummary::default();
        for artifact in &component.artifacts {
            if self.store.is_shared(artifact, &full) {
                debug!(artifact = %artifact, "shared with another component, kept");
                summary.retained += 1;
                continue;
            }
            if self.artifacts.remove_local(artifact)? {
                summary.removed += 1;
            }
            if remote {
                for target in self.targets.iter().filter(|r| r.is_target()) {
                    self.artifacts.remove_remote(artifact, target).await?;
                }
            }
        }

        self.store.remove(&full)?;
        Ok(summary)
    }

    /// All known versions of a coordinate across the search
    /// repositories, newest first. A failing searcher is skipped.
    pub async fn versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>> {
        let mut versions: Vec<String> = Vec::new();
        for searcher in &self.searchers {
            match searcher.versions(group_id, artifact_id).await {
                Ok(found) => {
                    for version in found {
                        if !versions.contains(&version) {
                            versions.push(version);
                        }
                    }
                }
                Err(e) => warn!(
                    repository = %searcher.repository().name,
                    error = %e,
                    "search failed, skipping repository"
                ),
            }
        }
        versions.sort_by(|a, b| compare_versions(b, a));
        Ok(versions)
    }

    pub fn list_resolved(&self) -> Vec<Component> {
        self.store.list_resolved()
    }

    pub fn list_installed(&self) -> Vec<Component> {
        self.store.list_installed()
    }

    /// Widens seed classifier sets with whatever variants the search
    /// repositories know about.
    async fn enrich_from_searchers(&self, seeds: &mut [MvnArtifact]) {
        for seed in seeds.iter_mut() {
            for searcher in &self.searchers {
                match searcher.classifiers(seed).await {
                    Ok(found) => {
                        for classifier in found {
                            seed.add_classifier(classifier);
                        }
                    }
                    Err(e) => debug!(
                        repository = %searcher.repository().name,
                        error = %e,
                        "classifier lookup failed"
                    ),
                }
            }
        }
    }
}
