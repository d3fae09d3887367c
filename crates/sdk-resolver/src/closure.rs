//! Dependency-closure resolution.
//!
//! Walks the Maven graph from a set of seed coordinates: every POM is
//! fetched and parsed, parent chains are followed, `${...}` placeholders
//! interpolated, versionless dependencies filled from the nearest
//! `dependencyManagement` entry (BOM imports included), exclusions
//! honored, and coordinate conflicts settled newest-wins. The walk
//! terminates on cycles via the in-progress path.

use crate::error::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use sdk_core::version::compare_versions;
use sdk_core::{Classifier, MvnArtifact, Progress};
use sdk_maven::{ArtifactManager, Exclusion, Pom, PomScope, interpolate};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

const MAX_PARENT_DEPTH: usize = 16;
const MAX_BOM_DEPTH: usize = 4;

/// Outcome of a closure walk.
pub struct Closure {
    /// Every coordinate the seeds pull in, dependencies before their
    /// dependents, each carrying the classifiers to fetch.
    pub artifacts: Vec<MvnArtifact>,
    /// Coordinates that could not be resolved (POM absent, or a
    /// placeholder that never resolves). The walk continues without
    /// them.
    pub missing: Vec<String>,
}

/// Resolves the full dependency closure of `seeds`.
///
/// `transitive_classifiers` is the variant set wanted for every
/// transitive dependency (seeds carry their own sets); the POM variant
/// is always included.
pub async fn resolve_closure(
    manager: &ArtifactManager,
    seeds: Vec<MvnArtifact>,
    transitive_classifiers: &[Classifier],
    progress: &dyn Progress,
) -> Result<Closure> {
    let defaults = if transitive_classifiers.is_empty() {
        vec![Classifier::pom(), Classifier::jar()]
    } else {
        transitive_classifiers.to_vec()
    };

    let mut walker = Walker {
        manager,
        default_classifiers: defaults,
        progress,
        resolved: Vec::new(),
        index: HashMap::new(),
        in_progress: Vec::new(),
        walked: HashSet::new(),
        missing: Vec::new(),
    };

    for seed in seeds {
        walker.resolve_node(seed, Vec::new()).await?;
    }

    walker.missing.sort();
    walker.missing.dedup();
    Ok(Closure {
        artifacts: walker.resolved,
        missing: walker.missing,
    })
}

struct Walker<'a> {
    manager: &'a ArtifactManager,
    default_classifiers: Vec<Classifier>,
    progress: &'a dyn Progress,
    resolved: Vec<MvnArtifact>,
    /// `group:artifact` -> position in `resolved`.
    index: HashMap<String, usize>,
    /// `group:artifact` keys on the current walk path (cycle guard).
    in_progress: Vec<String>,
    /// Coordinates whose dependencies have been walked.
    walked: HashSet<String>,
    missing: Vec<String>,
}

impl Walker<'_> {
    fn resolve_node<'s>(
        &'s mut self,
        artifact: MvnArtifact,
        exclusions: Vec<Exclusion>,
    ) -> BoxFuture<'s, Result<()>> {
        async move {
            let key = artifact.unversioned_key();

            if self.in_progress.contains(&key) {
                debug!(artifact = %artifact, "dependency cycle, stopping walk");
                return Ok(());
            }

            // Coordinate conflicts settle newest-wins before any fetch.
            if let Some(&i) = self.index.get(&key) {
                match compare_versions(&self.resolved[i].version, &artifact.version) {
                    Ordering::Greater => {
                        return Ok(());
                    }
                    Ordering::Equal => {
                        let wanted: Vec<Classifier> =
                            artifact.classifiers.iter().cloned().collect();
                        for classifier in wanted {
                            self.resolved[i].add_classifier(classifier);
                        }
                        // Same version already walked: nothing new below it.
                        if self.walked.contains(&artifact.coordinates()) {
                            return Ok(());
                        }
                    }
                    Ordering::Less => {
                        // The newer version takes the slot and gets walked.
                        let merged: BTreeSet<Classifier> = self.resolved[i]
                            .classifiers
                            .union(&artifact.classifiers)
                            .cloned()
                            .collect();
                        self.resolved[i].version = artifact.version.clone();
                        self.resolved[i].classifiers = merged;
                    }
                }
            }

            self.progress.message(&artifact.coordinates());
            let Some(ctx) = load_context(self.manager, &artifact).await? else {
                warn!(artifact = %artifact, "POM not found in any source, skipping");
                self.missing.push(artifact.coordinates());
                return Ok(());
            };
            self.missing.extend(ctx.unresolved);

            self.in_progress.push(key);

            // Parent and imported BOM POMs belong to the closure.
            for pom_artifact in ctx.pom_artifacts {
                self.upsert(pom_artifact);
            }

            for dep in ctx.deps {
                if dep.optional || !dep.scope.is_transitive() {
                    continue;
                }
                if exclusions
                    .iter()
                    .any(|e| e.excludes(&dep.group_id, &dep.artifact_id))
                {
                    debug!(dependency = %dep.key, "excluded");
                    continue;
                }

                let version = dep
                    .version
                    .clone()
                    .or_else(|| ctx.managed.get(&dep.key).cloned());
                let Some(version) = version else {
                    self.missing.push(format!("{} (no version)", dep.key));
                    continue;
                };

                let mut child = MvnArtifact::new(&dep.group_id, &dep.artifact_id, version);
                if dep.dep_type.as_deref() == Some("pom") {
                    child.add_classifier(Classifier::pom());
                } else {
                    for classifier in &self.default_classifiers {
                        child.add_classifier(classifier.clone());
                    }
                    child.add_classifier(Classifier::pom());
                    if let Some(ref name) = dep.classifier {
                        child.add_classifier(Classifier::new(
                            name.clone(),
                            dep.dep_type.clone().unwrap_or_else(|| "jar".into()),
                        ));
                    }
                }

                let mut child_exclusions = exclusions.clone();
                child_exclusions.extend(dep.exclusions);
                self.resolve_node(child, child_exclusions).await?;
            }

            self.in_progress.pop();
            self.walked.insert(artifact.coordinates());
            self.finish_node(artifact, &ctx.packaging);
            self.progress.advance(1);
            Ok(())
        }
        .boxed()
    }

    /// Registers a fully walked node, normalizing its classifier set to
    /// the POM's packaging.
    fn finish_node(&mut self, mut artifact: MvnArtifact, packaging: &str) {
        if packaging == "pom" {
            artifact.classifiers = BTreeSet::from([Classifier::pom()]);
        } else {
            artifact.add_classifier(Classifier::pom());
            if artifact.classifiers.len() == 1 {
                artifact.add_classifier(Classifier::new("", extension_for_packaging(packaging)));
            }
        }
        self.upsert(artifact);
    }

    fn upsert(&mut self, artifact: MvnArtifact) {
        match self.index.get(&artifact.unversioned_key()) {
            Some(&i) => {
                let node = &mut self.resolved[i];
                node.version = artifact.version;
                for classifier in artifact.classifiers {
                    node.classifiers.insert(classifier);
                }
            }
            None => {
                self.index
                    .insert(artifact.unversioned_key(), self.resolved.len());
                self.resolved.push(artifact);
            }
        }
    }
}

/// File extension produced by a packaging type.
fn extension_for_packaging(packaging: &str) -> &str {
    match packaging {
        "bundle" | "maven-plugin" | "ejb" => "jar",
        other => other,
    }
}

/// Everything the walker needs to know about one POM: its effective
/// parent chain, managed versions (BOM imports expanded), interpolated
/// direct dependencies, and the extra POM-only artifacts discovered.
struct PomContext {
    packaging: String,
    pom_artifacts: Vec<MvnArtifact>,
    managed: HashMap<String, String>,
    deps: Vec<DirectDep>,
    unresolved: Vec<String>,
}

struct DirectDep {
    group_id: String,
    artifact_id: String,
    /// `group:artifact`
    key: String,
    version: Option<String>,
    scope: PomScope,
    optional: bool,
    classifier: Option<String>,
    dep_type: Option<String>,
    exclusions: Vec<Exclusion>,
}

/// Fetches a POM and its parent chain. Parent coordinates are appended
/// to `pom_artifacts`; a missing parent truncates the chain with a
/// warning.
async fn load_chain(
    manager: &ArtifactManager,
    artifact: &MvnArtifact,
    pom_artifacts: &mut Vec<MvnArtifact>,
) -> Result<Option<Vec<Pom>>> {
    let Some(pom) = manager.resolve_pom(artifact).await? else {
        return Ok(None);
    };
    let mut chain = vec![pom];

    while chain.len() < MAX_PARENT_DEPTH {
        let Some(parent_ref) = chain.last().and_then(|p| p.parent.clone()) else {
            break;
        };
        let parent_artifact = MvnArtifact::new(
            &parent_ref.group_id,
            &parent_ref.artifact_id,
            &parent_ref.version,
        )
        .with_classifier(Classifier::pom());

        match manager.resolve_pom(&parent_artifact).await? {
            Some(parent_pom) => {
                pom_artifacts.push(parent_artifact);
                chain.push(parent_pom);
            }
            None => {
                warn!(parent = %parent_artifact, "parent POM not found, chain truncated");
                break;
            }
        }
    }
    Ok(Some(chain))
}

async fn load_context(
    manager: &ArtifactManager,
    artifact: &MvnArtifact,
) -> Result<Option<PomContext>> {
    let mut pom_artifacts = Vec::new();
    let Some(chain) = load_chain(manager, artifact, &mut pom_artifacts).await? else {
        return Ok(None);
    };

    let mut managed = HashMap::new();
    let mut unresolved = Vec::new();
    let mut bom_queue: Vec<(MvnArtifact, usize)> = Vec::new();
    collect_managed(&chain, &mut managed, &mut bom_queue, &mut unresolved, 0);

    // Expand imported BOMs, depth-bounded; entries already managed keep
    // their nearer definition.
    let mut seen_boms: HashSet<String> = HashSet::new();
    while let Some((bom, depth)) = bom_queue.pop() {
        if depth >= MAX_BOM_DEPTH || !seen_boms.insert(bom.coordinates()) {
            continue;
        }
        let Some(bom_chain) = load_chain(manager, &bom, &mut pom_artifacts).await? else {
            unresolved.push(bom.coordinates());
            continue;
        };
        pom_artifacts.push(bom.clone());
        collect_managed(
            &bom_chain,
            &mut managed,
            &mut bom_queue,
            &mut unresolved,
            depth + 1,
        );
    }

    let deps = collect_direct_deps(&chain, &mut unresolved);
    Ok(Some(PomContext {
        packaging: chain[0].packaging.clone(),
        pom_artifacts,
        managed,
        deps,
        unresolved,
    }))
}

fn collect_managed(
    chain: &[Pom],
    managed: &mut HashMap<String, String>,
    bom_queue: &mut Vec<(MvnArtifact, usize)>,
    unresolved: &mut Vec<String>,
    depth: usize,
) {
    for i in 0..chain.len() {
        let refs: Vec<&Pom> = chain[i..].iter().collect();
        for dep in &chain[i].dependency_management {
            let Some(group) = interpolate(&dep.group_id, &refs) else {
                unresolved.push(dep.unversioned_key());
                continue;
            };
            let Some(artifact) = interpolate(&dep.artifact_id, &refs) else {
                unresolved.push(dep.unversioned_key());
                continue;
            };
            let version = dep.version.as_deref().and_then(|v| interpolate(v, &refs));

            if dep.scope == PomScope::Import && dep.dep_type.as_deref() == Some("pom") {
                match version {
                    Some(v) => bom_queue.push((
                        MvnArtifact::new(group, artifact, v).with_classifier(Classifier::pom()),
                        depth,
                    )),
                    None => unresolved.push(format!("{group}:{artifact} (BOM without version)")),
                }
                continue;
            }

            if let Some(version) = version {
                managed.entry(format!("{group}:{artifact}")).or_insert(version);
            }
        }
    }
}

/// Direct dependencies of the effective POM: the POM's own plus those
/// inherited from parents, nearest declaration winning, all coordinates
/// interpolated.
fn collect_direct_deps(chain: &[Pom], unresolved: &mut Vec<String>) -> Vec<DirectDep> {
    let mut deps: Vec<DirectDep> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for i in 0..chain.len() {
        let refs: Vec<&Pom> = chain[i..].iter().collect();
        for dep in &chain[i].dependencies {
            let Some(group) = interpolate(&dep.group_id, &refs) else {
                unresolved.push(dep.unversioned_key());
                continue;
            };
            let Some(artifact) = interpolate(&dep.artifact_id, &refs) else {
                unresolved.push(dep.unversioned_key());
                continue;
            };
            let key = format!("{group}:{artifact}");
            if !seen.insert(key.clone()) {
                continue;
            }

            let version = match &dep.version {
                Some(raw) => match interpolate(raw, &refs) {
                    Some(v) => Some(v),
                    None => {
                        unresolved.push(format!("{key} (unresolved {raw})"));
                        continue;
                    }
                },
                None => None,
            };

            deps.push(DirectDep {
                group_id: group,
                artifact_id: artifact,
                key,
                version,
                scope: dep.scope.clone(),
                optional: dep.optional,
                classifier: dep.classifier.clone(),
                dep_type: dep.dep_type.clone(),
                exclusions: dep.exclusions.clone(),
            });
        }
    }
    deps
}
