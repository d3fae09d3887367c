//! Subcommand implementations.

use crate::config::{self, SdkConfig, SdkHome};
use crate::progress::CliProgress;
use colored::Colorize;
use sdk_core::version::is_prerelease;
use sdk_core::{Component, ComponentKind, HttpClient, Repository};
use sdk_maven::{ArtifactManager, LocalStorage};
use sdk_resolver::{ComponentManager, MetadataStore, provider_for};
use sdk_search::{RepositorySearch, searcher_for};
use std::sync::Arc;

pub struct Context {
    pub home: SdkHome,
    pub config: SdkConfig,
}

impl Context {
    pub fn new(home: SdkHome) -> anyhow::Result<Self> {
        let config = SdkConfig::load(&home)?;
        Ok(Self { home, config })
    }

    fn component_manager(&self) -> anyhow::Result<ComponentManager> {
        let http = Arc::new(HttpClient::new());
        let artifacts = Arc::new(ArtifactManager::new(
            http.clone(),
            LocalStorage::new(self.home.storage_root()),
            self.config.sources(),
        ));
        let store = Arc::new(MetadataStore::open(self.home.store_path())?);
        let searchers: Vec<Box<dyn RepositorySearch>> = self
            .config
            .search_repositories()
            .into_iter()
            .map(|repository| searcher_for(repository, http.clone()))
            .collect();
        Ok(ComponentManager::new(
            artifacts,
            store,
            self.config.targets(),
            searchers,
        ))
    }
}

fn component_template(kind: &str, reference: &str) -> anyhow::Result<Component> {
    let kind: ComponentKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(provider_for(kind).create(reference)?)
}

pub async fn resolve(ctx: &Context, kind: &str, reference: &str) -> anyhow::Result<()> {
    let template = component_template(kind, reference)?;
    let manager = ctx.component_manager()?;
    let resolved = manager.resolve(template, &CliProgress::new()).await?;
    println!(
        "{} {} ({} artifacts)",
        "Resolved".green().bold(),
        resolved.coordinates(),
        resolved.artifacts.len()
    );
    Ok(())
}

pub async fn push(ctx: &Context, coordinates: &str, repo: Option<&str>) -> anyhow::Result<()> {
    let manager = ctx.component_manager()?;
    let (component, summary) = manager
        .push(coordinates, repo, &CliProgress::new())
        .await?;
    println!(
        "{} {}: {} uploaded, {} already present",
        "Pushed".green().bold(),
        component.coordinates(),
        summary.uploaded,
        summary.skipped
    );
    Ok(())
}

pub async fn install(
    ctx: &Context,
    kind: &str,
    reference: &str,
    repo: Option<&str>,
) -> anyhow::Result<()> {
    let template = component_template(kind, reference)?;
    let manager = ctx.component_manager()?;
    let progress = CliProgress::new();

    let resolved = manager.resolve(template, &progress).await?;
    let (component, summary) = manager
        .push(&resolved.coordinates(), repo, &progress)
        .await?;
    println!(
        "{} {}: {} artifacts, {} uploaded, {} already present",
        "Installed".green().bold(),
        component.coordinates(),
        component.artifacts.len(),
        summary.uploaded,
        summary.skipped
    );
    Ok(())
}

pub async fn remove(ctx: &Context, coordinates: &str, remote: bool) -> anyhow::Result<()> {
    let manager = ctx.component_manager()?;
    let summary = manager.remove(coordinates, remote).await?;
    println!(
        "{} {coordinates}: {} artifacts deleted, {} shared kept",
        "Removed".green().bold(),
        summary.removed,
        summary.retained
    );
    Ok(())
}

pub fn list(ctx: &Context, set: &str) -> anyhow::Result<()> {
    let manager = ctx.component_manager()?;
    let components = match set {
        "resolved" => manager.list_resolved(),
        "installed" => manager.list_installed(),
        other => anyhow::bail!("unknown set '{other}', expected 'resolved' or 'installed'"),
    };
    if components.is_empty() {
        println!("No {set} components.");
        return Ok(());
    }
    for component in components {
        println!(
            "{} {} ({} artifacts)",
            component.kind.to_string().blue(),
            component.coordinates(),
            component.artifacts.len()
        );
    }
    Ok(())
}

pub async fn versions(ctx: &Context, coordinates: &str, stable_only: bool) -> anyhow::Result<()> {
    let Some((group_id, artifact_id)) = coordinates.split_once(':') else {
        anyhow::bail!("expected group:artifact, got '{coordinates}'");
    };
    let manager = ctx.component_manager()?;
    let versions: Vec<String> = manager
        .versions(group_id, artifact_id)
        .await?
        .into_iter()
        .filter(|v| !stable_only || !is_prerelease(v))
        .collect();
    if versions.is_empty() {
        println!("No versions found for {coordinates}.");
        return Ok(());
    }
    for version in versions {
        println!("{version}");
    }
    Ok(())
}

pub fn repo_list(ctx: &Context) -> anyhow::Result<()> {
    for repository in &ctx.config.repositories {
        let targets: Vec<String> = repository
            .targets
            .iter()
            .map(|t| format!("{t:?}").to_lowercase())
            .collect();
        println!(
            "{} [{:?}] {} ({})",
            repository.name.bold(),
            repository.kind,
            repository.url,
            targets.join(", ")
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn repo_add(
    ctx: &mut Context,
    name: &str,
    url: &str,
    kind: &str,
    targets: &[String],
    username: Option<&str>,
    password: Option<&str>,
    repository_name: Option<&str>,
) -> anyhow::Result<()> {
    let mut repository = Repository::new(name, url, config::parse_kind(kind)?)
        .with_targets(&config::parse_targets(targets)?);
    if let (Some(username), Some(password)) = (username, password) {
        repository = repository.with_auth(username, password);
    }
    if let Some(inner) = repository_name {
        repository = repository.with_repository_name(inner);
    }
    ctx.config.upsert_repository(repository);
    ctx.config.save(&ctx.home)?;
    println!("{} repository '{name}'", "Added".green().bold());
    Ok(())
}

pub fn repo_remove(ctx: &mut Context, name: &str) -> anyhow::Result<()> {
    if !ctx.config.remove_repository(name) {
        anyhow::bail!("no repository named '{name}'");
    }
    ctx.config.save(&ctx.home)?;
    println!("{} repository '{name}'", "Removed".green().bold());
    Ok(())
}

pub fn clean(ctx: &Context) -> anyhow::Result<()> {
    let storage = LocalStorage::new(ctx.home.storage_root());
    let size = storage.size();
    storage.clear()?;
    println!(
        "{} local artifact storage ({} bytes freed)",
        "Cleared".green().bold(),
        size
    );
    Ok(())
}
