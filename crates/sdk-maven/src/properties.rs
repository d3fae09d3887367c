//! `${...}` placeholder interpolation over a POM parent chain.
//!
//! Versions and coordinates in POMs routinely reference properties
//! (`<version>${cuba.version}</version>`) that may be defined anywhere up
//! the parent chain, and property values may reference further
//! properties. Lookup walks the chain nearest-first; `project.*`, `pom.*`
//! and `parent.*` built-ins resolve against the chain itself.

use crate::pom::Pom;
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

const MAX_DEPTH: usize = 10;

/// Substitutes every `${...}` in `value` using the POM chain
/// (`chain[0]` is the POM the value came from, followed by its parents).
///
/// Returns `None` when any placeholder cannot be resolved; partially
/// substituted values are never produced.
pub fn interpolate(value: &str, chain: &[&Pom]) -> Option<String> {
    interpolate_depth(value, chain, 0)
}

fn interpolate_depth(value: &str, chain: &[&Pom], depth: usize) -> Option<String> {
    if depth >= MAX_DEPTH {
        return None;
    }
    if !value.contains("${") {
        return Some(value.to_string());
    }

    let mut result = String::with_capacity(value.len());
    let mut last_end = 0;
    for caps in PLACEHOLDER.captures_iter(value) {
        let whole = caps.get(0)?;
        let key = caps.get(1)?.as_str();
        let replacement = lookup(key, chain)?;
        // Property values may themselves contain placeholders.
        let replacement = interpolate_depth(&replacement, chain, depth + 1)?;
        result.push_str(&value[last_end..whole.start()]);
        result.push_str(&replacement);
        last_end = whole.end();
    }
    result.push_str(&value[last_end..]);
    Some(result)
}

fn lookup(key: &str, chain: &[&Pom]) -> Option<String> {
    if let Some(value) = builtin(key, chain) {
        return Some(value);
    }
    for pom in chain {
        if let Some(value) = pom.properties.get(key) {
            return Some(value.clone());
        }
    }
    None
}

fn builtin(key: &str, chain: &[&Pom]) -> Option<String> {
    let this = chain.first()?;
    let stripped = key
        .strip_prefix("project.")
        .or_else(|| key.strip_prefix("pom."))
        .unwrap_or(key);

    match stripped {
        "version" if key != "version" => this.effective_version().map(str::to_string),
        "groupId" if key != "groupId" => this.effective_group_id().map(str::to_string),
        "artifactId" if key != "artifactId" => this.artifact_id.clone(),
        "parent.version" => parent_version(this, chain),
        "parent.groupId" => this.parent.as_ref().map(|p| p.group_id.clone()),
        _ => None,
    }
}

fn parent_version(this: &Pom, chain: &[&Pom]) -> Option<String> {
    this.parent
        .as_ref()
        .map(|p| p.version.clone())
        .or_else(|| chain.get(1).and_then(|p| p.effective_version().map(str::to_string)))
}
