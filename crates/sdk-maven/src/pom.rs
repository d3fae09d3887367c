//! POM model and parser.
//!
//! Uses a quick-xml SAX reader with an element-path stack, collecting
//! only what closure resolution needs: project identity, the parent
//! reference, properties, dependencies, dependencyManagement, and
//! modules. Build plugins, profiles, and reporting sections are skipped.

use crate::error::{MavenError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ParentRef {
    fn is_complete(&self) -> bool {
        !self.group_id.is_empty() && !self.artifact_id.is_empty() && !self.version.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PomScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
}

impl FromStr for PomScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            _ => Self::Compile,
        })
    }
}

impl PomScope {
    /// Scopes that propagate transitively when walking a closure.
    pub fn is_transitive(&self) -> bool {
        matches!(self, Self::Compile | Self::Runtime)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    /// Whether the exclusion covers the given coordinate. `*` wildcards
    /// match any group or artifact.
    pub fn excludes(&self, group_id: &str, artifact_id: &str) -> bool {
        (self.group_id == "*" || self.group_id == group_id)
            && (self.artifact_id == "*" || self.artifact_id == artifact_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: PomScope,
    pub optional: bool,
    /// `<type>` element (e.g. "pom" for BOM imports).
    pub dep_type: Option<String>,
    pub classifier: Option<String>,
    pub exclusions: Vec<Exclusion>,
}

impl Default for PomDependency {
    fn default() -> Self {
        Self {
            group_id: String::new(),
            artifact_id: String::new(),
            version: None,
            scope: PomScope::Compile,
            optional: false,
            dep_type: None,
            classifier: None,
            exclusions: Vec::new(),
        }
    }
}

impl PomDependency {
    pub fn unversioned_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: String,
    pub parent: Option<ParentRef>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub modules: Vec<String>,
}

impl Default for Pom {
    fn default() -> Self {
        Self {
            group_id: None,
            artifact_id: None,
            version: None,
            packaging: "jar".into(),
            parent: None,
            properties: HashMap::new(),
            dependencies: Vec::new(),
            dependency_management: Vec::new(),
            modules: Vec::new(),
        }
    }
}

impl Pom {
    /// Group id, falling back to the parent's (Maven inheritance).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Version, falling back to the parent's.
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }
}

/// Sections under which `<dependencies>` is not a project dependency list.
const SKIPPED_SECTIONS: &[&str] = &["build", "plugins", "plugin", "profiles", "reporting"];

pub fn parse_pom(content: &str) -> Result<Pom> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut current_dep: Option<PomDependency> = None;
    let mut current_exclusion: Option<Exclusion> = None;

    loop {
        let event = reader.read_event().map_err(|e| MavenError::PomParse {
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                let in_skipped = path.iter().any(|t| SKIPPED_SECTIONS.contains(&t.as_str()));
                if tag == "dependency"
                    && path.last().is_some_and(|t| t == "dependencies")
                    && !in_skipped
                {
                    current_dep = Some(PomDependency::default());
                } else if tag == "exclusion" && current_dep.is_some() {
                    current_exclusion = Some(Exclusion::default());
                }
                path.push(tag);
            }
            Event::Text(ref e) => {
                let text = match e.decode() {
                    Ok(cow) => {
                        let s = cow.trim().to_string();
                        quick_xml::escape::unescape(&s)
                            .map(|c| c.into_owned())
                            .unwrap_or(s)
                    }
                    Err(_) => String::from_utf8_lossy(e.as_ref()).trim().to_string(),
                };
                if text.is_empty() {
                    continue;
                }
                collect_text(
                    &mut pom,
                    &path,
                    current_dep.as_mut(),
                    current_exclusion.as_mut(),
                    text,
                );
            }
            Event::End(_) => {
                let tag = path.pop().unwrap_or_default();
                match tag.as_str() {
                    "dependency" => {
                        if let Some(dep) = current_dep.take() {
                            if !dep.group_id.is_empty() && !dep.artifact_id.is_empty() {
                                if path.iter().any(|t| t == "dependencyManagement") {
                                    pom.dependency_management.push(dep);
                                } else {
                                    pom.dependencies.push(dep);
                                }
                            }
                        }
                    }
                    "exclusion" => {
                        if let (Some(excl), Some(dep)) =
                            (current_exclusion.take(), current_dep.as_mut())
                        {
                            if !excl.group_id.is_empty() || !excl.artifact_id.is_empty() {
                                dep.exclusions.push(excl);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // An incomplete <parent> block is as good as none.
    if pom.parent.as_ref().is_some_and(|p| !p.is_complete()) {
        pom.parent = None;
    }

    Ok(pom)
}

fn collect_text(
    pom: &mut Pom,
    path: &[String],
    current_dep: Option<&mut PomDependency>,
    current_exclusion: Option<&mut Exclusion>,
    text: String,
) {
    let p: Vec<&str> = path.iter().map(String::as_str).collect();

    match p.as_slice() {
        ["project", "groupId"] => pom.group_id = Some(text),
        ["project", "artifactId"] => pom.artifact_id = Some(text),
        ["project", "version"] => pom.version = Some(text),
        ["project", "packaging"] => pom.packaging = text,
        ["project", "parent", field] => {
            let parent = pom.parent.get_or_insert_with(|| ParentRef {
                group_id: String::new(),
                artifact_id: String::new(),
                version: String::new(),
            });
            match *field {
                "groupId" => parent.group_id = text,
                "artifactId" => parent.artifact_id = text,
                "version" => parent.version = text,
                _ => {}
            }
        }
        ["project", "properties", key] => {
            pom.properties.insert((*key).to_string(), text);
        }
        ["project", "modules", "module"] => pom.modules.push(text),
        _ => {
            let Some(dep) = current_dep else { return };
            if let Some(excl) = current_exclusion {
                match p.last() {
                    Some(&"groupId") => excl.group_id = text,
                    Some(&"artifactId") => excl.artifact_id = text,
                    _ => {}
                }
                return;
            }
            // Only direct children of <dependency> are fields.
            if p.len() >= 2 && p[p.len() - 2] == "dependency" {
                match p.last() {
                    Some(&"groupId") => dep.group_id = text,
                    Some(&"artifactId") => dep.artifact_id = text,
                    Some(&"version") => dep.version = Some(text),
                    Some(&"scope") => dep.scope = text.parse().unwrap_or_default(),
                    Some(&"optional") => dep.optional = text == "true",
                    Some(&"type") => dep.dep_type = Some(text),
                    Some(&"classifier") => dep.classifier = Some(text),
                    _ => {}
                }
            }
        }
    }
}
