//! Component model: frameworks, add-ons, and plain libraries.

use crate::coordinates::{Classifier, MvnArtifact};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Framework,
    Addon,
    Library,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Framework => "framework",
            Self::Addon => "addon",
            Self::Library => "library",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "framework" => Ok(Self::Framework),
            "addon" | "add-on" => Ok(Self::Addon),
            "library" | "lib" => Ok(Self::Library),
            other => Err(format!("unknown component kind '{other}'")),
        }
    }
}

/// A logical unit the sdk resolves and republishes: a framework release,
/// an add-on, or a single library.
///
/// Created from a provider template with `components` (modules) and
/// `classifiers` (the variants wanted for every artifact) filled in.
/// Resolution flattens the full dependency closure into `artifacts` on
/// the root component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Variants to fetch for every artifact in the closure.
    #[serde(default)]
    pub classifiers: Vec<Classifier>,
    /// Sub-components (framework/add-on modules).
    #[serde(default)]
    pub components: Vec<Component>,
    /// Resolved dependency closure, filled in by resolution.
    #[serde(default)]
    pub artifacts: Vec<MvnArtifact>,
}

impl Component {
    pub fn new(
        kind: ComponentKind,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifiers: Vec::new(),
            components: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_classifiers(mut self, classifiers: Vec<Classifier>) -> Self {
        self.classifiers = classifiers;
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Whether this component answers to the given coordinates.
    ///
    /// Accepts `group:artifact:version` and `group:artifact` (any version).
    pub fn matches(&self, coordinates: &str) -> bool {
        let parts: Vec<&str> = coordinates.split(':').collect();
        match parts.as_slice() {
            [g, a] => self.group_id == *g && self.artifact_id == *a,
            [g, a, v] => self.group_id == *g && self.artifact_id == *a && self.version == *v,
            _ => false,
        }
    }

    /// The artifacts named directly by the template: the root coordinate
    /// plus one per sub-component, each carrying the default classifier
    /// set.
    pub fn template_artifacts(&self) -> Vec<MvnArtifact> {
        let mut seeds = Vec::with_capacity(1 + self.components.len());
        seeds.push(
            MvnArtifact::new(&self.group_id, &self.artifact_id, &self.version)
                .with_classifiers(self.classifiers.iter().cloned()),
        );
        for module in &self.components {
            let classifiers = if module.classifiers.is_empty() {
                &self.classifiers
            } else {
                &module.classifiers
            };
            seeds.push(
                MvnArtifact::new(&module.group_id, &module.artifact_id, &module.version)
                    .with_classifiers(classifiers.iter().cloned()),
            );
        }
        seeds
    }

    pub fn is_resolved(&self) -> bool {
        !self.artifacts.is_empty()
    }

    /// Whether any resolved artifact of this component has the given
    /// coordinates.
    pub fn owns_artifact(&self, artifact: &MvnArtifact) -> bool {
        self.artifacts.iter().any(|a| {
            a.group_id == artifact.group_id
                && a.artifact_id == artifact.artifact_id
                && a.version == artifact.version
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.coordinates())
    }
}
