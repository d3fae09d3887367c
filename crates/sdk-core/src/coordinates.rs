//! Maven coordinates and artifact classifiers.

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An artifact variant: a classifier name plus a file extension.
///
/// The main jar is `("", "jar")`, the POM `("", "pom")`, a sources jar
/// `("sources", "jar")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default)]
    pub name: String,
    pub extension: String,
}

impl Classifier {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }

    pub fn pom() -> Self {
        Self::new("", "pom")
    }

    pub fn jar() -> Self {
        Self::new("", "jar")
    }

    pub fn sources() -> Self {
        Self::new("sources", "jar")
    }

    pub fn javadoc() -> Self {
        Self::new("javadoc", "jar")
    }

    /// File name of this variant for the given artifact id and version,
    /// e.g. `commons-lang3-3.14.0-sources.jar`.
    pub fn file_name(&self, artifact_id: &str, version: &str) -> String {
        if self.name.is_empty() {
            format!("{artifact_id}-{version}.{}", self.extension)
        } else {
            format!("{artifact_id}-{version}-{}.{}", self.name, self.extension)
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.extension)
        } else {
            write!(f, "{}:{}", self.name, self.extension)
        }
    }
}

impl FromStr for Classifier {
    type Err = SdkError;

    /// Parses `"jar"` (extension only) or `"sources:jar"` (name:extension).
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(2, ':');
        let first = parts.next().unwrap_or_default();
        match parts.next() {
            Some(ext) if !ext.is_empty() && !first.is_empty() => Ok(Self::new(first, ext)),
            None if !first.is_empty() => Ok(Self::new("", first)),
            _ => Err(SdkError::InvalidCoordinates {
                coordinates: s.to_string(),
                reason: "expected 'extension' or 'classifier:extension'".into(),
            }),
        }
    }
}

/// A Maven artifact: coordinate triple plus the set of classifiers known
/// (or required) for it.
///
/// Identity is the `group:artifact:version` triple; the classifier set
/// grows as resolution discovers variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MvnArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub classifiers: BTreeSet<Classifier>,
}

impl MvnArtifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            classifiers: BTreeSet::new(),
        }
    }

    /// Parse a coordinate string.
    ///
    /// Accepted forms:
    /// - `group:artifact:version` (3 parts)
    /// - `group:artifact:version:packaging` (4 parts; packaging becomes a
    ///   classifier extension)
    pub fn parse(coordinates: &str) -> Result<Self> {
        let parts: Vec<&str> = coordinates.split(':').collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(SdkError::InvalidCoordinates {
                coordinates: coordinates.to_string(),
                reason: format!(
                    "expected 3 or 4 colon-separated parts (group:artifact:version[:packaging]), got {}",
                    parts.len()
                ),
            });
        }
        if let Some(empty_at) = parts.iter().position(|p| p.is_empty()) {
            let label = ["group_id", "artifact_id", "version", "packaging"][empty_at];
            return Err(SdkError::InvalidCoordinates {
                coordinates: coordinates.to_string(),
                reason: format!("{label} is empty"),
            });
        }

        let mut artifact = Self::new(parts[0], parts[1], parts[2]);
        if let Some(packaging) = parts.get(3) {
            artifact.classifiers.insert(Classifier::new("", *packaging));
        }
        Ok(artifact)
    }

    /// Canonical `group:artifact:version` string.
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Version-independent `group:artifact` key, used for conflict
    /// resolution during closure walks.
    pub fn unversioned_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifiers.insert(classifier);
        self
    }

    pub fn with_classifiers<I: IntoIterator<Item = Classifier>>(mut self, classifiers: I) -> Self {
        self.classifiers.extend(classifiers);
        self
    }

    /// Adds a classifier; returns false if it was already present.
    pub fn add_classifier(&mut self, classifier: Classifier) -> bool {
        self.classifiers.insert(classifier)
    }

    pub fn has_classifier(&self, classifier: &Classifier) -> bool {
        self.classifiers.contains(classifier)
    }

    /// File name of the given variant of this artifact.
    pub fn file_name(&self, classifier: &Classifier) -> String {
        classifier.file_name(&self.artifact_id, &self.version)
    }
}

impl fmt::Display for MvnArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_part() {
        let artifact = MvnArtifact::parse("org.apache.commons:commons-lang3:3.14.0").unwrap();
        assert_eq!(artifact.group_id, "org.apache.commons");
        assert_eq!(artifact.artifact_id, "commons-lang3");
        assert_eq!(artifact.version, "3.14.0");
        assert!(artifact.classifiers.is_empty());
    }

    #[test]
    fn test_parse_four_part() {
        let artifact = MvnArtifact::parse("com.haulmont.cuba:cuba-global:7.2.1:pom").unwrap();
        assert!(artifact.has_classifier(&Classifier::pom()));
    }

    #[test]
    fn test_parse_rejects_two_parts() {
        let err = MvnArtifact::parse("org.example:lib").unwrap_err();
        assert!(err.to_string().contains("expected 3 or 4"));
    }

    #[test]
    fn test_parse_rejects_five_parts() {
        assert!(MvnArtifact::parse("a:b:c:d:e").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_part() {
        let err = MvnArtifact::parse("org.example::1.0").unwrap_err();
        assert!(err.to_string().contains("artifact_id is empty"));
    }

    #[test]
    fn test_coordinates_round_trip() {
        let artifact = MvnArtifact::new("org.example", "lib", "1.0");
        assert_eq!(artifact.coordinates(), "org.example:lib:1.0");
        assert_eq!(artifact.to_string(), "org.example:lib:1.0");
        assert_eq!(artifact.unversioned_key(), "org.example:lib");
    }

    #[test]
    fn test_classifier_file_names() {
        let artifact = MvnArtifact::new("org.example", "lib", "2.3");
        assert_eq!(artifact.file_name(&Classifier::jar()), "lib-2.3.jar");
        assert_eq!(artifact.file_name(&Classifier::pom()), "lib-2.3.pom");
        assert_eq!(
            artifact.file_name(&Classifier::sources()),
            "lib-2.3-sources.jar"
        );
    }

    #[test]
    fn test_classifier_parse() {
        assert_eq!("jar".parse::<Classifier>().unwrap(), Classifier::jar());
        assert_eq!(
            "sources:jar".parse::<Classifier>().unwrap(),
            Classifier::sources()
        );
        assert_eq!(
            "client:zip".parse::<Classifier>().unwrap(),
            Classifier::new("client", "zip")
        );
        assert!("".parse::<Classifier>().is_err());
        assert!(":jar".parse::<Classifier>().is_err());
    }

    #[test]
    fn test_classifier_display() {
        assert_eq!(Classifier::jar().to_string(), "jar");
        assert_eq!(Classifier::sources().to_string(), "sources:jar");
    }

    #[test]
    fn test_add_classifier_dedup() {
        let mut artifact = MvnArtifact::new("g", "a", "1");
        assert!(artifact.add_classifier(Classifier::jar()));
        assert!(!artifact.add_classifier(Classifier::jar()));
        assert_eq!(artifact.classifiers.len(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let artifact = MvnArtifact::new("org.example", "lib", "1.0")
            .with_classifier(Classifier::jar())
            .with_classifier(Classifier::sources());
        let json = serde_json::to_string(&artifact).unwrap();
        let back: MvnArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(artifact, back);
    }
}
