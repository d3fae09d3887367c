//! Maven repository layout: paths and URLs for artifacts and metadata.

use sdk_core::{Classifier, MvnArtifact, Repository};

/// Repository-relative directory for a coordinate:
/// `org/apache/commons/commons-lang3/3.14.0`.
pub fn artifact_dir(group_id: &str, artifact_id: &str, version: &str) -> String {
    format!("{}/{artifact_id}/{version}", group_id.replace('.', "/"))
}

/// Repository-relative path of one artifact variant.
pub fn file_path(artifact: &MvnArtifact, classifier: &Classifier) -> String {
    format!(
        "{}/{}",
        artifact_dir(&artifact.group_id, &artifact.artifact_id, &artifact.version),
        artifact.file_name(classifier)
    )
}

/// Full URL of one artifact variant in a repository.
pub fn file_url(repository: &Repository, artifact: &MvnArtifact, classifier: &Classifier) -> String {
    format!("{}/{}", repository.base_url(), file_path(artifact, classifier))
}

/// Full URL of the POM for a coordinate.
pub fn pom_url(repository: &Repository, artifact: &MvnArtifact) -> String {
    file_url(repository, artifact, &Classifier::pom())
}

/// Repository-relative path of the artifact-level version listing.
pub fn metadata_path(group_id: &str, artifact_id: &str) -> String {
    format!(
        "{}/{artifact_id}/maven-metadata.xml",
        group_id.replace('.', "/")
    )
}

/// Full URL of the artifact-level `maven-metadata.xml`.
pub fn metadata_url(repository: &Repository, group_id: &str, artifact_id: &str) -> String {
    format!(
        "{}/{}",
        repository.base_url(),
        metadata_path(group_id, artifact_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::RepositoryKind;

    fn central() -> Repository {
        Repository::maven_central()
    }

    #[test]
    fn test_artifact_dir_replaces_dots() {
        assert_eq!(
            artifact_dir("org.apache.commons", "commons-lang3", "3.14.0"),
            "org/apache/commons/commons-lang3/3.14.0"
        );
    }

    #[test]
    fn test_pom_url() {
        let artifact = MvnArtifact::new("org.apache.commons", "commons-lang3", "3.14.0");
        assert_eq!(
            pom_url(&central(), &artifact),
            "https://repo1.maven.org/maven2/org/apache/commons/commons-lang3/3.14.0/commons-lang3-3.14.0.pom"
        );
    }

    #[test]
    fn test_file_url_with_classifier() {
        let artifact = MvnArtifact::new("com.example", "my-lib", "1.0");
        let url = file_url(&central(), &artifact, &Classifier::sources());
        assert!(url.ends_with("my-lib/1.0/my-lib-1.0-sources.jar"));
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let repo = Repository::new(
            "nexus",
            "https://nexus.example.com/repository/maven/",
            RepositoryKind::Nexus3,
        );
        let artifact = MvnArtifact::new("com.example", "my-lib", "2.0.0");
        assert_eq!(
            file_url(&repo, &artifact, &Classifier::jar()),
            "https://nexus.example.com/repository/maven/com/example/my-lib/2.0.0/my-lib-2.0.0.jar"
        );
    }

    #[test]
    fn test_metadata_url() {
        assert_eq!(
            metadata_url(&central(), "org.apache.commons", "commons-lang3"),
            "https://repo1.maven.org/maven2/org/apache/commons/commons-lang3/maven-metadata.xml"
        );
    }
}
