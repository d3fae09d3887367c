//! Integration tests using fixture files.

use sdk_maven::{PomScope, interpolate, parse_pom};

fn load_fixture(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {name}: {e}"))
}

#[test]
fn test_fixture_framework_pom() {
    let pom = parse_pom(&load_fixture("framework_pom.xml")).unwrap();

    assert_eq!(pom.artifact_id.as_deref(), Some("cuba-global"));
    assert_eq!(pom.effective_group_id(), Some("com.haulmont.cuba"));
    assert_eq!(pom.effective_version(), Some("7.2.1"));
    assert_eq!(pom.dependencies.len(), 4);

    // Property-driven versions stay verbatim until interpolation.
    let guava = &pom.dependencies[0];
    assert_eq!(guava.version.as_deref(), Some("${guava.version}"));
    assert_eq!(
        interpolate(guava.version.as_deref().unwrap(), &[&pom]).as_deref(),
        Some("28.2-jre")
    );

    let jpa = &pom.dependencies[2];
    assert_eq!(jpa.exclusions.len(), 1);
    assert!(jpa.exclusions[0].excludes("org.eclipse.persistence", "commonj.sdo"));

    assert_eq!(pom.dependencies[3].scope, PomScope::Test);
}

#[test]
fn test_fixture_platform_bom() {
    let pom = parse_pom(&load_fixture("platform_bom.xml")).unwrap();

    assert_eq!(pom.packaging, "pom");
    assert!(pom.dependencies.is_empty());
    assert_eq!(pom.dependency_management.len(), 3);
    assert_eq!(pom.modules.len(), 2);

    // ${project.version} resolves against the BOM itself.
    let own = &pom.dependency_management[2];
    assert_eq!(
        interpolate(own.version.as_deref().unwrap(), &[&pom]).as_deref(),
        Some("7.2.1")
    );

    // ${spring.version} resolves through the properties section.
    let spring = &pom.dependency_management[0];
    assert_eq!(
        interpolate(spring.version.as_deref().unwrap(), &[&pom]).as_deref(),
        Some("5.2.5.RELEASE")
    );
}

#[test]
fn test_fixture_minimal_pom() {
    let pom = parse_pom(&load_fixture("minimal_pom.xml")).unwrap();
    assert_eq!(pom.artifact_id.as_deref(), Some("tiny"));
    assert!(pom.dependencies.is_empty());
    assert!(pom.parent.is_none());
}
