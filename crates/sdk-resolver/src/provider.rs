//! Component providers: templates that expand a name and version into a
//! component tree ready for resolution.

use crate::error::{ResolveError, Result};
use sdk_core::{Classifier, Component, ComponentKind, MvnArtifact};

/// Builds component templates for one kind of component.
pub trait ComponentProvider: Send + Sync {
    fn kind(&self) -> ComponentKind;

    /// Expands a component reference into a template.
    ///
    /// Frameworks accept a bare version (the descriptor supplies the
    /// coordinates); add-ons and libraries take full
    /// `group:artifact:version` references.
    fn create(&self, reference: &str) -> Result<Component>;
}

/// Static description of a framework release layout: one umbrella
/// coordinate plus a module artifact per entry.
#[derive(Debug, Clone)]
pub struct FrameworkDescriptor {
    pub group_id: String,
    pub base_artifact: String,
    pub modules: Vec<String>,
    pub classifiers: Vec<Classifier>,
}

impl FrameworkDescriptor {
    /// The CUBA platform layout.
    pub fn cuba() -> Self {
        Self {
            group_id: "com.haulmont.cuba".into(),
            base_artifact: "cuba".into(),
            modules: [
                "cuba-global",
                "cuba-core",
                "cuba-client",
                "cuba-gui",
                "cuba-web",
                "cuba-rest-api",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            classifiers: vec![Classifier::pom(), Classifier::jar(), Classifier::sources()],
        }
    }
}

pub struct FrameworkProvider {
    descriptor: FrameworkDescriptor,
}

impl FrameworkProvider {
    pub fn new(descriptor: FrameworkDescriptor) -> Self {
        Self { descriptor }
    }
}

impl ComponentProvider for FrameworkProvider {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Framework
    }

    fn create(&self, reference: &str) -> Result<Component> {
        // Either "7.2.1" or "com.haulmont.cuba:cuba:7.2.1".
        let version = match reference.rsplit_once(':') {
            Some((prefix, version)) => {
                let expected = format!(
                    "{}:{}",
                    self.descriptor.group_id, self.descriptor.base_artifact
                );
                if prefix != expected {
                    return Err(ResolveError::InvalidReference {
                        input: reference.to_string(),
                        reason: format!("framework coordinates must start with '{expected}'"),
                    });
                }
                version
            }
            None => reference,
        };
        if version.is_empty() {
            return Err(ResolveError::InvalidReference {
                input: reference.to_string(),
                reason: "empty version".into(),
            });
        }

        let mut component = Component::new(
            ComponentKind::Framework,
            &self.descriptor.group_id,
            &self.descriptor.base_artifact,
            version,
        )
        .with_classifiers(self.descriptor.classifiers.clone());
        for module in &self.descriptor.modules {
            component = component.with_component(Component::new(
                ComponentKind::Framework,
                &self.descriptor.group_id,
                module,
                version,
            ));
        }
        Ok(component)
    }
}

/// Add-ons are addressed by full coordinates; the default classifier set
/// matches what add-on marketplaces publish.
pub struct AddonProvider;

impl ComponentProvider for AddonProvider {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Addon
    }

    fn create(&self, reference: &str) -> Result<Component> {
        let artifact = parse_reference(reference)?;
        Ok(Component::new(
            ComponentKind::Addon,
            artifact.group_id,
            artifact.artifact_id,
            artifact.version,
        )
        .with_classifiers(vec![
            Classifier::pom(),
            Classifier::jar(),
            Classifier::sources(),
        ]))
    }
}

/// Plain `group:artifact:version` passthrough.
pub struct LibraryProvider;

impl ComponentProvider for LibraryProvider {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Library
    }

    fn create(&self, reference: &str) -> Result<Component> {
        let artifact = parse_reference(reference)?;
        let classifiers = if artifact.classifiers.is_empty() {
            vec![Classifier::pom(), Classifier::jar()]
        } else {
            let mut classifiers: Vec<Classifier> = artifact.classifiers.into_iter().collect();
            if !classifiers.contains(&Classifier::pom()) {
                classifiers.insert(0, Classifier::pom());
            }
            classifiers
        };
        Ok(Component::new(
            ComponentKind::Library,
            artifact.group_id,
            artifact.artifact_id,
            artifact.version,
        )
        .with_classifiers(classifiers))
    }
}

fn parse_reference(reference: &str) -> Result<MvnArtifact> {
    MvnArtifact::parse(reference).map_err(|e| ResolveError::InvalidReference {
        input: reference.to_string(),
        reason: e.to_string(),
    })
}

/// The provider for a component kind, with the stock framework
/// descriptor.
pub fn provider_for(kind: ComponentKind) -> Box<dyn ComponentProvider> {
    match kind {
        ComponentKind::Framework => Box::new(FrameworkProvider::new(FrameworkDescriptor::cuba())),
        ComponentKind::Addon => Box::new(AddonProvider),
        ComponentKind::Library => Box::new(LibraryProvider),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_from_bare_version() {
        let provider = FrameworkProvider::new(FrameworkDescriptor::cuba());
        let component = provider.create("7.2.1").unwrap();
        assert_eq!(component.coordinates(), "com.haulmont.cuba:cuba:7.2.1");
        assert_eq!(component.components.len(), 6);
        assert!(
            component
                .components
                .iter()
                .all(|m| m.version == "7.2.1" && m.group_id == "com.haulmont.cuba")
        );
        assert!(component.classifiers.contains(&Classifier::sources()));
    }

    #[test]
    fn test_framework_from_full_coordinates() {
        let provider = FrameworkProvider::new(FrameworkDescriptor::cuba());
        let component = provider.create("com.haulmont.cuba:cuba:7.2.1").unwrap();
        assert_eq!(component.version, "7.2.1");
    }

    #[test]
    fn test_framework_rejects_foreign_coordinates() {
        let provider = FrameworkProvider::new(FrameworkDescriptor::cuba());
        assert!(matches!(
            provider.create("org.other:thing:1.0"),
            Err(ResolveError::InvalidReference { .. })
        ));
        assert!(provider.create("").is_err());
    }

    #[test]
    fn test_addon_provider() {
        let component = AddonProvider
            .create("com.haulmont.addon.helium:helium:1.1.0")
            .unwrap();
        assert_eq!(component.kind, ComponentKind::Addon);
        assert_eq!(component.classifiers.len(), 3);
        assert!(component.components.is_empty());
    }

    #[test]
    fn test_addon_rejects_partial_reference() {
        assert!(AddonProvider.create("helium:1.1.0").is_err());
    }

    #[test]
    fn test_library_provider_defaults() {
        let component = LibraryProvider
            .create("org.apache.commons:commons-lang3:3.14.0")
            .unwrap();
        assert_eq!(component.kind, ComponentKind::Library);
        assert_eq!(
            component.classifiers,
            vec![Classifier::pom(), Classifier::jar()]
        );
    }

    #[test]
    fn test_library_provider_with_packaging() {
        let component = LibraryProvider
            .create("org.webjars:jquery:3.6.0:zip")
            .unwrap();
        assert_eq!(
            component.classifiers,
            vec![Classifier::pom(), Classifier::new("", "zip")]
        );
    }

    #[test]
    fn test_provider_for_dispatch() {
        assert_eq!(
            provider_for(ComponentKind::Framework).kind(),
            ComponentKind::Framework
        );
        assert_eq!(provider_for(ComponentKind::Addon).kind(), ComponentKind::Addon);
        assert_eq!(
            provider_for(ComponentKind::Library).kind(),
            ComponentKind::Library
        );
    }
}
