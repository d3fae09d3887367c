//! `maven-metadata.xml` parsing (artifact-level version listings).

use crate::error::{MavenError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub latest: Option<String>,
    pub release: Option<String>,
    pub versions: Vec<String>,
}

pub fn parse_metadata(content: &str) -> Result<RepositoryMetadata> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut metadata = RepositoryMetadata::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| MavenError::MetadataParse {
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
            }
            Event::Text(ref e) => {
                let text = e
                    .decode()
                    .map(|c| c.trim().to_string())
                    .unwrap_or_default();
                if text.is_empty() {
                    continue;
                }
                let p: Vec<&str> = path.iter().map(String::as_str).collect();
                match p.as_slice() {
                    ["metadata", "groupId"] => metadata.group_id = Some(text),
                    ["metadata", "artifactId"] => metadata.artifact_id = Some(text),
                    ["metadata", "versioning", "latest"] => metadata.latest = Some(text),
                    ["metadata", "versioning", "release"] => metadata.release = Some(text),
                    ["metadata", "versioning", "versions", "version"] => {
                        metadata.versions.push(text);
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(metadata)
}
