use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::{Dependency, Ecosystem};

/// Scanner for Maven projects.
///
/// Parses the `<dependencies>` section of `pom.xml`; records are named by
/// their `groupId:artifactId` coordinates and deduplicated by coordinates and
/// version. Licenses are not declared per-dependency in a pom, so records
/// leave the scanner unresolved and rely on the dependency-name mapping table
/// or surface as unlisted.
pub struct MavenScanner;

impl super::Scanner for MavenScanner {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Maven
    }

    fn scan(&self, module_root: &Path) -> Vec<Dependency> {
        let pom = module_root.join("pom.xml");
        if !pom.exists() {
            tracing::debug!("no pom.xml in {} - skipping maven scan", module_root.display());
            return Vec::new();
        }

        match parse_pom_xml(&pom) {
            Ok(deps) => deps,
            Err(err) => {
                tracing::warn!("problems reading {}: {:#}", pom.display(), err);
                Vec::new()
            }
        }
    }
}

/// Parse `pom.xml` using the quick-xml event API.
fn parse_pom_xml(pom: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(pom)?;
    let mut reader = Reader::from_str(&content);
    reader.config_mut().trim_text(true);

    let source_path = pom.display().to_string();
    let mut deps = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut buf = Vec::new();

    let mut in_dependencies = false;
    let mut depth: u32 = 0;
    let mut dependencies_depth: u32 = 0;

    let mut in_dependency = false;
    let mut current_tag = String::new();
    let mut group_id = String::new();
    let mut artifact_id = String::new();
    let mut version = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                current_tag = name.clone();

                match name.as_str() {
                    "dependencies" if !in_dependency => {
                        in_dependencies = true;
                        dependencies_depth = depth;
                    }
                    "dependency" if in_dependencies => {
                        in_dependency = true;
                        group_id.clear();
                        artifact_id.clear();
                        version.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();

                if name == "dependency" && in_dependency {
                    if !artifact_id.is_empty() {
                        let coordinates = if group_id.is_empty() {
                            artifact_id.clone()
                        } else {
                            format!("{group_id}:{artifact_id}")
                        };
                        let key = format!("{coordinates}:{version}");
                        if seen.insert(key) {
                            let pinned = (!version.is_empty()).then(|| version.clone());
                            deps.push(
                                Dependency::new(coordinates, pinned, None, Ecosystem::Maven)
                                    .with_source_path(source_path.clone()),
                            );
                        }
                    }
                    in_dependency = false;
                } else if name == "dependencies" && depth == dependencies_depth {
                    in_dependencies = false;
                }

                depth = depth.saturating_sub(1);
                current_tag.clear();
            }
            Ok(Event::Text(ref e)) => {
                if in_dependency {
                    let text = e.unescape().unwrap_or_default();
                    match current_tag.as_str() {
                        "groupId" => group_id = text.to_string(),
                        "artifactId" => artifact_id = text.to_string(),
                        "version" => version = text.to_string(),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_parses_dependencies() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            r#"<?xml version="1.0"?>
<project>
  <dependencies>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>3.12.0</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();

        let deps = MavenScanner.scan(dir.path());
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "org.apache.commons:commons-lang3");
        assert_eq!(deps[0].version.as_deref(), Some("3.12.0"));
        assert!(deps[0].license.is_none());
        assert_eq!(deps[0].ecosystem, Ecosystem::Maven);
    }

    #[test]
    fn test_managed_version_left_unset() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            r#"<project>
  <dependencies>
    <dependency>
      <groupId>org.acme</groupId>
      <artifactId>widget</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();

        let deps = MavenScanner.scan(dir.path());
        assert_eq!(deps.len(), 1);
        assert!(deps[0].version.is_none());
    }

    #[test]
    fn test_duplicate_coordinates_deduplicated() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pom.xml"),
            r#"<project>
  <dependencies>
    <dependency>
      <groupId>org.acme</groupId>
      <artifactId>widget</artifactId>
      <version>1.0</version>
    </dependency>
    <dependency>
      <groupId>org.acme</groupId>
      <artifactId>widget</artifactId>
      <version>1.0</version>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();

        assert_eq!(MavenScanner.scan(dir.path()).len(), 1);
    }

    #[test]
    fn test_missing_pom_yields_empty_set() {
        let dir = tempdir().unwrap();
        assert!(MavenScanner.scan(dir.path()).is_empty());
    }
}
