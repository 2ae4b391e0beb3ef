use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::models::{Dependency, Ecosystem};

/// Scanner for Swift Package Manager projects.
///
/// Parses `Package.resolved` in both historical layouts: version 1 nests the
/// pin list under `object.pins` with a `package` name field, version 2+ lists
/// `pins` at the top level keyed by `identity`. The pinfile carries no
/// license declarations, so records leave the scanner unresolved.
pub struct SwiftScanner;

impl super::Scanner for SwiftScanner {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Swift
    }

    fn scan(&self, module_root: &Path) -> Vec<Dependency> {
        let pinfile = module_root.join("Package.resolved");
        if !pinfile.exists() {
            tracing::debug!(
                "no Package.resolved in {} - skipping swift scan",
                module_root.display()
            );
            return Vec::new();
        }

        match parse_package_resolved(&pinfile) {
            Ok(deps) => deps,
            Err(err) => {
                tracing::warn!("problems reading {}: {:#}", pinfile.display(), err);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinFile {
    object: Option<PinObject>,
    #[serde(default)]
    pins: Vec<Pin>,
}

#[derive(Debug, Deserialize)]
struct PinObject {
    #[serde(default)]
    pins: Vec<Pin>,
}

#[derive(Debug, Deserialize)]
struct Pin {
    // v1 name field
    package: Option<String>,
    // v2+ name field
    identity: Option<String>,
    state: Option<PinState>,
}

#[derive(Debug, Deserialize)]
struct PinState {
    version: Option<String>,
}

fn parse_package_resolved(pinfile: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(pinfile)?;
    let parsed: PinFile = serde_json::from_str(&content)?;
    let source_path = pinfile.display().to_string();

    let pins = match &parsed.object {
        Some(object) => &object.pins,
        None => &parsed.pins,
    };

    let mut deps = Vec::new();
    for pin in pins {
        let Some(name) = pin.package.as_deref().or(pin.identity.as_deref()) else {
            continue;
        };
        let version = pin.state.as_ref().and_then(|s| s.version.clone());
        deps.push(
            Dependency::new(name, version, None, Ecosystem::Swift)
                .with_source_path(source_path.clone()),
        );
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
    fn test_scan_v1_pinfile() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Package.resolved"),
            r#"{
  "object": {
    "pins": [
      {
        "package": "Alamofire",
        "repositoryURL": "https://github.com/Alamofire/Alamofire.git",
        "state": {"branch": null, "revision": "abc", "version": "5.6.4"}
      }
    ]
  },
  "version": 1
}"#,
        )
        .unwrap();

        let deps = SwiftScanner.scan(dir.path());
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "Alamofire");
        assert_eq!(deps[0].version.as_deref(), Some("5.6.4"));
        assert!(deps[0].license.is_none());
        assert_eq!(deps[0].ecosystem, Ecosystem::Swift);
    }

    #[test]
    fn test_scan_v2_pinfile() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Package.resolved"),
            r#"{
  "pins": [
    {
      "identity": "swift-argument-parser",
      "kind": "remoteSourceControl",
      "location": "https://github.com/apple/swift-argument-parser.git",
      "state": {"revision": "def", "version": "1.2.3"}
    }
  ],
  "version": 2
}"#,
        )
        .unwrap();

        let deps = SwiftScanner.scan(dir.path());
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "swift-argument-parser");
        assert_eq!(deps[0].version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_branch_pin_has_no_version() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Package.resolved"),
            r#"{"pins": [{"identity": "nightly-lib", "state": {"branch": "main", "revision": "fff"}}], "version": 2}"#,
        )
        .unwrap();

        let deps = SwiftScanner.scan(dir.path());
        assert_eq!(deps.len(), 1);
        assert!(deps[0].version.is_none());
    }

    #[test]
    fn test_missing_pinfile_yields_empty_set() {
        let dir = tempdir().unwrap();
        assert!(SwiftScanner.scan(dir.path()).is_empty());
    }

    #[test]
    fn test_malformed_pinfile_yields_empty_set() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Package.resolved"), "]").unwrap();
        assert!(SwiftScanner.scan(dir.path()).is_empty());
    }
}
