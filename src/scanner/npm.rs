use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::models::{Dependency, Ecosystem};

/// Scanner for npm projects.
///
/// Reads the declared `dependencies` from `package.json`, then resolves each
/// entry's installed `node_modules/<name>/package.json` for the pinned
/// version and the license declaration. Entries not installed locally keep
/// the declared version range and no license.
pub struct NpmScanner;

impl super::Scanner for NpmScanner {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn scan(&self, module_root: &Path) -> Vec<Dependency> {
        let manifest = module_root.join("package.json");
        if !manifest.exists() {
            tracing::debug!(
                "no package.json in {} - skipping npm scan",
                module_root.display()
            );
            return Vec::new();
        }

        match parse_package_json(&manifest, module_root) {
            Ok(deps) => deps,
            Err(err) => {
                tracing::warn!("problems reading {}: {:#}", manifest.display(), err);
                Vec::new()
            }
        }
    }
}

fn parse_package_json(manifest: &Path, module_root: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(manifest)?;
    let json: Value = serde_json::from_str(&content)?;
    let mut deps = Vec::new();

    let Some(declared) = json.get("dependencies").and_then(|v| v.as_object()) else {
        return Ok(deps);
    };

    for (name, range) in declared {
        let installed = module_root
            .join("node_modules")
            .join(name)
            .join("package.json");

        let (version, license) = match read_installed_metadata(&installed) {
            Some((version, license)) => (version, license),
            None => {
                tracing::debug!("dependency {} not installed under node_modules", name);
                (range.as_str().map(str::to_string), None)
            }
        };

        deps.push(
            Dependency::new(name.clone(), version, license, Ecosystem::Npm)
                .with_source_path(manifest.display().to_string()),
        );
    }

    Ok(deps)
}

fn read_installed_metadata(path: &Path) -> Option<(Option<String>, Option<String>)> {
    let content = std::fs::read_to_string(path).ok()?;
    let json: Value = serde_json::from_str(&content).ok()?;
    let version = json
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Some((version, license_of(&json)))
}

/// Extract the license declaration from a package.json document.
///
/// Handles the modern string form, the object form `{"type": ...}`, and the
/// legacy `licenses` array of objects.
fn license_of(json: &Value) -> Option<String> {
    match json.get("license") {
        Some(Value::String(s)) => return Some(s.clone()),
        Some(Value::Object(obj)) => {
            if let Some(t) = obj.get("type").and_then(|v| v.as_str()) {
                return Some(t.to_string());
            }
        }
        _ => {}
    }

    json.get("licenses")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|entry| entry.get("type"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
