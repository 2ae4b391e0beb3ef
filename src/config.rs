use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::License;
use crate::normalize::PatternTable;

/// Root configuration structure, deserialized from `.license-gate/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Master switch: when false the run exits without scanning anything.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// The allow-list: canonical licenses and whether each is permitted.
    #[serde(default)]
    pub licenses: Vec<LicenseEntry>,
    /// Ordered license-string mappings (pattern → canonical id); first match
    /// wins, so order in the file is significant.
    #[serde(default)]
    pub license_mappings: Vec<MappingEntry>,
    /// Ordered dependency-name mappings for artifacts whose metadata never
    /// declares a license.
    #[serde(default)]
    pub dependency_mappings: Vec<MappingEntry>,
}

fn default_enabled() -> bool {
    true
}

/// One allow-list row.
#[derive(Debug, Deserialize)]
pub struct LicenseEntry {
    /// License short name, e.g. `"Apache-2.0"`.
    pub id: String,
    /// Human-facing canonical name; defaults to `id`.
    #[serde(default)]
    pub name: Option<String>,
    pub allowed: bool,
}

/// One pattern row of either mapping table.
#[derive(Debug, Deserialize)]
pub struct MappingEntry {
    pub pattern: String,
    pub license: String,
}

impl Config {
    /// The policy list consumed by the validation engine.
    pub fn policy(&self) -> Vec<License> {
        self.licenses
            .iter()
            .map(|entry| {
                License::new(
                    entry.id.clone(),
                    entry.name.clone().unwrap_or_else(|| entry.id.clone()),
                    entry.allowed,
                )
            })
            .collect()
    }

    /// Compiled license-string mapping table. Fails on a malformed pattern.
    pub fn license_table(&self) -> Result<PatternTable> {
        PatternTable::new(
            self.license_mappings
                .iter()
                .map(|m| (m.pattern.as_str(), m.license.as_str())),
        )
        .context("invalid license_mappings configuration")
    }

    /// Compiled dependency-name mapping table. Fails on a malformed pattern.
    pub fn dependency_table(&self) -> Result<PatternTable> {
        PatternTable::new(
            self.dependency_mappings
                .iter()
                .map(|m| (m.pattern.as_str(), m.license.as_str())),
        )
        .context("invalid dependency_mappings configuration")
    }
}

impl Default for Config {
    /// Built-in default policy used when no config file is found.
    ///
    /// The usual permissive licenses are allowed, copyleft ones are not, and
    /// the mapping table folds their most common long-form spellings into
    /// canonical ids.
    fn default() -> Self {
        let licenses = [
            ("Apache-1.1", "Apache Software License 1.1", true),
            ("Apache-2.0", "Apache Software License 2.0", true),
            ("BSD-2-Clause", "BSD 2-Clause License", true),
            ("BSD-3-Clause", "BSD 3-Clause License", true),
            ("CDDL-1.0", "Common Development and Distribution License 1.0", true),
            ("EPL-1.0", "Eclipse Public License 1.0", true),
            ("ISC", "ISC License", true),
            ("LGPL-2.1", "GNU Lesser General Public License 2.1", true),
            ("LGPL-3.0", "GNU Lesser General Public License 3.0", true),
            ("MIT", "MIT License", true),
            ("MPL-2.0", "Mozilla Public License 2.0", true),
            ("GPL-2.0", "GNU General Public License 2.0", false),
            ("GPL-3.0", "GNU General Public License 3.0", false),
            ("AGPL-3.0", "GNU Affero General Public License 3.0", false),
        ]
        .into_iter()
        .map(|(id, name, allowed)| LicenseEntry {
            id: id.to_string(),
            name: Some(name.to_string()),
            allowed,
        })
        .collect();

        let license_mappings = [
            (r"(The )?Apache Software License,? (Version )?1\.1", "Apache-1.1"),
            (r"(The )?Apache( Software)? License,? (Version )?2\.0.*", "Apache-2.0"),
            (r"Apache( |-)2(\.0)?( License)?", "Apache-2.0"),
            (r"(The )?MIT License( \(MIT\))?", "MIT"),
            (r"(The )?BSD 2-Clause( License)?|Simplified BSD( License)?", "BSD-2-Clause"),
            (r"(The )?(New )?BSD( 3-Clause)?( License)?", "BSD-3-Clause"),
            (r"Eclipse Public License( -)? ?(v|Version )?1\.0", "EPL-1.0"),
            (r"ISC License.*", "ISC"),
            (r"GNU Lesser General Public License.*2\.1.*|LGPL[ -]?(v)?2\.1", "LGPL-2.1"),
            (r"GNU Lesser General Public License.*3.*|LGPL[ -]?(v)?3(\.0)?", "LGPL-3.0"),
            (r"Mozilla Public License.*2\.0|MPL[ -]?(v)?2(\.0)?", "MPL-2.0"),
            (r"GNU General Public License.*2.*|GPL[ -]?(v)?2(\.0)?", "GPL-2.0"),
            (r"GNU General Public License.*3.*|GPL[ -]?(v)?3(\.0)?", "GPL-3.0"),
            (r"GNU Affero General Public License.*|AGPL[ -]?(v)?3(\.0)?", "AGPL-3.0"),
        ]
        .into_iter()
        .map(|(pattern, license)| MappingEntry {
            pattern: pattern.to_string(),
            license: license.to_string(),
        })
        .collect();

        Config {
            enabled: true,
            licenses,
            license_mappings,
            dependency_mappings: Vec::new(),
        }
    }
}

/// Load the policy configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-gate/config.toml`
/// 3. `~/.config/license-gate/config.toml`
/// 4. Built-in [`Config::default`]
///
/// A present but unreadable or malformed file is fatal: silently falling back
/// to the default policy would mis-classify every dependency.
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-gate").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("license-gate").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("malformed config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_config() {
        let toml = r#"
enabled = true

[[licenses]]
id = "MIT"
allowed = true

[[licenses]]
id = "GPL-3.0"
name = "GNU General Public License 3.0"
allowed = false

[[license_mappings]]
pattern = "The Apache.*"
license = "Apache-2.0"

[[dependency_mappings]]
pattern = "org\\.acme:.*"
license = "Apache-2.0"
"#;
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{toml}").unwrap();
        let config = load_config(Path::new("."), Some(f.path())).unwrap();

        let policy = config.policy();
        assert_eq!(policy.len(), 2);
        assert_eq!(policy[0].id, "MIT");
        assert_eq!(policy[0].canonical_name, "MIT");
        assert!(policy[0].allowed);
        assert_eq!(policy[1].canonical_name, "GNU General Public License 3.0");
        assert!(!policy[1].allowed);

        let table = config.license_table().unwrap();
        assert_eq!(table.lookup("The Apache License"), Some("Apache-2.0"));
        assert!(!config.dependency_table().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "licenses = \"nope").unwrap();
        assert!(load_config(Path::new("."), Some(f.path())).is_err());
    }

    #[test]
    fn test_malformed_pattern_is_fatal() {
        let mut f = NamedTempFile::new().unwrap();
        write!(
            f,
            "[[license_mappings]]\npattern = \"(unclosed\"\nlicense = \"X\"\n"
        )
        .unwrap();
        let config = load_config(Path::new("."), Some(f.path())).unwrap();
        assert!(config.license_table().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.enabled);

        let policy = config.policy();
        let mit = policy.iter().find(|l| l.id == "MIT").unwrap();
        assert!(mit.allowed);
        let gpl = policy.iter().find(|l| l.id == "GPL-3.0").unwrap();
        assert!(!gpl.allowed);

        let table = config.license_table().unwrap();
        assert_eq!(
            table.lookup("The Apache Software License, Version 2.0"),
            Some("Apache-2.0")
        );
        assert_eq!(table.lookup("The MIT License (MIT)"), Some("MIT"));
        assert_eq!(table.lookup("Mozilla Public License 2.0"), Some("MPL-2.0"));
    }

    #[test]
    fn test_default_used_when_no_file_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert!(!config.licenses.is_empty());
    }
}
