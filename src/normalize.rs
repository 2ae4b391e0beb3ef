//! License normalization: fold raw license-string variants into the canonical
//! identifiers the policy knows, via an ordered pattern table.

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::Dependency;

/// One mapping rule: anchored pattern → canonical license id.
#[derive(Debug)]
pub struct PatternRule {
    regex: Regex,
    canonical: String,
}

impl PatternRule {
    /// Compile a rule. The pattern is anchored so matching covers the whole
    /// string, not a substring.
    pub fn new(pattern: &str, canonical: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .with_context(|| format!("invalid license pattern `{pattern}`"))?;
        Ok(PatternRule {
            regex,
            canonical: canonical.to_string(),
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// Ordered rule table. Declaration order is the tie-break for overlapping
/// patterns: the first matching rule wins.
#[derive(Debug, Default)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Build a table from `(pattern, canonical)` pairs, preserving order.
    /// A malformed pattern is a configuration error and fails the run.
    pub fn new<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, canonical)| PatternRule::new(pattern, canonical))
            .collect::<Result<Vec<_>>>()?;
        Ok(PatternTable { rules })
    }

    /// First-match lookup in declaration order.
    pub fn lookup(&self, value: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(value))
            .map(PatternRule::canonical)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rewrite a dependency's raw license string to its canonical form.
///
/// Pure: the input is untouched and a new record is returned. A blank license
/// passes through unchanged (normalization cannot invent a license), as does
/// a value no rule matches — it may already be canonical, or it gets caught
/// by policy lookup later.
pub fn normalize(dependency: &Dependency, licenses: &PatternTable) -> Dependency {
    let raw = match dependency.license.as_deref() {
        Some(l) if !l.trim().is_empty() => l,
        _ => {
            tracing::debug!("no license to normalize for dependency {}", dependency);
            return dependency.clone();
        }
    };

    match licenses.lookup(raw) {
        Some(canonical) => dependency.with_license(canonical),
        None => dependency.clone(),
    }
}

/// Fallback resolution for dependencies whose scanner found no license:
/// match the dependency *name* against a second pattern table mapping known
/// artifacts to their license. No-op for records that already carry one.
pub fn resolve_unlicensed(dependency: &Dependency, dependencies: &PatternTable) -> Dependency {
    if !dependency.license_is_blank() {
        return dependency.clone();
    }

    match dependencies.lookup(&dependency.name) {
        Some(license) => {
            tracing::debug!(
                "resolved license {} for dependency {} by name mapping",
                license,
                dependency
            );
            dependency.with_license(license)
        }
        None => dependency.clone(),
    }
}
