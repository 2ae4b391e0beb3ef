//! Per-ecosystem dependency scanners.
//!
//! Each scanner reads one ecosystem's metadata artifact below the module root
//! and produces raw [`Dependency`] records; license strings are left exactly
//! as found — normalization happens centrally, after merging. A missing
//! artifact is normal (not every project uses every ecosystem) and yields an
//! empty set; a malformed one is logged and degrades the same way, so one
//! scanner's failure never aborts the others.

use std::path::Path;

use crate::models::{Dependency, Ecosystem};

pub mod flutter;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod swift;

pub trait Scanner {
    /// The fixed tag stamped on every record this scanner produces.
    fn ecosystem(&self) -> Ecosystem;

    /// Collect raw dependency records from `module_root`.
    fn scan(&self, module_root: &Path) -> Vec<Dependency>;
}

/// The registered scanner set, one per supported ecosystem.
pub fn scanners() -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(npm::NpmScanner),
        Box::new(gradle::GradleScanner),
        Box::new(maven::MavenScanner),
        Box::new(swift::SwiftScanner),
        Box::new(flutter::PubScanner),
    ]
}
