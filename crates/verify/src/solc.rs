//! Compiler version seam.
//!
//! Inferring the exact release to report is a collaborator concern; the
//! default implementation takes the first concrete version named by a
//! `pragma solidity` directive and normalizes it to the `vX.Y.Z` form the
//! service expects.

use crate::error::VerifyError;
use semver::Version;

/// Resolves the compiler version string to report to the service.
pub trait CompilerVersion {
    fn compiler_version(&self, source: &str) -> Result<String, VerifyError>;
}

/// Scans `pragma solidity` directives for a concrete version.
#[derive(Clone, Copy, Debug, Default)]
pub struct PragmaVersion;

impl CompilerVersion for PragmaVersion {
    fn compiler_version(&self, source: &str) -> Result<String, VerifyError> {
        for line in source.lines() {
            let line = line.trim_start();
            let Some(rest) = line.strip_prefix("pragma") else { continue };
            let rest = rest.trim_start();
            let Some(requirement) = rest.strip_prefix("solidity") else { continue };
            let requirement = requirement.trim_end().trim_end_matches(';');

            for token in requirement.split_whitespace() {
                let candidate = token.trim_start_matches(['^', '~', '>', '<', '=']);
                if let Ok(version) = Version::parse(candidate) {
                    return Ok(normalize(&version));
                }
            }
        }
        Err(VerifyError::Parse(
            "could not determine the compiler version from the source pragma; \
             pass an explicit compiler version"
                .to_string(),
        ))
    }
}

/// Renders a version the way the service expects (`v0.8.19`). Used for
/// explicit overrides too, so `0.8.19` and `v0.8.19` are both accepted.
pub fn normalize_override(version: &str) -> String {
    let trimmed = version.trim();
    if trimmed.starts_with('v') {
        trimmed.to_string()
    } else {
        format!("v{trimmed}")
    }
}

fn normalize(version: &Version) -> String {
    format!("v{version}")
}
