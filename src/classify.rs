//! Branch classification - selects the module key a branch belongs to.

use crate::error::{Result, TagflowError};
use crate::version_map::VersionMap;

/// Classifies a branch name against the configured module keys.
///
/// Candidates are tried longest key first, so a key that is a substring of
/// another (e.g. "release" vs "prerelease") never shadows the more specific
/// one. Among equal-length keys the tie-break is lexicographic, which keeps
/// the result deterministic regardless of map iteration order.
///
/// Matching is a case-insensitive substring test of the key against the
/// branch name. The returned key is lower-cased so it can feed downstream
/// lookups uniformly.
pub fn classify(branch_name: &str, map: &VersionMap) -> Result<String> {
    let mut candidates = map.module_keys();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let branch_lower = branch_name.to_lowercase();
    for key in &candidates {
        if branch_lower.contains(&key.to_lowercase()) {
            return Ok(key.to_lowercase());
        }
    }

    Err(TagflowError::NoModuleMatched {
        branch: branch_name.to_string(),
        available: candidates.iter().map(|k| k.to_string()).collect(),
    })
}
