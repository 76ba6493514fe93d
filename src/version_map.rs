//! Validated version map - the declarative module/version-type configuration.
//!
//! The map is a JSON object of module key to `{ "version": "..." }` records.
//! Validation happens once here, at the boundary, so malformed entries fail
//! with a typed error instead of surfacing as cryptic failures downstream.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TagflowError};

/// A single module entry from the version map.
///
/// Only the `version` field matters to tagflow; any other fields in the
/// record are carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleEntry {
    pub version: String,
}

/// The full set of module entries, keyed by lower-cased module name.
#[derive(Debug, Clone)]
pub struct VersionMap {
    modules: HashMap<String, ModuleEntry>,
}

impl VersionMap {
    /// Parses and validates a version map from a JSON string.
    ///
    /// The root must be a JSON object. Entries whose key starts with `//`
    /// or whose value is not an object are skipped - the map format allows
    /// comment-style entries (e.g. `"//": "managed by release team"`). At
    /// least one real module entry must remain after filtering.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(input)
            .map_err(|e| TagflowError::input(format!("version map is not valid JSON: {}", e)))?;

        let object = root
            .as_object()
            .ok_or_else(|| TagflowError::input("version map root must be a JSON object"))?;

        let mut modules = HashMap::new();
        for (key, value) in object {
            if key.starts_with("//") {
                continue;
            }
            let record = match value.as_object() {
                Some(record) => record,
                None => continue,
            };

            let version = record
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            modules.insert(key.to_lowercase(), ModuleEntry { version });
        }

        if modules.is_empty() {
            return Err(TagflowError::input(
                "version map contains no module entries",
            ));
        }

        Ok(VersionMap { modules })
    }

    /// Loads and validates a version map from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            TagflowError::input(format!(
                "cannot read version map '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// All module keys, in no particular order.
    pub fn module_keys(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Resolves the base version for a module key (case-insensitive).
    ///
    /// Fails with `MissingVersion` when the key is absent or its version
    /// field is empty. No fallback version is ever synthesized.
    pub fn resolve_version(&self, key: &str) -> Result<&str> {
        let entry = self
            .modules
            .get(&key.to_lowercase())
            .ok_or_else(|| TagflowError::MissingVersion {
                key: key.to_string(),
            })?;

        if entry.version.is_empty() {
            return Err(TagflowError::MissingVersion {
                key: key.to_string(),
            });
        }

        Ok(&entry.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_map() {
        let map = VersionMap::from_json_str(
            r#"{"release":{"version":"1.0.0"},"hotfix":{"version":"2.1.0"}}"#,
        )
        .unwrap();

        assert_eq!(map.resolve_version("release").unwrap(), "1.0.0");
        assert_eq!(map.resolve_version("hotfix").unwrap(), "2.1.0");
    }

    #[test]
    fn test_scalar_entries_are_skipped() {
        let map = VersionMap::from_json_str(
            r#"{"//": "comment entry", "release": {"version": "1.0.0"}}"#,
        )
        .unwrap();

        assert_eq!(map.module_keys(), vec!["release"]);
    }

    #[test]
    fn test_comment_prefixed_keys_are_skipped_even_as_objects() {
        let map = VersionMap::from_json_str(
            r#"{"//disabled": {"version": "9.9.9"}, "release": {"version": "1.0.0"}}"#,
        )
        .unwrap();

        assert_eq!(map.module_keys(), vec!["release"]);
        assert!(map.resolve_version("//disabled").is_err());
    }

    #[test]
    fn test_root_must_be_object() {
        let err = VersionMap::from_json_str(r#"["release"]"#).unwrap_err();
        assert!(matches!(err, TagflowError::InputInvalid(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = VersionMap::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TagflowError::InputInvalid(_)));
    }

    #[test]
    fn test_empty_map_rejected() {
        let err = VersionMap::from_json_str(r#"{"//": "only comments"}"#).unwrap_err();
        assert!(matches!(err, TagflowError::InputInvalid(_)));
    }

    #[test]
    fn test_missing_version_field() {
        let map = VersionMap::from_json_str(r#"{"release":{"owner":"team-a"}}"#).unwrap();
        let err = map.resolve_version("release").unwrap_err();
        assert!(matches!(err, TagflowError::MissingVersion { .. }));
    }

    #[test]
    fn test_empty_version_field() {
        let map = VersionMap::from_json_str(r#"{"release":{"version":""}}"#).unwrap();
        let err = map.resolve_version("release").unwrap_err();
        assert!(matches!(err, TagflowError::MissingVersion { .. }));
    }

    #[test]
    fn test_unknown_key() {
        let map = VersionMap::from_json_str(r#"{"release":{"version":"1.0.0"}}"#).unwrap();
        let err = map.resolve_version("prerelease").unwrap_err();
        assert!(matches!(err, TagflowError::MissingVersion { .. }));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let map = VersionMap::from_json_str(r#"{"Release":{"version":"1.0.0"}}"#).unwrap();
        assert_eq!(map.resolve_version("RELEASE").unwrap(), "1.0.0");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let map = VersionMap::from_json_str(
            r#"{"release":{"version":"1.0.0","owner":"team-a","frozen":false}}"#,
        )
        .unwrap();
        assert_eq!(map.resolve_version("release").unwrap(), "1.0.0");
    }
}
