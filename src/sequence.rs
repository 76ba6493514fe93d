//! Tag sequencing - derives the next build tag from the existing tag set.

use regex::Regex;

/// Computes the next free tag for a `(base version, version type)` pair.
///
/// Existing tags of the form `<base>-<type>.<n>` are scanned for the highest
/// counter `n`; the result carries `n + 1`, or `1` when no tag matches. The
/// function is pure: it never consults the repository itself, only the tag
/// list it is given, so uniqueness holds only against that snapshot (the
/// publisher handles the push race via conditional tag creation).
pub fn next_tag(base_version: &str, version_type: &str, existing_tags: &[String]) -> String {
    let pattern = format!(
        r"^{}-{}\.(\d+)$",
        regex::escape(base_version),
        regex::escape(version_type)
    );

    // Both inputs are escaped, so the pattern always compiles.
    let max = match Regex::new(&pattern) {
        Ok(re) => existing_tags
            .iter()
            .filter_map(|tag| re.captures(tag))
            .filter_map(|caps| caps[1].parse::<u64>().ok())
            .max()
            .unwrap_or(0),
        Err(_) => 0,
    };

    format!("{}-{}.{}", base_version, version_type, max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_starts_at_one_with_no_tags() {
        assert_eq!(next_tag("1.0.0", "release", &[]), "1.0.0-release.1");
    }

    #[test]
    fn test_increments_past_max() {
        let existing = tags(&["1.0.0-release.1", "1.0.0-release.2"]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.3");
    }

    #[test]
    fn test_gaps_do_not_matter() {
        let existing = tags(&["1.0.0-release.1", "1.0.0-release.7"]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.8");
    }

    #[test]
    fn test_other_types_and_versions_ignored() {
        let existing = tags(&[
            "1.0.0-hotfix.9",
            "2.0.0-release.4",
            "1.0.0-release.2",
            "v1.0.0-release.5",
        ]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.3");
    }

    #[test]
    fn test_non_numeric_suffixes_ignored() {
        let existing = tags(&["1.0.0-release.rc1", "1.0.0-release.", "1.0.0-release.2x"]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.1");
    }

    #[test]
    fn test_full_numeric_group_used() {
        // The whole captured group counts, not a digit prefix
        let existing = tags(&["1.0.0-release.12"]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.13");
    }

    #[test]
    fn test_base_version_dots_are_literal() {
        // "1.0.0" must not match "1x0x0" through regex dot semantics
        let existing = tags(&["1x0x0-release.5"]);
        assert_eq!(next_tag("1.0.0", "release", &existing), "1.0.0-release.1");
    }

    #[test]
    fn test_result_never_in_existing_set() {
        let existing = tags(&["1.0.0-release.1", "1.0.0-release.2", "1.0.0-release.3"]);
        let tag = next_tag("1.0.0", "release", &existing);
        assert!(!existing.contains(&tag));
    }

    #[test]
    fn test_pure_function() {
        let existing = tags(&["2.4.0-release.2"]);
        let a = next_tag("2.4.0", "release", &existing);
        let b = next_tag("2.4.0", "release", &existing);
        assert_eq!(a, b);
        assert_eq!(a, "2.4.0-release.3");
    }
}
