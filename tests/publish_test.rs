// End-to-end publish scenarios over the mock collaborators.

use std::time::Duration;

use tagflow::git::MockRepository;
use tagflow::publish::{run_publish, PublishOptions};
use tagflow::remote::mock::LookupOutcome;
use tagflow::remote::MockRemote;
use tagflow::verify::Delay;
use tagflow::version_map::VersionMap;
use tagflow::TagflowError;

struct NoDelay;

impl Delay for NoDelay {
    fn sleep(&self, _duration: Duration) -> bool {
        true
    }
}

fn standard_map() -> VersionMap {
    VersionMap::from_json_str(r#"{"release":{"version":"1.0.0"},"hotfix":{"version":"1.0.0"}}"#)
        .expect("map should parse")
}

fn standard_opts() -> PublishOptions {
    PublishOptions {
        remote: "origin".to_string(),
        workflow: "build.yml".to_string(),
        max_attempts: 5,
        dry_run: false,
    }
}

#[test]
fn test_release_branch_with_existing_tags() {
    // Scenario: release branch, two existing release tags -> counter moves to 3
    let git = MockRepository::new("release/feature-x");
    git.add_tag("1.0.0-release.1");
    git.add_tag("1.0.0-release.2");
    let remote = MockRemote::new();

    let outcome = run_publish(&git, &remote, &NoDelay, &standard_map(), None, &standard_opts())
        .expect("publish should succeed");

    assert_eq!(outcome.tag, "1.0.0-release.3");
    assert_eq!(outcome.module, "release");
    assert!(outcome.dispatched);
    assert_eq!(
        git.pushed(),
        vec![("origin".to_string(), "1.0.0-release.3".to_string())]
    );
    assert_eq!(
        remote.dispatched(),
        vec![("build.yml".to_string(), "1.0.0-release.3".to_string())]
    );
}

#[test]
fn test_hotfix_branch_with_no_tags() {
    // Scenario: hotfix branch, empty tag set -> counter starts at 1
    let git = MockRepository::new("hotfix/urgent");
    let remote = MockRemote::new();

    let outcome = run_publish(&git, &remote, &NoDelay, &standard_map(), None, &standard_opts())
        .expect("publish should succeed");

    assert_eq!(outcome.tag, "1.0.0-hotfix.1");
    assert_eq!(outcome.module, "hotfix");
    assert!(outcome.dispatched);
}

#[test]
fn test_missing_version_stops_before_any_write() {
    // Scenario: matched module has no version field -> MissingVersion,
    // no tag computed, no push attempted
    let git = MockRepository::new("release/feature-x");
    let remote = MockRemote::new();
    let map = VersionMap::from_json_str(r#"{"release":{"owner":"team-a"}}"#).unwrap();

    let err = run_publish(&git, &remote, &NoDelay, &map, None, &standard_opts()).unwrap_err();

    assert!(matches!(err, TagflowError::MissingVersion { .. }));
    assert!(git.tags().is_empty());
    assert!(git.pushed().is_empty());
    assert_eq!(remote.lookup_count(), 0);
    assert!(remote.dispatched().is_empty());
}

#[test]
fn test_slow_sync_still_dispatches() {
    // Scenario: lookup fails twice then succeeds with max_attempts=3 ->
    // run proceeds to dispatch after exactly 3 attempts
    let git = MockRepository::new("release/feature-x");
    let remote = MockRemote::with_lookup_script(vec![
        LookupOutcome::NotVisible,
        LookupOutcome::NotVisible,
        LookupOutcome::Visible,
    ]);

    let opts = PublishOptions {
        max_attempts: 3,
        ..standard_opts()
    };

    let outcome = run_publish(&git, &remote, &NoDelay, &standard_map(), None, &opts)
        .expect("publish should succeed");

    assert_eq!(remote.lookup_count(), 3);
    assert!(outcome.dispatched);
    assert_eq!(remote.dispatched().len(), 1);
}

#[test]
fn test_sync_timeout_prevents_dispatch() {
    let git = MockRepository::new("release/feature-x");
    let remote = MockRemote::with_lookup_script(vec![LookupOutcome::NotVisible; 10]);

    let opts = PublishOptions {
        max_attempts: 3,
        ..standard_opts()
    };

    let err = run_publish(&git, &remote, &NoDelay, &standard_map(), None, &opts).unwrap_err();

    match err {
        TagflowError::SyncTimeout { tag, attempts } => {
            assert_eq!(tag, "1.0.0-release.1");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected SyncTimeout, got {}", other),
    }
    // The tag was pushed before verification gave up, but nothing dispatched
    assert_eq!(git.pushed().len(), 1);
    assert!(remote.dispatched().is_empty());
}

#[test]
fn test_unmatched_branch_fails_classification() {
    let git = MockRepository::new("feature/unrelated");
    let remote = MockRemote::new();

    let err = run_publish(&git, &remote, &NoDelay, &standard_map(), None, &standard_opts())
        .unwrap_err();

    assert!(matches!(err, TagflowError::NoModuleMatched { .. }));
    assert!(git.pushed().is_empty());
}

#[test]
fn test_exact_tag_format() {
    // Tag format must stay <baseVersion>-<versionType>.<n> for downstream
    // compatibility
    let git = MockRepository::new("release/2.4");
    git.add_tag("2.4.0-release.2");
    let remote = MockRemote::new();
    let map = VersionMap::from_json_str(r#"{"release":{"version":"2.4.0"}}"#).unwrap();

    let outcome =
        run_publish(&git, &remote, &NoDelay, &map, None, &standard_opts()).unwrap();

    assert_eq!(outcome.tag, "2.4.0-release.3");
}
