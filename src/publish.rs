//! Release publishing workflow.
//!
//! Drives the end-to-end sequence: classify the branch, resolve the base
//! version, compute the next tag, create and push it, wait for remote
//! visibility, then dispatch the downstream workflow. Every stage failure is
//! terminal; only the sync verifier retries internally.

use crate::classify::classify;
use crate::error::{Result, TagflowError};
use crate::git::GitAccess;
use crate::remote::RemoteApi;
use crate::sequence::next_tag;
use crate::ui;
use crate::verify::{verify_visible, Delay};
use crate::version_map::VersionMap;

/// Bound on re-sequencing after losing a tag-creation race. The tag
/// namespace is shared with concurrent CI runs, so a freshly computed name
/// can be taken between the tag-list read and the create.
const SEQUENCE_RETRIES: u32 = 3;

/// Options for one publish run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOptions {
    /// Git remote to push the tag to
    pub remote: String,

    /// Workflow file to dispatch after the tag is visible
    pub workflow: String,

    /// Verification attempts before giving up on tag sync
    pub max_attempts: u32,

    /// Preview mode - compute the tag but perform no writes
    pub dry_run: bool,
}

/// Result of a successful publish run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    /// The tag that was created (the run's primary output value)
    pub tag: String,

    /// The branch that was classified
    pub branch: String,

    /// The module key the branch matched
    pub module: String,

    /// Whether the downstream workflow was dispatched
    pub dispatched: bool,
}

/// Runs the publish workflow end to end.
///
/// # Arguments
/// * `git` - Local repository access (branch, tags, create, push)
/// * `remote` - Hosted repository API (visibility check, dispatch)
/// * `delay` - Suspension primitive for verifier backoff
/// * `map` - Validated version map
/// * `branch_override` - Branch name to use instead of the current checkout
/// * `opts` - Remote name, workflow, attempt budget, dry-run flag
pub fn run_publish<G, R, D>(
    git: &G,
    remote: &R,
    delay: &D,
    map: &VersionMap,
    branch_override: Option<&str>,
    opts: &PublishOptions,
) -> Result<PublishOutcome>
where
    G: GitAccess + ?Sized,
    R: RemoteApi + ?Sized,
    D: Delay + ?Sized,
{
    let branch = match branch_override {
        Some(branch) => branch.to_string(),
        None => git.current_branch()?,
    };

    let module = classify(&branch, map)?;
    ui::display_status(&format!("Branch '{}' matched module '{}'", branch, module));

    let base_version = map.resolve_version(&module)?.to_string();
    ui::display_success(&format!("Base version: {}", base_version));

    let new_tag = publish_tag(git, &branch, &module, &base_version, opts)?;
    if opts.dry_run {
        return Ok(PublishOutcome {
            tag: new_tag,
            branch,
            module,
            dispatched: false,
        });
    }
    ui::display_success(&format!("Pushed tag: {}", new_tag));

    verify_visible(remote, &new_tag, opts.max_attempts, delay)?;
    ui::display_success(&format!("Tag {} visible on remote", new_tag));

    remote.dispatch_workflow(&opts.workflow, &new_tag)?;
    ui::display_success(&format!(
        "Dispatched workflow '{}' for {}",
        opts.workflow, new_tag
    ));

    Ok(PublishOutcome {
        tag: new_tag,
        branch,
        module,
        dispatched: true,
    })
}

/// Computes the next tag and creates+pushes it.
///
/// Sequencing runs against a snapshot of the tag list; if the conditional
/// create reports the name taken, the snapshot is refreshed and sequencing
/// retried a bounded number of times before the conflict is surfaced.
fn publish_tag<G>(
    git: &G,
    branch: &str,
    module: &str,
    base_version: &str,
    opts: &PublishOptions,
) -> Result<String>
where
    G: GitAccess + ?Sized,
{
    let mut last_conflict = None;

    for attempt in 0..SEQUENCE_RETRIES {
        let existing = git.list_tags()?;
        let candidate = next_tag(base_version, module, &existing);

        if opts.dry_run {
            ui::display_status("Dry run:");
            ui::display_success(&format!("  would create tag {} on '{}'", candidate, branch));
            ui::display_success(&format!("  would push {} to '{}'", candidate, opts.remote));
            ui::display_success(&format!(
                "  would dispatch workflow '{}' once the tag syncs",
                opts.workflow
            ));
            return Ok(candidate);
        }

        if attempt > 0 {
            ui::display_status(&format!(
                "Re-sequencing after tag conflict (attempt {}/{})",
                attempt + 1,
                SEQUENCE_RETRIES
            ));
        }

        match git.create_tag(&candidate, &format!("Release {}", candidate)) {
            Ok(()) => {
                git.push_tag(&opts.remote, &candidate)?;
                return Ok(candidate);
            }
            Err(TagflowError::TagConflict { tag }) => {
                last_conflict = Some(tag);
            }
            Err(other) => return Err(other),
        }
    }

    Err(TagflowError::TagConflict {
        tag: last_conflict.unwrap_or_default(),
    })
}
