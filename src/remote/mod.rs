//! Remote repository API abstraction layer
//!
//! The hosted git server (Gitea) is reached through the [RemoteApi] trait so
//! the publish workflow and the sync verifier can run against a mock in
//! tests. The concrete implementations are:
//!
//! - [gitea::GiteaClient]: real implementation over the Gitea REST API
//! - [mock::MockRemote]: scripted implementation for testing

pub mod gitea;
pub mod mock;

pub use gitea::GiteaClient;
pub use mock::MockRemote;

use crate::error::Result;

/// Operations tagflow needs from the hosted repository API.
///
/// Implementors must be `Send + Sync`. Errors are mapped to
/// [crate::error::TagflowError::RemoteCallFailed] with the remote response
/// body preserved verbatim for operator debugging.
pub trait RemoteApi: Send + Sync {
    /// Check whether a tag is visible on the remote.
    ///
    /// Returns `Ok(true)` when the tag ref exists, `Ok(false)` when the
    /// remote reports it absent (404), and `Err` on transport failures or
    /// unexpected statuses.
    fn tag_exists(&self, tag_name: &str) -> Result<bool>;

    /// Trigger a workflow run referencing a tag.
    ///
    /// Dispatches the workflow with `ref = refs/tags/<tag>` and the tag name
    /// as a workflow input.
    fn dispatch_workflow(&self, workflow: &str, tag_name: &str) -> Result<()>;
}
