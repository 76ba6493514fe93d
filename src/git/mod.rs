//! Git operations abstraction layer
//!
//! The version-control side of the workflow sits behind the [GitAccess]
//! trait so the publisher can run against a mock in tests. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for testing
//!
//! All implementors must be `Send + Sync`, and map underlying `git2::Error`s
//! into [crate::error::TagflowError] variants.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Operations tagflow needs from the local repository and its remote.
pub trait GitAccess: Send + Sync {
    /// Name of the currently checked-out branch.
    ///
    /// # Returns
    /// * `Ok(String)` - Branch shorthand (e.g. "release/feature-x")
    /// * `Err` - If HEAD is detached or unreadable
    fn current_branch(&self) -> Result<String>;

    /// All tag names in the repository.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Create an annotated tag on the current HEAD commit.
    ///
    /// Creation is conditional: if a tag of the same name already exists the
    /// call fails with [crate::error::TagflowError::TagConflict] rather than
    /// overwriting, which lets the publisher re-sequence after losing a race
    /// against a concurrent invocation.
    fn create_tag(&self, tag_name: &str, message: &str) -> Result<()>;

    /// Push a tag to the named remote.
    fn push_tag(&self, remote_name: &str, tag_name: &str) -> Result<()>;
}
