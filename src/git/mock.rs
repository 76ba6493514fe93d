use std::sync::Mutex;

use crate::error::{Result, TagflowError};
use crate::git::GitAccess;

/// Mock repository for testing without actual git operations.
///
/// Tracks created and pushed tags so tests can assert on the exact sequence
/// of writes the publisher performs.
pub struct MockRepository {
    branch: String,
    tags: Mutex<Vec<String>>,
    pushed: Mutex<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a mock checked out on the given branch.
    pub fn new(branch: impl Into<String>) -> Self {
        MockRepository {
            branch: branch.into(),
            tags: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Seed an existing tag.
    pub fn add_tag(&self, name: impl Into<String>) {
        self.tags.lock().unwrap().push(name.into());
    }

    /// Tags created so far (seeded plus published).
    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }

    /// Tags pushed so far, as `(remote, tag)` pairs.
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.pushed.lock().unwrap().clone()
    }
}

impl GitAccess for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags())
    }

    fn create_tag(&self, tag_name: &str, _message: &str) -> Result<()> {
        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.as_str() == tag_name) {
            return Err(TagflowError::TagConflict {
                tag: tag_name.to_string(),
            });
        }
        tags.push(tag_name.to_string());
        Ok(())
    }

    fn push_tag(&self, remote_name: &str, tag_name: &str) -> Result<()> {
        self.pushed
            .lock()
            .unwrap()
            .push((remote_name.to_string(), tag_name.to_string()));
        Ok(())
    }
}
