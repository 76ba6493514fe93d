use std::sync::Mutex;

use crate::error::{Result, TagflowError};
use crate::remote::RemoteApi;

/// Mock remote API for testing without a real server.
///
/// Tag lookups are scripted: each call consumes the next queued outcome, and
/// once the script runs out every further lookup reports the tag visible.
/// Dispatched workflows are recorded for assertions.
pub struct MockRemote {
    lookup_script: Mutex<Vec<LookupOutcome>>,
    lookups: Mutex<u32>,
    dispatches: Mutex<Vec<(String, String)>>,
}

/// Outcome of one scripted tag lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupOutcome {
    Visible,
    NotVisible,
    TransportError,
}

impl MockRemote {
    /// Create a mock whose lookups always succeed immediately.
    pub fn new() -> Self {
        MockRemote {
            lookup_script: Mutex::new(Vec::new()),
            lookups: Mutex::new(0),
            dispatches: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that plays back the given lookup outcomes in order.
    pub fn with_lookup_script(script: Vec<LookupOutcome>) -> Self {
        let mock = Self::new();
        // Stored reversed so pop() yields outcomes in script order
        let mut reversed = script;
        reversed.reverse();
        *mock.lookup_script.lock().unwrap() = reversed;
        mock
    }

    /// Number of tag lookups performed so far.
    pub fn lookup_count(&self) -> u32 {
        *self.lookups.lock().unwrap()
    }

    /// Workflows dispatched so far, as `(workflow, tag)` pairs.
    pub fn dispatched(&self) -> Vec<(String, String)> {
        self.dispatches.lock().unwrap().clone()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteApi for MockRemote {
    fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        *self.lookups.lock().unwrap() += 1;

        match self.lookup_script.lock().unwrap().pop() {
            Some(LookupOutcome::Visible) | None => Ok(true),
            Some(LookupOutcome::NotVisible) => Ok(false),
            Some(LookupOutcome::TransportError) => Err(TagflowError::remote(
                format!("tag lookup for '{}'", tag_name),
                "connection reset",
            )),
        }
    }

    fn dispatch_workflow(&self, workflow: &str, tag_name: &str) -> Result<()> {
        self.dispatches
            .lock()
            .unwrap()
            .push((workflow.to_string(), tag_name.to_string()));
        Ok(())
    }
}
