use thiserror::Error;

/// Unified error type for tagflow operations
#[derive(Error, Debug)]
pub enum TagflowError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Branch '{branch}' matches no configured module. Available modules: {}", .available.join(", "))]
    NoModuleMatched {
        branch: String,
        available: Vec<String>,
    },

    #[error("Module '{key}' has no usable version in the version map")]
    MissingVersion { key: String },

    #[error("Tag '{tag}' already exists")]
    TagConflict { tag: String },

    #[error("Tag '{tag}' was not visible on the remote after {attempts} attempts")]
    SyncTimeout { tag: String, attempts: u32 },

    #[error("Remote call failed ({context}): {detail}")]
    RemoteCallFailed { context: String, detail: String },

    #[error("Invalid input: {0}")]
    InputInvalid(String),

    #[error("Interrupted by shutdown signal")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tagflow
pub type Result<T> = std::result::Result<T, TagflowError>;

impl TagflowError {
    /// Create an invalid-input error with context
    pub fn input(msg: impl Into<String>) -> Self {
        TagflowError::InputInvalid(msg.into())
    }

    /// Create a remote-call error with context
    pub fn remote(context: impl Into<String>, detail: impl Into<String>) -> Self {
        TagflowError::RemoteCallFailed {
            context: context.into(),
            detail: detail.into(),
        }
    }
}
