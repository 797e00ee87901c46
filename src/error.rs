use thiserror::Error;

/// Process exit status for a completed cleanup.
pub const EXIT_OK: i32 = 0;
/// Process exit status for any precondition or cleanup failure.
pub const EXIT_FAILURE: i32 = 1;

/// Reasons a cleanup run stops before the push succeeds
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Not in a git repository")]
    NotAGitRepository,

    #[error("{tool} not found. Please install it first.")]
    ToolNotFound { tool: String },

    #[error("Failed to clean git history: {stderr}")]
    RewriteFailed { stderr: String },

    #[error("Failed to push to remote: {stderr}")]
    PushFailed { stderr: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to load configuration: {source}")]
    Config { source: anyhow::Error },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CleanupError {
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
