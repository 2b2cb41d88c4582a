//! Error Types

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Assistant error types
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Unknown agent type requested at the dispatcher
    #[error("Invalid agent type '{requested}'. Valid types: {}", .valid.join(", "))]
    InvalidAgentType {
        requested: String,
        valid: Vec<String>,
    },

    /// Conversation store used for a role that was never seeded
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Tool name already registered
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Network-level failure talking to the completion endpoint
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Endpoint rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Endpoint rate limit hit
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Endpoint returned something we could not decode
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A declared tool's execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Tool round-trip count exceeded its bound
    #[error("Tool loop exceeded {0} rounds")]
    ToolLoopExceeded(usize),

    /// Turn abandoned by external timeout or cancellation
    #[error("Cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssistantError {
    /// Check if the caller may reasonably retry the operation.
    ///
    /// The core never retries on its own; backoff policy belongs to the
    /// caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssistantError::Transport(_) | AssistantError::RateLimited(_) | AssistantError::Io(_)
        )
    }
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        AssistantError::ToolExecution(err.to_string())
    }
}
