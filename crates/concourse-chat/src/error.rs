//! Error types for concourse-chat

use thiserror::Error;

/// Result type alias using concourse-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a chat turn
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the completion endpoint
    #[error(transparent)]
    Provider(#[from] concourse_ai::Error),

    /// A session store error
    #[error("session store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The model named a tool absent from the catalog
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments were not valid JSON or failed schema validation
    #[error("malformed arguments for tool '{tool}': {message}")]
    MalformedToolArguments { tool: String, message: String },

    /// Streaming was requested on a turn that declares tools
    #[error("streaming is not supported when tools are declared")]
    StreamingUnsupported,
}

impl Error {
    /// Create a malformed-arguments error
    pub fn malformed_args(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedToolArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
