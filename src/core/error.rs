use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-action formatting failure
///
/// Every variant is recoverable: the coordinator converts it into a failed
/// `FormattingResult` for that one action and moves on. Nothing here ever
/// crosses the pipeline boundary as a panic or a thrown error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("No resolvable targets for action: {0}")]
    MissingTarget(String),

    #[error("Conflicting target shapes for action {action_id}: placeholder '{placeholder}' disagrees between resolved and legacy data")]
    MalformedTarget {
        action_id: String,
        placeholder: String,
    },

    #[error("Template placeholder '{placeholder}' has no matching target context in action {action_id}")]
    TemplateSubstitution {
        action_id: String,
        placeholder: String,
    },

    #[error("Formatter failure: {0}")]
    Formatter(String),
}

impl FormatError {
    /// Stable code carried on failed results and in trace payloads
    pub fn code(&self) -> FormatErrorCode {
        match self {
            FormatError::MissingTarget(_) => FormatErrorCode::MissingTarget,
            FormatError::MalformedTarget { .. } => FormatErrorCode::MalformedTarget,
            FormatError::TemplateSubstitution { .. } => FormatErrorCode::TemplateSubstitution,
            FormatError::Formatter(_) => FormatErrorCode::Formatter,
        }
    }
}

/// Wire-friendly tag identifying which class of error failed an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatErrorCode {
    MissingTarget,
    MalformedTarget,
    TemplateSubstitution,
    Formatter,
}

/// Batch-level failure: the batch itself cannot be meaningfully processed
///
/// The only errors surfaced to the caller of `run()`. Raised before any
/// per-action work begins.
#[derive(Error, Debug)]
pub enum FatalBatchError {
    #[error("Batch payload is not iterable: {0}")]
    NotIterable(String),

    #[error("Required batch context is missing: {0}")]
    MissingContext(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;
