//! Formatting strategies
//!
//! Each strategy renders one task shape into a command string:
//! per-action metadata -> multi-target template -> legacy single-target,
//! chosen by the decider in that precedence order. Strategies return
//! errors as values; the coordinator decides about fallback and recording.

pub mod decider;
pub mod legacy;
pub mod multi_target;
pub mod per_action;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::core::error::{FormatErrorCode, Result};
use crate::core::types::MetadataSource;
use crate::task::ActionFormattingTask;

pub use decider::{FormattingDecider, StrategyKind};
pub use legacy::LegacyFallbackFormatter;
pub use multi_target::GlobalMultiTargetStrategy;
pub use per_action::PerActionMetadataStrategy;

/// Final formatted output for one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingResult {
    pub action_id: String,
    /// The player-facing command string; empty on failure
    pub command: String,
    pub metadata_source: MetadataSource,
    pub target_context_count: usize,
    pub success: bool,
    #[serde(default)]
    pub error: Option<FormatErrorCode>,
}

impl FormattingResult {
    pub fn success(
        action_id: impl Into<String>,
        command: impl Into<String>,
        metadata_source: MetadataSource,
        target_context_count: usize,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            command: command.into(),
            metadata_source,
            target_context_count,
            success: true,
            error: None,
        }
    }

    pub fn failure(
        action_id: impl Into<String>,
        metadata_source: MetadataSource,
        target_context_count: usize,
        error: FormatErrorCode,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            command: String::new(),
            metadata_source,
            target_context_count,
            success: false,
            error: Some(error),
        }
    }
}

/// A way of rendering one task into a command string
pub trait FormattingStrategy {
    /// Tag recorded on results produced by this strategy
    fn source(&self) -> MetadataSource;

    fn format(&self, task: &ActionFormattingTask<'_>) -> Result<FormattingResult>;
}
