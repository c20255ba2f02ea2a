//! Rendering from metadata attached directly to the candidate

use super::{template, FormattingResult, FormattingStrategy};
use crate::core::error::{FormatError, Result};
use crate::core::types::MetadataSource;
use crate::task::ActionFormattingTask;

/// Formats through per-action rendering hints
///
/// Recognized hints, most specific first:
/// - `command`: author-supplied final string, emitted verbatim
/// - `template`: overrides the action definition's template
///
/// Anything else in the metadata bag is ignored here; unknown hints are
/// not an error.
pub struct PerActionMetadataStrategy;

impl FormattingStrategy for PerActionMetadataStrategy {
    fn source(&self) -> MetadataSource {
        MetadataSource::PerAction
    }

    fn format(&self, task: &ActionFormattingTask<'_>) -> Result<FormattingResult> {
        let metadata = task.per_action_metadata.ok_or_else(|| {
            FormatError::Formatter(format!(
                "per-action strategy selected without metadata for action {}",
                task.action_id
            ))
        })?;

        if let Some(command) = metadata.get_str("command") {
            return Ok(FormattingResult::success(
                task.action_id,
                command,
                self.source(),
                task.target_count(),
            ));
        }

        let template = metadata
            .get_str("template")
            .unwrap_or(&task.action.template);
        if template.is_empty() {
            return Err(FormatError::Formatter(format!(
                "action {} carries neither a template nor a command hint",
                task.action_id
            )));
        }

        let command = template::substitute(template, task)?;
        Ok(FormattingResult::success(
            task.action_id,
            command,
            self.source(),
            task.target_count(),
        ))
    }
}
