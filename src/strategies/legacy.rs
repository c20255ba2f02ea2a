//! Legacy single-target rendering, also the degrade-gracefully fallback

use super::{template, FormattingResult, FormattingStrategy};
use crate::core::error::{FormatError, Result};
use crate::core::types::MetadataSource;
use crate::targets::extraction::TargetContext;
use crate::task::ActionFormattingTask;

/// Renders through the legacy template shape: one target, one slot
///
/// Every non-actor placeholder substitutes the primary target, so modern
/// templates like `attack {primary}` still render something sensible when
/// this runs as the last-resort fallback. A failure here is final.
pub struct LegacyFallbackFormatter;

impl LegacyFallbackFormatter {
    fn primary<'t>(task: &'t ActionFormattingTask<'_>) -> Result<&'t TargetContext> {
        task.primary
            .as_ref()
            .or_else(|| task.target_contexts.first())
            .ok_or_else(|| FormatError::MissingTarget(task.action_id.to_string()))
    }
}

impl FormattingStrategy for LegacyFallbackFormatter {
    fn source(&self) -> MetadataSource {
        MetadataSource::Legacy
    }

    fn format(&self, task: &ActionFormattingTask<'_>) -> Result<FormattingResult> {
        let template_str = &task.action.template;
        if template_str.is_empty() {
            return Err(FormatError::Formatter(format!(
                "action {} has no template",
                task.action_id
            )));
        }

        let needs_target = has_non_actor_placeholder(template_str);
        let command = if needs_target {
            let primary = Self::primary(task)?;
            let name = template::target_name(task, primary);
            substitute_all(template_str, task, &name)
        } else {
            template::substitute(template_str, task)?
        };

        Ok(FormattingResult::success(
            task.action_id,
            command,
            self.source(),
            task.target_count(),
        ))
    }
}

fn has_non_actor_placeholder(template_str: &str) -> bool {
    let mut rest = template_str;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                if &after[..close] != "actor" {
                    return true;
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    false
}

/// Replace every non-actor slot with the primary target's name
fn substitute_all(template_str: &str, task: &ActionFormattingTask<'_>, name: &str) -> String {
    let mut out = String::with_capacity(template_str.len());
    let mut rest = template_str;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                if &after[..close] == "actor" {
                    out.push_str(&template::actor_name(task));
                } else {
                    out.push_str(name);
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
