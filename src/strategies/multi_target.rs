//! Rendering from the full ordered multi-target contexts

use super::{template, FormattingResult, FormattingStrategy};
use crate::core::error::{FormatError, Result};
use crate::core::types::MetadataSource;
use crate::task::ActionFormattingTask;

/// Substitutes every named placeholder of the action template from the
/// ordered target contexts
///
/// A placeholder with no matching context is a `TemplateSubstitution`
/// failure; the coordinator decides whether to degrade to the legacy
/// formatter.
pub struct GlobalMultiTargetStrategy;

impl FormattingStrategy for GlobalMultiTargetStrategy {
    fn source(&self) -> MetadataSource {
        MetadataSource::GlobalMultiTarget
    }

    fn format(&self, task: &ActionFormattingTask<'_>) -> Result<FormattingResult> {
        if task.action.template.is_empty() {
            return Err(FormatError::Formatter(format!(
                "action {} has no template",
                task.action_id
            )));
        }

        let command = template::substitute(&task.action.template, task)?;
        Ok(FormattingResult::success(
            task.action_id,
            command,
            self.source(),
            task.target_count(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::candidate::{ActionCandidate, ActionDefinition};
    use crate::batch::context::{BatchContext, FormatterOptions, NullDisplayNames};
    use crate::core::types::{EntityId, TargetRoleRegistry};
    use crate::targets::extraction::{TargetContext, TargetExtractionResult};
    use crate::task::create_task;

    #[test]
    fn test_formats_all_placeholders_in_order() {
        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("give", "Give", "give {primary} to {secondary}"),
        );
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);

        let mut normalized = TargetExtractionResult::default();
        normalized.contexts.push(
            TargetContext::new("primary", EntityId::from("sword1")).with_display_name("Iron Sword"),
        );
        normalized
            .contexts
            .push(TargetContext::new("secondary", EntityId::from("npc1")));
        let task = create_task(&candidate, normalized, &batch);

        let result = GlobalMultiTargetStrategy.format(&task).unwrap();
        assert_eq!(result.command, "give Iron Sword to npc1");
        assert_eq!(result.target_context_count, 2);
        assert_eq!(result.metadata_source, MetadataSource::GlobalMultiTarget);
    }

    #[test]
    fn test_missing_placeholder_is_substitution_error() {
        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("give", "Give", "give {primary} to {secondary}"),
        );
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);

        let mut normalized = TargetExtractionResult::default();
        normalized
            .contexts
            .push(TargetContext::new("primary", EntityId::from("sword1")));
        let task = create_task(&candidate, normalized, &batch);

        let err = GlobalMultiTargetStrategy.format(&task).unwrap_err();
        assert!(matches!(err, FormatError::TemplateSubstitution { .. }));
    }
}
