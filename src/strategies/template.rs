//! Placeholder substitution shared by all strategies
//!
//! Templates carry `{placeholder}` slots. `{actor}` resolves to the acting
//! entity; every other slot must match a target context's placeholder.
//! Display names come from the context itself, then the injected resolver,
//! then the raw entity id.

use crate::core::error::{FormatError, Result};
use crate::targets::extraction::TargetContext;
use crate::task::ActionFormattingTask;

/// Substitute every `{placeholder}` in `template` from the task's contexts
///
/// Unknown placeholders produce `TemplateSubstitution`; an unterminated
/// brace is kept as literal text rather than failing the action.
pub fn substitute(template: &str, task: &ActionFormattingTask<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let placeholder = &after[..close];
                out.push_str(&resolve_placeholder(placeholder, task)?);
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn resolve_placeholder(placeholder: &str, task: &ActionFormattingTask<'_>) -> Result<String> {
    if placeholder == "actor" {
        return Ok(actor_name(task));
    }
    match task.context_for(placeholder) {
        Some(context) => Ok(target_name(task, context)),
        None => Err(FormatError::TemplateSubstitution {
            action_id: task.action_id.to_string(),
            placeholder: placeholder.to_string(),
        }),
    }
}

/// Player-facing name for the acting entity
pub fn actor_name(task: &ActionFormattingTask<'_>) -> String {
    let base = task
        .names
        .display_name(task.actor)
        .unwrap_or_else(|| task.actor.to_string());
    decorate(task, base, task.actor.as_str())
}

/// Player-facing name for one target context
///
/// The context's own display name is only trusted when the injected visual
/// validator accepts the action's `visual` params (or there is nothing to
/// validate).
pub fn target_name(task: &ActionFormattingTask<'_>, context: &TargetContext) -> String {
    let visual_ok = match (task.options.visual_validator, task.params.get("visual")) {
        (Some(validate), Some(value)) => validate(value),
        _ => true,
    };

    let base = if visual_ok {
        context.display_name.clone()
    } else {
        None
    };
    let base = base
        .or_else(|| task.names.display_name(&context.id))
        .unwrap_or_else(|| context.id.to_string());
    decorate(task, base, context.id.as_str())
}

fn decorate(task: &ActionFormattingTask<'_>, base: String, raw_id: &str) -> String {
    if task.options.debug_names && base != raw_id {
        format!("{} ({})", base, raw_id)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::candidate::{ActionCandidate, ActionDefinition};
    use crate::batch::context::{BatchContext, FormatterOptions, NullDisplayNames};
    use crate::core::types::{EntityId, TargetRoleRegistry};
    use crate::targets::extraction::TargetExtractionResult;
    use crate::task::create_task;

    fn task_fixture<'a>(
        candidate: &'a ActionCandidate,
        context: &BatchContext<'a>,
        targets: &[(&str, &str, Option<&str>)],
    ) -> ActionFormattingTask<'a> {
        let mut normalized = TargetExtractionResult::default();
        for (role, id, name) in targets {
            let mut ctx = TargetContext::new(role.to_string(), EntityId::from(*id));
            ctx.display_name = name.map(|n| n.to_string());
            normalized
                .target_ids
                .insert(role.to_string(), EntityId::from(*id));
            normalized.contexts.push(ctx);
        }
        normalized.primary = normalized.contexts.first().cloned();
        create_task(candidate, normalized, context)
    }

    #[test]
    fn test_substitutes_actor_and_targets() {
        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("give", "Give", "give {primary} to {secondary}"),
        );
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);
        let task = task_fixture(
            &candidate,
            &batch,
            &[
                ("primary", "sword1", Some("Iron Sword")),
                ("secondary", "npc1", None),
            ],
        );

        let out = substitute("{actor}: give {primary} to {secondary}", &task).unwrap();
        assert_eq!(out, "hero: give Iron Sword to npc1");
    }

    #[test]
    fn test_unknown_placeholder_errors() {
        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("give", "Give", ""),
        );
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);
        let task = task_fixture(&candidate, &batch, &[("primary", "npc1", None)]);

        let err = substitute("attack {tertiary}", &task).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TemplateSubstitution { ref placeholder, .. } if placeholder == "tertiary"
        ));
    }

    #[test]
    fn test_unterminated_brace_stays_literal() {
        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("wave", "Wave", ""),
        );
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);
        let task = task_fixture(&candidate, &batch, &[]);

        assert_eq!(substitute("wave {", &task).unwrap(), "wave {");
    }

    #[test]
    fn test_rejected_visual_params_fall_back_to_id() {
        fn reject_all(_: &serde_json::Value) -> bool {
            false
        }

        let candidate = ActionCandidate::new(
            "a1",
            EntityId::from("hero"),
            ActionDefinition::new("poke", "Poke", ""),
        );
        let options = FormatterOptions {
            debug_names: false,
            visual_validator: Some(reject_all),
        };
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let batch = BatchContext::new(&names, &options, &roles);
        let mut task = task_fixture(&candidate, &batch, &[("primary", "npc1", Some("Goblin"))]);
        task.params
            .insert("visual".to_string(), serde_json::json!({"tint": "red"}));

        let out = substitute("poke {primary}", &task).unwrap();
        assert_eq!(out, "poke npc1");
    }
}
