//! Per-action formatting payload
//!
//! One `ActionFormattingTask` is assembled per candidate from the
//! normalized targets plus batch context, then handed read-only to the
//! decider and the chosen strategy.

use ahash::AHashMap;
use serde_json::Value;

use crate::batch::candidate::{ActionCandidate, ActionDefinition, ActionMetadata};
use crate::batch::context::{BatchContext, DisplayNameResolver, FormatterOptions};
use crate::core::types::EntityId;
use crate::targets::extraction::{TargetContext, TargetExtractionResult};

/// Self-contained payload for formatting one action
///
/// Built once, never mutated; strategies read it and return a fresh
/// result object.
pub struct ActionFormattingTask<'a> {
    pub action_id: &'a str,
    pub actor: &'a EntityId,
    pub action: &'a ActionDefinition,
    /// Canonically ordered target contexts from normalization
    pub target_contexts: Vec<TargetContext>,
    pub params: AHashMap<String, Value>,
    pub primary: Option<TargetContext>,
    pub per_action_metadata: Option<&'a ActionMetadata>,
    /// Batch-level legacy map, retained for strategies that still need it
    pub batch_targets: Option<&'a AHashMap<String, EntityId>>,
    pub options: &'a FormatterOptions,
    pub names: &'a dyn DisplayNameResolver,
    /// Multi-target metadata, per-action or batch-level
    pub multi_target: bool,
}

impl<'a> ActionFormattingTask<'a> {
    pub fn target_count(&self) -> usize {
        self.target_contexts.len()
    }

    pub fn has_per_action_metadata(&self) -> bool {
        self.per_action_metadata
            .map(|m| !m.is_empty())
            .unwrap_or(false)
    }

    pub fn context_for(&self, placeholder: &str) -> Option<&TargetContext> {
        self.target_contexts
            .iter()
            .find(|c| c.placeholder == placeholder)
    }
}

/// Assemble the task for one candidate
///
/// Pure and infallible: incomplete inputs become empty or absent fields,
/// which downstream components read as "not applicable".
pub fn create_task<'a>(
    candidate: &'a ActionCandidate,
    normalized: TargetExtractionResult,
    context: &BatchContext<'a>,
) -> ActionFormattingTask<'a> {
    // A present, non-empty resolved set is modern-shape metadata even when
    // it carries a single role; only the absent case falls back to legacy.
    let per_action_multi = candidate
        .resolved_targets
        .as_ref()
        .map(|set| set.multi_target || !set.roles.is_empty())
        .unwrap_or(false);

    ActionFormattingTask {
        action_id: &candidate.action_id,
        actor: &candidate.actor_id,
        action: &candidate.action,
        target_contexts: normalized.contexts,
        params: normalized.params,
        primary: normalized.primary,
        per_action_metadata: candidate.per_action_metadata.as_ref(),
        batch_targets: context.batch_targets,
        options: context.options,
        names: context.names,
        multi_target: context.multi_target || per_action_multi,
    }
}
