//! One pass over the candidate batch
//!
//! For each candidate: normalize -> build task -> decide -> format, with a
//! single retry through the legacy fallback when the chosen strategy
//! fails. Per-action errors are recorded and skipped over; only a
//! malformed batch aborts before the loop.

use serde::Serialize;
use uuid::Uuid;

use super::accumulator::{FailureRecord, FormattingAccumulator, FormattingStatistics};
use super::instrumentation::{select_instrumentation, BatchSummary, Instrumentation, TraceSink};
use crate::batch::candidate::ActionCandidate;
use crate::batch::context::BatchContext;
use crate::core::error::FatalBatchError;
use crate::core::types::MetadataSource;
use crate::strategies::{FormattingDecider, FormattingResult, StrategyKind};
use crate::targets::normalization::TargetNormalizationService;
use crate::task::create_task;

/// Externally visible output of one batch run
///
/// `actions` ordering always equals the input batch ordering: every
/// candidate produces exactly one entry regardless of the path taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub actions: Vec<FormattingResult>,
    pub statistics: FormattingStatistics,
    pub failed: Vec<FailureRecord>,
}

/// Builds the fresh per-batch accumulator, injected so callers can audit
/// or wrap the ledger without touching the coordinator
pub type AccumulatorFactory = fn() -> FormattingAccumulator;

/// Orchestrates normalization, task assembly, strategy selection and
/// accounting for one batch
pub struct ActionFormattingCoordinator<'a> {
    candidates: &'a [ActionCandidate],
    context: BatchContext<'a>,
    instrumentation: Box<dyn Instrumentation + 'a>,
    accumulator_factory: AccumulatorFactory,
}

impl<'a> ActionFormattingCoordinator<'a> {
    /// Instrumentation is chosen here, once, from the sink's capabilities;
    /// the batch loop never branches on tracing. The sink may outlive the
    /// batch data: only its borrow is tied to this run.
    pub fn new<'t: 'a>(
        candidates: &'a [ActionCandidate],
        context: BatchContext<'a>,
        trace: Option<&'a mut (dyn TraceSink + 't)>,
    ) -> Self {
        Self {
            candidates,
            context,
            instrumentation: select_instrumentation(trace),
            accumulator_factory: FormattingAccumulator::new,
        }
    }

    pub fn with_accumulator_factory(mut self, factory: AccumulatorFactory) -> Self {
        self.accumulator_factory = factory;
        self
    }

    /// Process the whole batch to completion
    pub fn run(mut self) -> std::result::Result<PipelineResult, FatalBatchError> {
        if self.context.roles.is_empty() {
            return Err(FatalBatchError::MissingContext(
                "target role registry is empty".to_string(),
            ));
        }

        let summary = BatchSummary {
            batch_id: Uuid::new_v4(),
            action_count: self.candidates.len(),
            has_batch_targets: self.context.batch_targets.is_some(),
            multi_target: self.context.multi_target,
        };
        self.instrumentation.stage_started(&summary);

        let normalizer = TargetNormalizationService::new(self.context.roles);
        let mut accumulator = (self.accumulator_factory)();

        for candidate in self.candidates {
            let normalized = match normalizer.normalize(candidate, self.context.batch_targets) {
                Ok(normalized) => normalized,
                Err(err) => {
                    tracing::debug!(
                        action_id = %candidate.action_id,
                        %err,
                        "target normalization failed"
                    );
                    // No task exists, so there is no action_started here;
                    // sinks still observe exactly one terminal event
                    let result = FormattingResult::failure(
                        candidate.action_id.clone(),
                        MetadataSource::Legacy,
                        0,
                        err.code(),
                    );
                    self.instrumentation.action_completed(&result);
                    accumulator.register_action(result);
                    continue;
                }
            };

            let task = create_task(candidate, normalized, &self.context);
            self.instrumentation.action_started(&task);

            let kind = FormattingDecider::select(&task);
            let result = match kind.strategy().format(&task) {
                Ok(result) => result,
                Err(err) => {
                    tracing::debug!(
                        action_id = task.action_id,
                        strategy = kind.as_str(),
                        %err,
                        "formatting strategy failed"
                    );
                    if kind != StrategyKind::LegacyFallback {
                        // Single-attempt fallback; a fallback failure is
                        // final and reported with the fallback's code
                        match StrategyKind::LegacyFallback.strategy().format(&task) {
                            Ok(result) => result,
                            Err(fallback_err) => FormattingResult::failure(
                                task.action_id,
                                MetadataSource::Legacy,
                                task.target_count(),
                                fallback_err.code(),
                            ),
                        }
                    } else {
                        FormattingResult::failure(
                            task.action_id,
                            MetadataSource::Legacy,
                            task.target_count(),
                            err.code(),
                        )
                    }
                }
            };

            self.instrumentation.action_completed(&result);
            accumulator.register_action(result);
        }

        let statistics = accumulator.statistics();
        self.instrumentation.stage_completed(&statistics);

        Ok(accumulator.into_pipeline_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::candidate::ActionDefinition;
    use crate::batch::context::{FormatterOptions, NullDisplayNames};
    use crate::core::error::FormatErrorCode;
    use crate::core::types::{EntityId, TargetRoleRegistry};
    use crate::targets::extraction::{ResolvedTarget, ResolvedTargetSet};
    use ahash::AHashMap;

    fn resolved_candidate(action_id: &str, template: &str, roles: &[(&str, &str)]) -> ActionCandidate {
        let mut c = ActionCandidate::new(
            action_id,
            EntityId::from("hero"),
            ActionDefinition::new(action_id, action_id, template),
        );
        c.resolved_targets = Some(ResolvedTargetSet {
            roles: roles
                .iter()
                .map(|(role, id)| ResolvedTarget {
                    role: role.to_string(),
                    id: EntityId::from(*id),
                    display_name: None,
                    is_primary: false,
                    params: AHashMap::default(),
                })
                .collect(),
            multi_target: roles.len() > 1,
        });
        c
    }

    #[test]
    fn test_empty_role_registry_is_fatal() {
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::new(Vec::new());
        let names = NullDisplayNames;
        let context = BatchContext::new(&names, &options, &roles);

        let err = ActionFormattingCoordinator::new(&[], context, None)
            .run()
            .unwrap_err();
        assert!(matches!(err, FatalBatchError::MissingContext(_)));
    }

    #[test]
    fn test_accumulator_factory_builds_fresh_ledger_per_run() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static FACTORY_CALLS: AtomicUsize = AtomicUsize::new(0);

        fn counting_factory() -> FormattingAccumulator {
            FACTORY_CALLS.fetch_add(1, Ordering::SeqCst);
            FormattingAccumulator::new()
        }

        let candidates = vec![resolved_candidate("a1", "poke {primary}", &[("primary", "npc1")])];
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;

        for _ in 0..2 {
            let context = BatchContext::new(&names, &options, &roles);
            let result = ActionFormattingCoordinator::new(&candidates, context, None)
                .with_accumulator_factory(counting_factory)
                .run()
                .unwrap();
            // No leakage: each run sees exactly its own batch
            assert_eq!(result.actions.len(), 1);
        }
        assert_eq!(FACTORY_CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_multi_target_degrades_to_legacy() {
        // Template names a secondary that was never resolved; the
        // multi-target strategy fails and the fallback renders the primary
        let candidates = vec![resolved_candidate(
            "a1",
            "give {primary} to {secondary}",
            &[("primary", "npc1")],
        )];
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let mut context = BatchContext::new(&names, &options, &roles);
        context.multi_target = true;

        let result = ActionFormattingCoordinator::new(&candidates, context, None)
            .run()
            .unwrap();

        assert_eq!(result.actions.len(), 1);
        let action = &result.actions[0];
        assert!(action.success);
        assert_eq!(action.metadata_source, MetadataSource::Legacy);
        assert_eq!(action.command, "give npc1 to npc1");
    }

    #[test]
    fn test_fallback_failure_reports_fallback_code() {
        // No template at all: the multi-target strategy and the fallback
        // both fail, and the recorded code is the fallback's Formatter
        let candidates = vec![resolved_candidate(
            "a1",
            "",
            &[("primary", "npc1"), ("secondary", "npc2")],
        )];
        let options = FormatterOptions::default();
        let roles = TargetRoleRegistry::default();
        let names = NullDisplayNames;
        let context = BatchContext::new(&names, &options, &roles);

        let result = ActionFormattingCoordinator::new(&candidates, context, None)
            .run()
            .unwrap();

        assert!(!result.actions[0].success);
        assert_eq!(result.actions[0].error, Some(FormatErrorCode::Formatter));
        assert_eq!(result.failed.len(), 1);
    }
}
