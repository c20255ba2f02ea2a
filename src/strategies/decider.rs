//! Strategy selection
//!
//! First match wins, no backtracking. Per-action metadata outranks batch
//! multi-target metadata even when both are present: it represents more
//! specific authoring intent.

use super::{
    FormattingStrategy, GlobalMultiTargetStrategy, LegacyFallbackFormatter,
    PerActionMetadataStrategy,
};
use crate::task::ActionFormattingTask;

static PER_ACTION: PerActionMetadataStrategy = PerActionMetadataStrategy;
static MULTI_TARGET: GlobalMultiTargetStrategy = GlobalMultiTargetStrategy;
static LEGACY: LegacyFallbackFormatter = LegacyFallbackFormatter;

/// Handle on one of the three strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    PerActionMetadata,
    GlobalMultiTarget,
    LegacyFallback,
}

impl StrategyKind {
    pub fn strategy(&self) -> &'static dyn FormattingStrategy {
        match self {
            StrategyKind::PerActionMetadata => &PER_ACTION,
            StrategyKind::GlobalMultiTarget => &MULTI_TARGET,
            StrategyKind::LegacyFallback => &LEGACY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::PerActionMetadata => "per_action_metadata",
            StrategyKind::GlobalMultiTarget => "global_multi_target",
            StrategyKind::LegacyFallback => "legacy_fallback",
        }
    }
}

/// Chooses exactly one strategy per task
pub struct FormattingDecider;

impl FormattingDecider {
    pub fn select(task: &ActionFormattingTask<'_>) -> StrategyKind {
        if task.has_per_action_metadata() {
            return StrategyKind::PerActionMetadata;
        }
        if task.target_count() > 1 || task.multi_target {
            return StrategyKind::GlobalMultiTarget;
        }
        StrategyKind::LegacyFallback
    }
}
