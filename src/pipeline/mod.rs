//! Batch orchestration: accumulator, instrumentation, coordinator
//!
//! Candidate batch -> TargetNormalizationService -> task factory ->
//! FormattingDecider -> strategy -> FormattingAccumulator -> PipelineResult

pub mod accumulator;
pub mod coordinator;
pub mod instrumentation;

pub use accumulator::{FailureRecord, FormattingAccumulator, FormattingStatistics};
pub use coordinator::{ActionFormattingCoordinator, PipelineResult};
pub use instrumentation::{
    BatchSummary, Instrumentation, NoopInstrumentation, RecordingTraceSink,
    TraceAwareInstrumentation, TraceEvent, TraceSink,
};

use crate::batch::candidate::ActionCandidate;
use crate::batch::context::BatchContext;
use crate::core::error::FatalBatchError;

/// Format a whole candidate batch in one call
pub fn format_action_batch<'a, 't: 'a>(
    candidates: &'a [ActionCandidate],
    context: BatchContext<'a>,
    trace: Option<&'a mut (dyn TraceSink + 't)>,
) -> std::result::Result<PipelineResult, FatalBatchError> {
    ActionFormattingCoordinator::new(candidates, context, trace).run()
}
