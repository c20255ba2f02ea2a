//! Batch and action lifecycle instrumentation
//!
//! The coordinator calls the same four methods regardless of whether
//! tracing is active; which variant it holds is decided exactly once,
//! before the batch loop. `NoopInstrumentation` keeps the control path
//! identical when no sink is attached.

use serde::Serialize;
use uuid::Uuid;

use super::accumulator::FormattingStatistics;
use crate::strategies::FormattingResult;
use crate::task::ActionFormattingTask;

/// What the sink learns about a batch before the loop starts
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Fresh id for this run, correlating all events of one batch
    pub batch_id: Uuid,
    pub action_count: usize,
    pub has_batch_targets: bool,
    pub multi_target: bool,
}

/// Structured lifecycle events forwarded to the trace sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceEvent {
    StageStarted {
        batch_id: Uuid,
        action_count: usize,
        has_batch_targets: bool,
        multi_target: bool,
    },
    ActionStarted {
        action_id: String,
        target_count: usize,
    },
    ActionCompleted {
        action_id: String,
        success: bool,
        metadata_source: crate::core::types::MetadataSource,
    },
    StageCompleted {
        statistics: FormattingStatistics,
    },
}

/// External telemetry sink, owned by the caller
pub trait TraceSink {
    /// Whether this sink wants per-action lifecycle events at all
    ///
    /// A sink that answers `false` gets no events: the pipeline runs with
    /// no-op instrumentation instead.
    fn supports_action_capture(&self) -> bool {
        true
    }

    fn capture(&mut self, event: TraceEvent);
}

/// In-memory sink capturing every event; used by tests and the demo
#[derive(Debug, Default)]
pub struct RecordingTraceSink {
    pub events: Vec<TraceEvent>,
}

impl RecordingTraceSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TraceSink for RecordingTraceSink {
    fn capture(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Polymorphic emitter of batch/action lifecycle milestones
pub trait Instrumentation {
    fn stage_started(&mut self, summary: &BatchSummary);
    fn action_started(&mut self, task: &ActionFormattingTask<'_>);
    fn action_completed(&mut self, result: &FormattingResult);
    fn stage_completed(&mut self, statistics: &FormattingStatistics);
}

/// Forwards milestones into the trace sink, counting as it goes
///
/// The counters are self-verification only: events emitted must equal
/// actions seen plus the two stage milestones.
pub struct TraceAwareInstrumentation<'a, 't> {
    sink: &'a mut (dyn TraceSink + 't),
    events_emitted: u64,
    actions_seen: u64,
}

impl<'a, 't> TraceAwareInstrumentation<'a, 't> {
    pub fn new(sink: &'a mut (dyn TraceSink + 't)) -> Self {
        Self {
            sink,
            events_emitted: 0,
            actions_seen: 0,
        }
    }

    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    pub fn actions_seen(&self) -> u64 {
        self.actions_seen
    }

    fn emit(&mut self, event: TraceEvent) {
        self.events_emitted += 1;
        self.sink.capture(event);
    }
}

impl Instrumentation for TraceAwareInstrumentation<'_, '_> {
    fn stage_started(&mut self, summary: &BatchSummary) {
        tracing::debug!(
            batch_id = %summary.batch_id,
            action_count = summary.action_count,
            "formatting stage started"
        );
        self.emit(TraceEvent::StageStarted {
            batch_id: summary.batch_id,
            action_count: summary.action_count,
            has_batch_targets: summary.has_batch_targets,
            multi_target: summary.multi_target,
        });
    }

    fn action_started(&mut self, task: &ActionFormattingTask<'_>) {
        self.actions_seen += 1;
        self.emit(TraceEvent::ActionStarted {
            action_id: task.action_id.to_string(),
            target_count: task.target_count(),
        });
    }

    fn action_completed(&mut self, result: &FormattingResult) {
        self.emit(TraceEvent::ActionCompleted {
            action_id: result.action_id.clone(),
            success: result.success,
            metadata_source: result.metadata_source,
        });
    }

    fn stage_completed(&mut self, statistics: &FormattingStatistics) {
        tracing::debug!(
            total = statistics.total,
            failures = statistics.failure_count,
            "formatting stage completed"
        );
        self.emit(TraceEvent::StageCompleted {
            statistics: *statistics,
        });
    }
}

/// Instrumentation with empty bodies
///
/// Guarantees the coordinator's control flow is identical with tracing
/// off; the coordinator never branches on "is tracing enabled".
pub struct NoopInstrumentation;

impl Instrumentation for NoopInstrumentation {
    fn stage_started(&mut self, _summary: &BatchSummary) {}
    fn action_started(&mut self, _task: &ActionFormattingTask<'_>) {}
    fn action_completed(&mut self, _result: &FormattingResult) {}
    fn stage_completed(&mut self, _statistics: &FormattingStatistics) {}
}

/// One-shot variant selection, done before the batch loop begins
///
/// The sink's own lifetime `'t` is independent of the borrow `'a`, so a
/// long-lived sink can instrument a short-lived batch.
pub fn select_instrumentation<'a, 't: 'a>(
    trace: Option<&'a mut (dyn TraceSink + 't)>,
) -> Box<dyn Instrumentation + 'a> {
    match trace {
        Some(sink) if sink.supports_action_capture() => {
            Box::new(TraceAwareInstrumentation::new(sink))
        }
        _ => Box::new(NoopInstrumentation),
    }
}
