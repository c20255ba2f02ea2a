//! Batch-scoped ledger of formatting outcomes
//!
//! Pure data: the accumulator references no other component and is
//! constructed fresh per batch, so nothing leaks across runs. Statistics
//! are recomputed from the result sequence on every call, never cached,
//! so mid-batch reads (instrumentation payloads) always see the latest
//! state.

use serde::{Deserialize, Serialize};

use crate::core::error::FormatErrorCode;
use crate::core::types::MetadataSource;
use crate::strategies::FormattingResult;

/// One failed action, as exposed in `PipelineResult.failed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub action_id: String,
    pub error: FormatErrorCode,
}

/// Aggregate counts over a batch, derived on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormattingStatistics {
    pub total: usize,
    pub per_action: usize,
    pub global_multi_target: usize,
    pub legacy: usize,
    pub failure_count: usize,
    pub failure_rate: f64,
}

/// Ordered ledger of per-action results for one batch
#[derive(Debug, Default)]
pub struct FormattingAccumulator {
    results: Vec<FormattingResult>,
}

impl FormattingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one result, success or failure, preserving batch order
    pub fn register_action(&mut self, result: FormattingResult) {
        self.results.push(result);
    }

    /// Convenience for failures that never produced a result object
    pub fn record_failure(&mut self, action_id: impl Into<String>, error: FormatErrorCode) {
        self.register_action(FormattingResult::failure(
            action_id,
            MetadataSource::Legacy,
            0,
            error,
        ));
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Derived statistics over everything registered so far
    pub fn statistics(&self) -> FormattingStatistics {
        let total = self.results.len();
        let mut per_action = 0;
        let mut global_multi_target = 0;
        let mut legacy = 0;
        let mut failure_count = 0;

        for result in &self.results {
            if !result.success {
                failure_count += 1;
                continue;
            }
            match result.metadata_source {
                MetadataSource::PerAction => per_action += 1,
                MetadataSource::GlobalMultiTarget => global_multi_target += 1,
                MetadataSource::Legacy => legacy += 1,
            }
        }

        let failure_rate = if total == 0 {
            0.0
        } else {
            failure_count as f64 / total as f64
        };

        FormattingStatistics {
            total,
            per_action,
            global_multi_target,
            legacy,
            failure_count,
            failure_rate,
        }
    }

    /// Consume the ledger into the externally visible result
    pub fn into_pipeline_result(self) -> super::coordinator::PipelineResult {
        let statistics = self.statistics();
        let failed = self
            .results
            .iter()
            .filter(|r| !r.success)
            .map(|r| FailureRecord {
                action_id: r.action_id.clone(),
                // A failed result always carries its code
                error: r.error.unwrap_or(FormatErrorCode::Formatter),
            })
            .collect();

        super::coordinator::PipelineResult {
            actions: self.results,
            statistics,
            failed,
        }
    }
}
