//! Command Forge - Action Formatting Pipeline
//!
//! Converts a batch of candidate game actions, carrying either legacy
//! single-target data or modern multi-target resolution metadata, into
//! final player-facing command strings with per-action accounting and
//! optional trace instrumentation.

pub mod batch;
pub mod core;
pub mod pipeline;
pub mod strategies;
pub mod targets;
pub mod task;

pub use batch::{ActionBatch, ActionCandidate, ActionDefinition, BatchContext, FormatterOptions};
pub use core::{EntityId, FatalBatchError, FormatError, FormatErrorCode, MetadataSource};
pub use pipeline::{format_action_batch, ActionFormattingCoordinator, PipelineResult};
pub use strategies::FormattingResult;
