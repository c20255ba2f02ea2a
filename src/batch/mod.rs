//! Upstream input shapes and batch-scoped context

pub mod candidate;
pub mod context;

pub use candidate::{ActionBatch, ActionCandidate, ActionDefinition, ActionMetadata};
pub use context::{
    BatchContext, DisplayNameResolver, FormatterOptions, NullDisplayNames, VisualPropertyValidator,
};
