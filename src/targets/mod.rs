//! Target shapes and the normalization boundary
//!
//! Shape detection lives entirely in `normalization`; `extraction` holds
//! the canonical value objects the rest of the pipeline consumes.

pub mod extraction;
pub mod normalization;

pub use extraction::{ResolvedTarget, ResolvedTargetSet, TargetContext, TargetExtractionResult};
pub use normalization::TargetNormalizationService;
