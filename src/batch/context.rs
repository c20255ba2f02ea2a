//! Batch-level context handed to the coordinator
//!
//! Everything here is owned by the caller and borrowed for the duration of
//! one `run()`: the legacy batch target map (when the upstream producer
//! still speaks that convention), name-resolution helpers, and formatter
//! options.

use ahash::AHashMap;
use serde_json::Value;

use crate::core::types::{EntityId, TargetRoleRegistry};

/// Resolves an entity id to a player-facing display name
///
/// Implemented by the host's entity store. Formatting falls back to the
/// raw id when no name is available.
pub trait DisplayNameResolver {
    fn display_name(&self, id: &EntityId) -> Option<String>;
}

/// Resolver that knows no names; every lookup falls back to the raw id
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplayNames;

impl DisplayNameResolver for NullDisplayNames {
    fn display_name(&self, _id: &EntityId) -> Option<String> {
        None
    }
}

/// Validates an action's `visual` params before display names are trusted
///
/// Hosts inject this to reject stale or malformed visual data; targets of
/// a rejected action render through their ids instead of their display
/// contexts.
pub type VisualPropertyValidator = fn(&Value) -> bool;

/// Formatter tunables inherited by every task in a batch
///
/// These values shape output text only; they never affect which strategy
/// runs or whether an action succeeds.
#[derive(Debug, Clone, Default)]
pub struct FormatterOptions {
    /// Append the raw entity id after display names ("Goblin (npc1)")
    ///
    /// Intended for developer-facing logs; player-facing output leaves
    /// this off.
    pub debug_names: bool,

    /// Optional guard over the action's `visual` params (see
    /// `VisualPropertyValidator`)
    pub visual_validator: Option<VisualPropertyValidator>,
}

/// Everything the coordinator needs beyond the candidates themselves
pub struct BatchContext<'a> {
    /// Batch-level legacy placeholder -> entity map, when present
    pub batch_targets: Option<&'a AHashMap<String, EntityId>>,
    /// Batch-level multi-target metadata flag from the upstream resolver
    pub multi_target: bool,
    pub names: &'a dyn DisplayNameResolver,
    pub options: &'a FormatterOptions,
    pub roles: &'a TargetRoleRegistry,
}

impl<'a> BatchContext<'a> {
    pub fn new(
        names: &'a dyn DisplayNameResolver,
        options: &'a FormatterOptions,
        roles: &'a TargetRoleRegistry,
    ) -> Self {
        Self {
            batch_targets: None,
            multi_target: false,
            names,
            options,
            roles,
        }
    }

    pub fn with_batch_targets(mut self, targets: &'a AHashMap<String, EntityId>) -> Self {
        self.batch_targets = Some(targets);
        self
    }

    pub fn with_multi_target(mut self, multi_target: bool) -> Self {
        self.multi_target = multi_target;
        self
    }
}
