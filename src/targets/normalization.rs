//! Target normalization - collapses every input shape into one canonical form
//!
//! The pipeline accepts three target shapes: already-normalized results
//! (pass through untouched), the modern role-keyed `ResolvedTargetSet`, and
//! the legacy placeholder map (candidate-scoped or batch-scoped). This
//! service is the only place shape detection happens; everything downstream
//! reads `TargetExtractionResult` and nothing else.

use ahash::AHashMap;
use serde_json::Value;

use crate::batch::candidate::ActionCandidate;
use crate::core::error::{FormatError, Result};
use crate::core::types::{EntityId, TargetRoleRegistry};
use crate::targets::extraction::{ResolvedTargetSet, TargetContext, TargetExtractionResult};

/// Converts raw candidate target data into `TargetExtractionResult`
pub struct TargetNormalizationService<'a> {
    roles: &'a TargetRoleRegistry,
}

impl<'a> TargetNormalizationService<'a> {
    pub fn new(roles: &'a TargetRoleRegistry) -> Self {
        Self { roles }
    }

    /// Normalize one candidate, consulting the batch-level legacy map as
    /// the shape of last resort
    ///
    /// Errors are returned as values so the coordinator can record a
    /// per-action failure without aborting the batch.
    pub fn normalize(
        &self,
        candidate: &ActionCandidate,
        batch_targets: Option<&AHashMap<String, EntityId>>,
    ) -> Result<TargetExtractionResult> {
        // Already-canonical input passes through unchanged (idempotent)
        if let Some(normalized) = &candidate.normalized {
            return Ok(normalized.clone());
        }

        if let Some(set) = &candidate.resolved_targets {
            if let Some(legacy) = &candidate.legacy_targets {
                self.check_conflict(&candidate.action_id, set, legacy)?;
            }
            if !set.is_empty() {
                return Ok(self.from_resolved_set(set));
            }
            // An empty resolved set carries no ids; fall through to the
            // legacy shapes before declaring the target missing.
        }

        let legacy_map = candidate.legacy_targets.as_ref().or(batch_targets);
        if let Some(map) = legacy_map {
            if !map.is_empty() {
                return Ok(self.from_legacy_map(map));
            }
        }

        Err(FormatError::MissingTarget(candidate.action_id.clone()))
    }

    /// Both shapes present is legal only while they agree; disagreement on
    /// any placeholder means the candidate was assembled inconsistently
    fn check_conflict(
        &self,
        action_id: &str,
        set: &ResolvedTargetSet,
        legacy: &AHashMap<String, EntityId>,
    ) -> Result<()> {
        for (placeholder, id) in legacy {
            if let Some(resolved) = set.get(placeholder) {
                if &resolved.id != id {
                    return Err(FormatError::MalformedTarget {
                        action_id: action_id.to_string(),
                        placeholder: placeholder.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn from_resolved_set(&self, set: &ResolvedTargetSet) -> TargetExtractionResult {
        // Canonical order: registry position first, authored order second
        let mut ordered: Vec<(usize, usize)> = set
            .roles
            .iter()
            .enumerate()
            .map(|(authored, target)| (self.roles.ordering(&target.role), authored))
            .collect();
        ordered.sort();

        let mut target_ids = AHashMap::default();
        let mut params: AHashMap<String, Value> = AHashMap::default();
        let mut contexts = Vec::with_capacity(set.roles.len());

        for &(_, authored) in &ordered {
            let target = &set.roles[authored];
            target_ids.insert(target.role.clone(), target.id.clone());
            for (key, value) in &target.params {
                params.insert(key.clone(), value.clone());
            }
            let mut context = TargetContext::new(target.role.clone(), target.id.clone());
            context.display_name = target.display_name.clone();
            contexts.push(context);
        }

        let primary = set
            .roles
            .iter()
            .find(|t| t.is_primary)
            .map(|t| t.role.clone())
            .or_else(|| {
                self.roles
                    .default_primary()
                    .filter(|role| set.get(role).is_some())
                    .map(|role| role.to_string())
            });
        let primary = match primary {
            Some(role) => contexts.iter().find(|c| c.role == role).cloned(),
            None => contexts.first().cloned(),
        };

        TargetExtractionResult {
            target_ids,
            params,
            primary,
            contexts,
            legacy: false,
        }
    }

    fn from_legacy_map(&self, map: &AHashMap<String, EntityId>) -> TargetExtractionResult {
        let target_ids: AHashMap<String, EntityId> = map.clone();

        // Deterministic primary pick: the conventional `target` slot, then
        // the registry primary, then the lexicographically first key
        let key = if map.contains_key("target") {
            Some("target".to_string())
        } else {
            self.roles
                .default_primary()
                .filter(|role| map.contains_key(*role))
                .map(|role| role.to_string())
                .or_else(|| map.keys().min().cloned())
        };

        let primary = key.map(|key| {
            let id = map[&key].clone();
            TargetContext::new(key, id)
        });
        let contexts = primary.clone().into_iter().collect();

        TargetExtractionResult {
            target_ids,
            params: AHashMap::default(),
            primary,
            contexts,
            legacy: true,
        }
    }
}
