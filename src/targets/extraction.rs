//! Canonical target value objects
//!
//! `TargetExtractionResult` is the single shape every input form is
//! normalized into. Upstream resolvers speak either the modern
//! role-keyed `ResolvedTargetSet` or the legacy placeholder map; after
//! normalization the rest of the pipeline only ever sees these types.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::EntityId;

/// One resolved target role from the modern multi-target shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub role: String,
    pub id: EntityId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub params: AHashMap<String, Value>,
}

/// Modern per-action target shape: named roles plus multi-target metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedTargetSet {
    pub roles: Vec<ResolvedTarget>,
    pub multi_target: bool,
}

impl ResolvedTargetSet {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn get(&self, role: &str) -> Option<&ResolvedTarget> {
        self.roles.iter().find(|t| t.role == role)
    }
}

/// Wire representations accepted for a resolved target set
///
/// Upstream producers send either a plain role-keyed object
/// (`{"primary": {"id": "npc1"}}`) or the explicit
/// `{"roles": [...], "multi_target": bool}` form. The role-map arm must
/// be tried first: the explicit form only survives it because `roles`
/// and `multi_target` values fail to parse as role entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResolvedTargetSetRepr {
    RoleMap(AHashMap<String, RoleEntry>),
    Explicit {
        #[serde(default)]
        roles: Vec<ResolvedTarget>,
        #[serde(default)]
        multi_target: bool,
    },
}

#[derive(Deserialize)]
struct RoleEntry {
    id: EntityId,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    is_primary: bool,
    #[serde(default)]
    params: AHashMap<String, Value>,
}

impl<'de> Deserialize<'de> for ResolvedTargetSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match ResolvedTargetSetRepr::deserialize(deserializer)? {
            ResolvedTargetSetRepr::RoleMap(map) => {
                let mut roles: Vec<ResolvedTarget> = map
                    .into_iter()
                    .map(|(role, entry)| ResolvedTarget {
                        role,
                        id: entry.id,
                        display_name: entry.display_name,
                        is_primary: entry.is_primary,
                        params: entry.params,
                    })
                    .collect();
                // Map iteration order is arbitrary; keep ingestion deterministic
                roles.sort_by(|a, b| a.role.cmp(&b.role));
                let multi_target = roles.len() > 1;
                Ok(ResolvedTargetSet { roles, multi_target })
            }
            ResolvedTargetSetRepr::Explicit { roles, multi_target } => {
                Ok(ResolvedTargetSet { roles, multi_target })
            }
        }
    }
}

/// One target as seen by formatting: role, template placeholder, entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetContext {
    pub role: String,
    /// Template slot this target substitutes into (usually the role name)
    pub placeholder: String,
    pub id: EntityId,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl TargetContext {
    pub fn new(role: impl Into<String>, id: EntityId) -> Self {
        let role = role.into();
        Self {
            placeholder: role.clone(),
            role,
            id,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Canonical normalized target data for one action
///
/// Produced exclusively by `TargetNormalizationService`; read-only
/// everywhere else. Identical regardless of which input shape it came
/// from, except for the `legacy` marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetExtractionResult {
    /// Placeholder -> entity id, for template substitution
    pub target_ids: AHashMap<String, EntityId>,
    /// Loose parameters merged from per-target metadata
    #[serde(default)]
    pub params: AHashMap<String, Value>,
    /// The context treated as the action's primary target
    #[serde(default)]
    pub primary: Option<TargetContext>,
    /// All contexts in canonical (registry, then authored) order
    #[serde(default)]
    pub contexts: Vec<TargetContext>,
    /// True when derived from the legacy single-target shape
    #[serde(default)]
    pub legacy: bool,
}

impl TargetExtractionResult {
    pub fn target_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_map_shape_deserializes() {
        let set: ResolvedTargetSet = serde_json::from_value(json!({
            "primary": { "id": "npc1", "is_primary": true },
            "secondary": { "id": "npc2" }
        }))
        .unwrap();

        assert_eq!(set.roles.len(), 2);
        assert!(set.multi_target);
        assert_eq!(set.get("primary").unwrap().id, EntityId::from("npc1"));
        assert!(set.get("primary").unwrap().is_primary);
    }

    #[test]
    fn test_explicit_shape_deserializes() {
        let set: ResolvedTargetSet = serde_json::from_value(json!({
            "roles": [
                { "role": "primary", "id": "npc1" }
            ],
            "multi_target": false
        }))
        .unwrap();

        assert_eq!(set.roles.len(), 1);
        assert!(!set.multi_target);
    }

    #[test]
    fn test_empty_object_is_empty_set() {
        let set: ResolvedTargetSet = serde_json::from_value(json!({})).unwrap();
        assert!(set.is_empty());
    }
}
