//! Core type definitions used throughout the formatting pipeline

use serde::{Deserialize, Serialize};

/// Opaque identifier for an entity resolved by the upstream target pipeline
///
/// The formatter never inspects the id beyond equality and display; it is
/// whatever the upstream resolver handed us.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self(String::new())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which strategy produced a formatted result
///
/// Carried on every result for statistics and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataSource {
    /// Rendered from metadata attached directly to the candidate
    PerAction,
    /// Rendered from the full ordered multi-target contexts
    GlobalMultiTarget,
    /// Rendered through the single-target legacy template shape
    Legacy,
}

impl MetadataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataSource::PerAction => "per-action",
            MetadataSource::GlobalMultiTarget => "global-multi-target",
            MetadataSource::Legacy => "legacy",
        }
    }
}

/// Ordered registry of target role names
///
/// Replaces hard-coded primary/secondary/tertiary literals that would
/// otherwise be duplicated across normalization and strategy selection.
/// The first role is the default primary; ordering here defines the
/// canonical ordering of target contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRoleRegistry {
    roles: Vec<String>,
}

impl TargetRoleRegistry {
    pub fn new(roles: Vec<String>) -> Self {
        Self { roles }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// The role treated as primary when no target is explicitly flagged
    pub fn default_primary(&self) -> Option<&str> {
        self.roles.first().map(|r| r.as_str())
    }

    /// Canonical position of a role; unknown roles sort after known ones
    pub fn ordering(&self, role: &str) -> usize {
        self.roles
            .iter()
            .position(|r| r == role)
            .unwrap_or(self.roles.len())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.as_str())
    }
}

impl Default for TargetRoleRegistry {
    fn default() -> Self {
        Self {
            roles: vec![
                "primary".to_string(),
                "secondary".to_string(),
                "tertiary".to_string(),
            ],
        }
    }
}
