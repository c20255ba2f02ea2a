//! Candidate actions as handed over by the upstream resolution pipeline
//!
//! Candidates arrive duck-typed: some carry the modern `resolved_targets`
//! shape, some only a legacy placeholder map, some are already normalized.
//! All of those live side by side as optional fields so normalization can
//! detect conflicts instead of silently preferring one shape.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::FatalBatchError;
use crate::core::types::EntityId;
use crate::targets::extraction::{ResolvedTargetSet, TargetExtractionResult};

/// Static definition of an action: id, display name, command template
///
/// Templates carry `{placeholder}` slots. Modern templates name target
/// roles (`{primary}`, `{secondary}`); legacy templates use the single
/// `{target}` slot. `{actor}` is always substitutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub template: String,
}

impl ActionDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template: template.into(),
        }
    }
}

/// Per-action rendering hints attached directly by the author
///
/// Open-ended key/value bag; the per-action strategy reads the keys it
/// understands (`command`, `template`) and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionMetadata {
    #[serde(flatten)]
    pub entries: AHashMap<String, Value>,
}

impl ActionMetadata {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_str())
    }
}

/// One candidate action from the upstream resolver
///
/// Immutable once produced. Exactly one `FormattingResult` comes out of
/// the pipeline for every candidate that goes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCandidate {
    #[serde(default)]
    pub action_id: String,
    #[serde(default)]
    pub actor_id: EntityId,
    #[serde(default)]
    pub action: ActionDefinition,
    /// Modern multi-target resolution data, when present
    #[serde(default)]
    pub resolved_targets: Option<ResolvedTargetSet>,
    /// Candidate-scoped legacy placeholder -> entity map, when present
    #[serde(default)]
    pub legacy_targets: Option<AHashMap<String, EntityId>>,
    /// Already-canonical target data (idempotent pass-through)
    #[serde(default)]
    pub normalized: Option<TargetExtractionResult>,
    #[serde(default)]
    pub per_action_metadata: Option<ActionMetadata>,
}

impl Default for ActionCandidate {
    fn default() -> Self {
        Self {
            action_id: String::new(),
            actor_id: EntityId(String::new()),
            action: ActionDefinition::default(),
            resolved_targets: None,
            legacy_targets: None,
            normalized: None,
            per_action_metadata: None,
        }
    }
}

impl ActionCandidate {
    pub fn new(action_id: impl Into<String>, actor_id: EntityId, action: ActionDefinition) -> Self {
        Self {
            action_id: action_id.into(),
            actor_id,
            action,
            ..Self::default()
        }
    }

    pub fn has_per_action_metadata(&self) -> bool {
        self.per_action_metadata
            .as_ref()
            .map(|m| !m.is_empty())
            .unwrap_or(false)
    }
}

/// A full candidate batch, validated to be iterable
#[derive(Debug, Clone, Default)]
pub struct ActionBatch {
    candidates: Vec<ActionCandidate>,
}

impl ActionBatch {
    pub fn from_candidates(candidates: Vec<ActionCandidate>) -> Self {
        Self { candidates }
    }

    /// Lenient ingestion of a duck-typed upstream payload
    ///
    /// A payload that is not an array is the one fatal shape: there is no
    /// batch to iterate. Individual elements that fail to parse degrade
    /// into empty candidates whose missing targets surface later as
    /// per-action failures, keeping single-element damage non-fatal.
    pub fn from_value(payload: Value) -> std::result::Result<Self, FatalBatchError> {
        let elements = match payload {
            Value::Array(elements) => elements,
            other => {
                return Err(FatalBatchError::NotIterable(format!(
                    "expected an array of candidates, got {}",
                    json_type_name(&other)
                )));
            }
        };

        let candidates = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                serde_json::from_value(element).unwrap_or_else(|err| {
                    tracing::debug!(index, %err, "discarding unparseable candidate element");
                    ActionCandidate {
                        action_id: format!("invalid-{index}"),
                        ..ActionCandidate::default()
                    }
                })
            })
            .collect();

        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[ActionCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
