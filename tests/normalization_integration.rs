//! Shape equivalence and error taxonomy for target normalization

use ahash::AHashMap;

use command_forge::core::types::TargetRoleRegistry;
use command_forge::targets::extraction::{ResolvedTarget, ResolvedTargetSet, TargetExtractionResult};
use command_forge::targets::normalization::TargetNormalizationService;
use command_forge::{ActionCandidate, ActionDefinition, EntityId, FormatError};

fn candidate(action_id: &str) -> ActionCandidate {
    ActionCandidate::new(
        action_id,
        EntityId::from("hero"),
        ActionDefinition::new("attack", "Attack", "attack {target}"),
    )
}

fn single_resolved(role: &str, id: &str) -> ResolvedTargetSet {
    ResolvedTargetSet {
        roles: vec![ResolvedTarget {
            role: role.to_string(),
            id: EntityId::from(id),
            display_name: None,
            is_primary: true,
            params: AHashMap::default(),
        }],
        multi_target: false,
    }
}

#[test]
fn test_legacy_and_modern_shapes_yield_identical_target_ids() {
    let registry = TargetRoleRegistry::default();
    let service = TargetNormalizationService::new(&registry);

    let mut modern = candidate("a1");
    modern.resolved_targets = Some(single_resolved("target", "npc1"));

    let mut legacy = candidate("a1");
    let mut map = AHashMap::default();
    map.insert("target".to_string(), EntityId::from("npc1"));
    legacy.legacy_targets = Some(map);

    let from_modern = service.normalize(&modern, None).unwrap();
    let from_legacy = service.normalize(&legacy, None).unwrap();

    assert_eq!(
        from_modern.target_ids, from_legacy.target_ids,
        "equivalent data must normalize to the same target ids"
    );
    assert_eq!(
        from_modern.primary.as_ref().map(|c| &c.id),
        from_legacy.primary.as_ref().map(|c| &c.id)
    );
}

#[test]
fn test_normalize_is_idempotent_on_canonical_input() {
    let registry = TargetRoleRegistry::default();
    let service = TargetNormalizationService::new(&registry);

    let mut c = candidate("a1");
    c.resolved_targets = Some(single_resolved("primary", "npc1"));
    let first = service.normalize(&c, None).unwrap();

    let mut passthrough = candidate("a1");
    passthrough.normalized = Some(first.clone());
    let second = service.normalize(&passthrough, None).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_pass_through_wins_over_other_shapes() {
    // A candidate that carries a canonical result alongside raw shapes
    // must return the canonical result untouched
    let registry = TargetRoleRegistry::default();
    let service = TargetNormalizationService::new(&registry);

    let mut canonical = TargetExtractionResult::default();
    canonical
        .target_ids
        .insert("primary".to_string(), EntityId::from("kept"));

    let mut c = candidate("a1");
    c.normalized = Some(canonical.clone());
    c.resolved_targets = Some(single_resolved("primary", "ignored"));

    let result = service.normalize(&c, None).unwrap();
    assert_eq!(result, canonical);
}

#[test]
fn test_missing_everything_is_missing_target() {
    let registry = TargetRoleRegistry::default();
    let service = TargetNormalizationService::new(&registry);

    let err = service.normalize(&candidate("a9"), None).unwrap_err();
    assert!(matches!(err, FormatError::MissingTarget(id) if id == "a9"));
}

#[test]
fn test_conflicting_shapes_name_the_placeholder() {
    let registry = TargetRoleRegistry::default();
    let service = TargetNormalizationService::new(&registry);

    let mut c = candidate("a1");
    c.resolved_targets = Some(single_resolved("primary", "npc1"));
    let mut map = AHashMap::default();
    map.insert("primary".to_string(), EntityId::from("npc8"));
    c.legacy_targets = Some(map);

    match service.normalize(&c, None).unwrap_err() {
        FormatError::MalformedTarget {
            action_id,
            placeholder,
        } => {
            assert_eq!(action_id, "a1");
            assert_eq!(placeholder, "primary");
        }
        other => panic!("expected MalformedTarget, got {other:?}"),
    }
}

#[test]
fn test_custom_role_registry_orders_contexts() {
    let registry = TargetRoleRegistry::new(vec!["weapon".into(), "victim".into()]);
    let service = TargetNormalizationService::new(&registry);

    let mut c = candidate("a1");
    c.resolved_targets = Some(ResolvedTargetSet {
        roles: vec![
            ResolvedTarget {
                role: "victim".to_string(),
                id: EntityId::from("npc1"),
                display_name: None,
                is_primary: false,
                params: AHashMap::default(),
            },
            ResolvedTarget {
                role: "weapon".to_string(),
                id: EntityId::from("axe1"),
                display_name: None,
                is_primary: false,
                params: AHashMap::default(),
            },
        ],
        multi_target: true,
    });

    let result = service.normalize(&c, None).unwrap();
    let roles: Vec<&str> = result.contexts.iter().map(|c| c.role.as_str()).collect();
    assert_eq!(roles, vec!["weapon", "victim"]);
    assert_eq!(result.primary.as_ref().unwrap().role, "weapon");
}
