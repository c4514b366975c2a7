use nalgebra::{Point3, Vector3};
use std::collections::BTreeSet;

use crate::body::{BodyId, BodyKind, BodyStatus};
use crate::body_map::BodyMap;
use crate::cascade::{StatusTransition, apply_step_result, cascade_set, final_status};
use crate::step::{DestructionEvent, PhysicsStateReal, SimulationStepResult, Survivor};
use crate::test_support::*;

fn ringed_system() -> BodyMap {
    map_of([
        main_star("sun", SOLAR_MASS, 0.0),
        gas_giant("saturn", 5.68e26, 9.5, "sun"),
        body_at("saturn-rings", BodyKind::RingSystem, 1.5e19, 9.5).with_parent("saturn"),
        planet("earth", EARTH_MASS, 1.0, "sun"),
        moon("luna", LUNAR_MASS, 1.00257, "earth"),
    ])
}

fn destroy(id: &str, survivor: Survivor) -> SimulationStepResult {
    let mut result = SimulationStepResult::default();
    result.destroyed_ids.insert(id.into());
    result
        .destruction_events
        .push(DestructionEvent::new(id, survivor));
    result
}

fn status_of(map: &BodyMap, id: &str) -> BodyStatus {
    map.get(&id.into()).unwrap().status
}

#[test]
fn test_rings_share_fate_of_star_swallowed_planet() {
    let result = destroy("saturn", Survivor::Body("sun".into()));
    let outcome = apply_step_result(&ringed_system(), &result);

    assert_eq!(status_of(&outcome.bodies, "saturn"), BodyStatus::Annihilated);
    assert_eq!(status_of(&outcome.bodies, "saturn-rings"), BodyStatus::Annihilated);
}

#[test]
fn test_rings_share_fate_of_planet_destroyed_by_planet() {
    let mut map = ringed_system();
    map.insert(gas_giant("intruder", 1.0e27, 9.6, "sun"));
    let result = destroy("saturn", Survivor::Body("intruder".into()));

    let outcome = apply_step_result(&map, &result);

    assert_eq!(status_of(&outcome.bodies, "saturn"), BodyStatus::Destroyed);
    assert_eq!(status_of(&outcome.bodies, "saturn-rings"), BodyStatus::Destroyed);
}

#[test]
fn test_mutual_destruction_annihilates() {
    let result = destroy("saturn", Survivor::MutualDestruction);
    let outcome = apply_step_result(&ringed_system(), &result);

    assert_eq!(status_of(&outcome.bodies, "saturn"), BodyStatus::Annihilated);
    assert_eq!(status_of(&outcome.bodies, "saturn-rings"), BodyStatus::Annihilated);
}

#[test]
fn test_transitions_list_every_body_leaving_active() {
    let result = destroy("saturn", Survivor::Body("sun".into()));
    let outcome = apply_step_result(&ringed_system(), &result);

    assert_eq!(
        outcome.transitions,
        vec![
            StatusTransition {
                id: "saturn".into(),
                status: BodyStatus::Annihilated,
            },
            StatusTransition {
                id: "saturn-rings".into(),
                status: BodyStatus::Annihilated,
            },
        ]
    );
    assert_eq!(
        outcome.destroyed_ids().into_iter().collect::<Vec<_>>(),
        vec![BodyId::new("saturn"), BodyId::new("saturn-rings")]
    );
}

#[test]
fn test_moons_are_not_cascaded() {
    let result = destroy("earth", Survivor::Body("sun".into()));
    let outcome = apply_step_result(&ringed_system(), &result);

    assert_eq!(status_of(&outcome.bodies, "earth"), BodyStatus::Annihilated);
    assert_eq!(status_of(&outcome.bodies, "luna"), BodyStatus::Active);
}

#[test]
fn test_cascade_set_only_adds_live_rings_of_ring_owners() {
    let mut map = ringed_system();
    map.insert(body_at("luna-rings", BodyKind::RingSystem, 1.0e10, 1.00257).with_parent("luna"));

    let destroyed = BTreeSet::from([BodyId::new("saturn"), BodyId::new("luna")]);
    let set = cascade_set(&map, &destroyed);
    assert!(set.contains(&"saturn-rings".into()));
    assert!(!set.contains(&"luna-rings".into()));

    let mut spent = ringed_system();
    let rings = spent.get(&"saturn-rings".into()).unwrap().clone();
    spent.insert(rings.with_status(BodyStatus::Destroyed));
    let set = cascade_set(&spent, &BTreeSet::from([BodyId::new("saturn")]));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_terminal_bodies_never_transition_again() {
    let mut map = ringed_system();
    let saturn = map.get(&"saturn".into()).unwrap().clone();
    map.insert(saturn.with_status(BodyStatus::Destroyed));

    let result = destroy("saturn", Survivor::Body("sun".into()));
    let outcome = apply_step_result(&map, &result);

    assert_eq!(status_of(&outcome.bodies, "saturn"), BodyStatus::Destroyed);
    assert!(
        outcome
            .transitions
            .iter()
            .all(|t| t.id.as_str() != "saturn")
    );
}

#[test]
fn test_unknown_destroyed_id_is_skipped() {
    let result = destroy("vulcan", Survivor::Body("sun".into()));
    let outcome = apply_step_result(&ringed_system(), &result);

    assert!(outcome.transitions.is_empty());
    assert_eq!(outcome.bodies, ringed_system());
}

#[test]
fn test_destruction_without_event_defaults_to_destroyed() {
    let mut result = SimulationStepResult::default();
    result.destroyed_ids.insert("earth".into());

    let map = ringed_system();
    assert_eq!(final_status(&"earth".into(), &result, &map), BodyStatus::Destroyed);
}

#[test]
fn test_ring_fate_follows_owner_named_by_its_id() {
    // Ring link points at the star, the id still names saturn as owner
    let mut map = ringed_system();
    map.insert(body_at("saturn-rings", BodyKind::RingSystem, 1.5e19, 9.5).with_parent("sun"));
    let result = destroy("saturn", Survivor::Body("sun".into()));

    assert_eq!(
        final_status(&"saturn-rings".into(), &result, &map),
        BodyStatus::Annihilated
    );
    let outcome = apply_step_result(&map, &result);
    assert_eq!(status_of(&outcome.bodies, "saturn-rings"), BodyStatus::Annihilated);
}

#[test]
fn test_ring_with_own_event_uses_it() {
    let mut result = destroy("saturn", Survivor::Body("sun".into()));
    result.destroyed_ids.insert("saturn-rings".into());
    result.destruction_events.push(DestructionEvent::new(
        "saturn-rings",
        Survivor::Body("saturn".into()),
    ));

    let map = ringed_system();
    assert_eq!(
        final_status(&"saturn-rings".into(), &result, &map),
        BodyStatus::Destroyed
    );
}

#[test]
fn test_states_are_merged_into_active_bodies() {
    let mut result = SimulationStepResult::default();
    result.states.push(PhysicsStateReal {
        id: "earth".into(),
        mass_kg: 6.0e24,
        position_m: Point3::new(0.0, 1.5e11, 0.0),
        velocity_mps: Vector3::new(-29_780.0, 0.0, 0.0),
    });
    result.states.push(PhysicsStateReal {
        id: "vulcan".into(),
        mass_kg: 1.0e24,
        position_m: Point3::origin(),
        velocity_mps: Vector3::zeros(),
    });
    result
        .accelerations
        .insert("earth".into(), Vector3::new(0.0, -0.006, 0.0));

    let outcome = apply_step_result(&ringed_system(), &result);
    let earth = outcome.bodies.get(&"earth".into()).unwrap();

    assert_eq!(earth.mass_kg, 6.0e24);
    assert_eq!(earth.position(), Some(Point3::new(0.0, 1.5e11, 0.0)));
    assert_eq!(earth.velocity(), Some(Vector3::new(-29_780.0, 0.0, 0.0)));
    assert!(outcome.bodies.get(&"vulcan".into()).is_none());
    assert_eq!(outcome.accelerations.len(), 1);
}

#[test]
fn test_states_for_terminal_bodies_are_ignored() {
    let mut map = ringed_system();
    let earth = map.get(&"earth".into()).unwrap().clone();
    map.insert(earth.with_status(BodyStatus::Annihilated));

    let mut result = SimulationStepResult::default();
    result.states.push(PhysicsStateReal {
        id: "earth".into(),
        mass_kg: 1.0,
        position_m: Point3::origin(),
        velocity_mps: Vector3::zeros(),
    });

    let outcome = apply_step_result(&map, &result);
    assert_eq!(outcome.bodies, map);
}
