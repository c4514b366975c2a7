//! Applying integrator output and cascading destruction
//!
//! Runs every tick, before any reconciliation. Merges the new physics
//! states, then moves every destroyed body and every ring system owned by a
//! destroyed body to its final status. A body only ever leaves `Active`
//! once.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::body::{BodyId, BodyKind, BodyStatus};
use crate::body_map::BodyMap;
use crate::step::{DestructionEvent, SimulationStepResult, Survivor};

/// A body leaving `Active` during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    pub id: BodyId,
    pub status: BodyStatus,
}

/// Result of applying one step to the body map
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub bodies: BodyMap,
    pub transitions: Vec<StatusTransition>,
    pub accelerations: HashMap<BodyId, Vector3<f64>>,
}

impl CascadeOutcome {
    /// Ids that became terminal this tick
    pub fn destroyed_ids(&self) -> BTreeSet<BodyId> {
        self.transitions.iter().map(|t| t.id.clone()).collect()
    }
}

/// Merge `result` into `bodies` and apply all destructions
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{apply_step_result, BodyKind, BodyMap, BodyStatus, CelestialBody,
///     DestructionEvent, SimulationStepResult, Survivor};
///
/// let bodies: BodyMap = [
///     CelestialBody::new("sun", BodyKind::Star, 2.0e30, 7.0e8).as_main_star(),
///     CelestialBody::new("saturn", BodyKind::GasGiant, 5.7e26, 5.8e7).with_parent("sun"),
///     CelestialBody::new("saturn-rings", BodyKind::RingSystem, 1.5e19, 1.4e8)
///         .with_parent("saturn"),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut result = SimulationStepResult::default();
/// result.destroyed_ids.insert("saturn".into());
/// result
///     .destruction_events
///     .push(DestructionEvent::new("saturn", Survivor::Body("sun".into())));
///
/// let outcome = apply_step_result(&bodies, &result);
/// let rings = outcome.bodies.get(&"saturn-rings".into()).unwrap();
/// assert_eq!(rings.status, BodyStatus::Annihilated);
/// ```
pub fn apply_step_result(bodies: &BodyMap, result: &SimulationStepResult) -> CascadeOutcome {
    let mut next = bodies.clone();

    for state in &result.states {
        match next.get_mut(&state.id) {
            Some(body) if body.is_active() => {
                body.physics_state = Some(state.physics_state());
                body.mass_kg = state.mass_kg;
            }
            Some(_) => {
                tracing::trace!(body = %state.id, "state for terminal body ignored");
            }
            None => {
                tracing::warn!(body = %state.id, "physics state for unknown body skipped");
            }
        }
    }

    let cascade = cascade_set(&next, &result.destroyed_ids);

    let mut transitions = Vec::new();
    for id in &cascade {
        let status = match next.get(id) {
            None => {
                tracing::warn!(body = %id, "destroyed id not in body map");
                continue;
            }
            Some(body) if body.status.is_terminal() => continue,
            Some(_) => final_status(id, result, &next),
        };

        if let Some(body) = next.get_mut(id) {
            body.status = status;
        }
        tracing::debug!(body = %id, status = ?status, "body left the simulation");
        transitions.push(StatusTransition {
            id: id.clone(),
            status,
        });
    }

    CascadeOutcome {
        bodies: next,
        transitions,
        accelerations: result.accelerations.clone(),
    }
}

/// Destroyed ids plus the still-active ring systems they own
pub fn cascade_set(bodies: &BodyMap, destroyed_ids: &BTreeSet<BodyId>) -> BTreeSet<BodyId> {
    let mut cascade = destroyed_ids.clone();
    for id in destroyed_ids {
        let owns_rings = bodies.get(id).is_some_and(|b| b.kind.can_own_rings());
        if !owns_rings {
            continue;
        }
        let ring_id = BodyId::ring_system_of(id);
        let live_ring = bodies
            .get(&ring_id)
            .is_some_and(|r| r.kind == BodyKind::RingSystem && r.is_active());
        if live_ring {
            cascade.insert(ring_id);
        }
    }
    cascade
}

/// Terminal status for a body leaving the simulation this tick
///
/// Swallowed by a star or lost in a mutual destruction means annihilated,
/// anything else destroyed. A ring system without its own event shares the
/// fate of its destroyed owner. With no attributable cause the body is
/// destroyed and a diagnostic is logged.
pub fn final_status(id: &BodyId, result: &SimulationStepResult, bodies: &BodyMap) -> BodyStatus {
    if let Some(event) = result.event_for(id) {
        return outcome_of(event, bodies);
    }

    // Owner by id convention first, then the parent link
    let owner_event = bodies
        .get(id)
        .filter(|b| b.kind == BodyKind::RingSystem)
        .and_then(|ring| {
            [id.ring_owner(), ring.effective_parent().cloned()]
                .into_iter()
                .flatten()
                .filter(|owner| result.destroyed_ids.contains(owner))
                .find_map(|owner| result.event_for(&owner))
        });
    if let Some(event) = owner_event {
        return outcome_of(event, bodies);
    }

    tracing::warn!(body = %id, "destroyed without an attributable event, marking destroyed");
    BodyStatus::Destroyed
}

fn outcome_of(event: &DestructionEvent, bodies: &BodyMap) -> BodyStatus {
    match &event.survivor {
        Survivor::MutualDestruction => BodyStatus::Annihilated,
        Survivor::Body(survivor) if bodies.get(survivor).is_some_and(|b| b.is_star()) => {
            BodyStatus::Annihilated
        }
        Survivor::Body(_) => BodyStatus::Destroyed,
    }
}
