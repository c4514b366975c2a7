//! Integrator output consumed once per tick
//!
//! These types are produced by the numerical integrator, which lives outside
//! this crate. The engine only reads them.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::body::{BodyId, PhysicsState};

/// Updated kinematic state of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsStateReal {
    pub id: BodyId,
    pub mass_kg: f64,
    pub position_m: Point3<f64>,
    pub velocity_mps: Vector3<f64>,
}

impl PhysicsStateReal {
    pub fn physics_state(&self) -> PhysicsState {
        PhysicsState::new(self.position_m, self.velocity_mps)
    }
}

/// The body that outlived a destructive collision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Survivor {
    Body(BodyId),
    /// Both participants were destroyed
    MutualDestruction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestructionEvent {
    pub destroyed_id: BodyId,
    pub survivor: Survivor,
    pub impact_position: Point3<f64>,
    pub relative_velocity: Vector3<f64>,
    pub destroyed_radius: f64,
}

impl DestructionEvent {
    /// Event at the origin with no kinematics, for callers that only track
    /// the outcome
    pub fn new(destroyed_id: impl Into<BodyId>, survivor: Survivor) -> Self {
        Self {
            destroyed_id: destroyed_id.into(),
            survivor,
            impact_position: Point3::origin(),
            relative_velocity: Vector3::zeros(),
            destroyed_radius: 0.0,
        }
    }
}

/// Everything one integrator step produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStepResult {
    pub states: Vec<PhysicsStateReal>,
    pub destroyed_ids: BTreeSet<BodyId>,
    pub destruction_events: Vec<DestructionEvent>,
    pub accelerations: HashMap<BodyId, Vector3<f64>>,
}

impl SimulationStepResult {
    /// Event whose destroyed body is `id`, if the integrator reported one
    pub fn event_for(&self, id: &BodyId) -> Option<&DestructionEvent> {
        self.destruction_events
            .iter()
            .find(|e| &e.destroyed_id == id)
    }
}
