//! Orbital hierarchy reconciliation
//!
//! Keeps the parent/child hierarchy of a simulated planetary system in line
//! with N-body gravitational dominance. After every integrator step the
//! engine marks destroyed bodies (and the ring systems they take with them),
//! re-homes orphaned stars, planets and moons, and periodically checks for
//! moons that escaped their planet or planets that drifted into another
//! star's grip.
//!
//! All distances are metres, masses kilograms and velocities metres per
//! second. Influence scores use AU internally to keep magnitudes sane.

pub mod body;
pub mod body_map;
pub mod boundary;
pub mod cascade;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod influence;
pub mod reconcile;
pub mod selection;
pub mod step;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod boundary_test;
#[cfg(test)]
mod cascade_test;
#[cfg(test)]
mod config_test;

pub use body::{BodyId, BodyKind, BodyStatus, CelestialBody, OrbitSummary, PhysicsState};
pub use body_map::{BodyMap, validate_hierarchy};
pub use boundary::{
    can_capture, hill_sphere_radius, is_bound, is_bound_in_context, orbital_distance,
    primary_hill_radius, specific_orbital_energy,
};
pub use cascade::{CascadeOutcome, StatusTransition, apply_step_result, final_status};
pub use config::{EngineConfig, IntegratorMode, Thresholds};
pub use engine::{HierarchyEngine, TickReport};
pub use error::{HierarchyError, HierarchyViolation, Result};
pub use influence::{AU_M, G, distance, distance_au, influence};
pub use reconcile::{HierarchyReconciler, ParentUpdate};
pub use selection::{ParentSelector, find_nearest_star};
pub use step::{DestructionEvent, PhysicsStateReal, SimulationStepResult, Survivor};
