//! The reconciliation service
//!
//! `HierarchyEngine` owns the authoritative body map. Each tick it applies
//! the integrator's step result, re-homes bodies orphaned by destruction and,
//! on a fixed cadence, runs the periodic passes. Every pass works on a
//! snapshot and its result replaces the map in one assignment; a pass that
//! fails leaves the previous map in place.

use nalgebra::Vector3;
use std::collections::HashMap;

use crate::body::BodyId;
use crate::body_map::{BodyMap, validate_hierarchy};
use crate::cascade::{StatusTransition, apply_step_result};
use crate::config::{EngineConfig, IntegratorMode};
use crate::error::{HierarchyError, HierarchyViolation, Result};
use crate::reconcile::HierarchyReconciler;
use crate::step::SimulationStepResult;

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Bodies that left `Active` this tick, with their final status
    pub transitions: Vec<StatusTransition>,
    /// No main star anchors the hierarchy
    pub anchor_lost: bool,
    /// The periodic passes ran this tick
    pub periodic_ran: bool,
    /// Well-formedness problems left after reconciliation
    pub violations: Vec<HierarchyViolation>,
}

/// Single owner of the body hierarchy
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{BodyKind, BodyMap, CelestialBody, DestructionEvent, EngineConfig,
///     HierarchyEngine, SimulationStepResult, Survivor, AU_M};
/// use nalgebra::{Point3, Vector3};
///
/// let bodies: BodyMap = [
///     CelestialBody::new("a", BodyKind::Star, 2.0e30, 7.0e8)
///         .with_physics(Point3::origin(), Vector3::zeros())
///         .as_main_star(),
///     CelestialBody::new("b", BodyKind::Star, 1.5e30, 7.0e8)
///         .with_physics(Point3::new(10.0 * AU_M, 0.0, 0.0), Vector3::zeros())
///         .with_parent("a"),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut engine = HierarchyEngine::new(bodies, EngineConfig::default());
///
/// let mut result = SimulationStepResult::default();
/// result.destroyed_ids.insert("a".into());
/// result
///     .destruction_events
///     .push(DestructionEvent::new("a", Survivor::MutualDestruction));
///
/// let report = engine.step(&result);
/// assert_eq!(report.transitions.len(), 1);
/// assert!(!report.anchor_lost);
/// assert_eq!(engine.bodies().main_star().map(|s| s.id.as_str()), Some("b"));
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyEngine {
    bodies: BodyMap,
    accelerations: HashMap<BodyId, Vector3<f64>>,
    config: EngineConfig,
    reconciler: HierarchyReconciler,
    tick: u64,
}

impl HierarchyEngine {
    pub fn new(bodies: BodyMap, config: EngineConfig) -> Self {
        let reconciler = HierarchyReconciler::from_config(&config);
        Self {
            bodies,
            accelerations: HashMap::new(),
            config,
            reconciler,
            tick: 0,
        }
    }

    /// Read-only snapshot of the authoritative hierarchy
    pub fn bodies(&self) -> &BodyMap {
        &self.bodies
    }

    /// Accelerations reported by the last integrator step
    pub fn accelerations(&self) -> &HashMap<BodyId, Vector3<f64>> {
        &self.accelerations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of ticks applied so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Follow an integrator switch
    pub fn set_integrator(&mut self, mode: IntegratorMode) {
        self.config.integrator = mode;
        self.reconciler = HierarchyReconciler::from_config(&self.config);
    }

    /// Consume one integrator step
    pub fn step(&mut self, result: &SimulationStepResult) -> TickReport {
        self.tick += 1;

        let outcome = apply_step_result(&self.bodies, result);
        let destroyed = outcome.destroyed_ids();
        self.bodies = outcome.bodies;
        self.accelerations = outcome.accelerations;

        let reactive = self
            .reconciler
            .reassign_orphaned_objects(&destroyed, &self.bodies);
        self.swap_in("reassign_orphaned_objects", reactive);

        let periodic_ran =
            self.config.integrator.is_n_body() && self.tick % self.config.periodic_interval() == 0;
        if periodic_ran {
            self.run_periodic_passes();
        }

        let anchor_lost = self.bodies.main_star().is_none();
        if anchor_lost && self.bodies.active().next().is_some() {
            tracing::error!(tick = self.tick, "system anchor lost, no main star");
        }

        let violations = validate_hierarchy(&self.bodies);
        for violation in &violations {
            tracing::warn!(tick = self.tick, %violation, "hierarchy needs inspection");
        }

        TickReport {
            tick: self.tick,
            transitions: outcome.transitions,
            anchor_lost,
            periodic_ran,
            violations,
        }
    }

    /// Run the escaped-moon and planet/star passes now, regardless of cadence
    pub fn run_periodic_passes(&mut self) {
        let moons = self
            .reconciler
            .check_and_reassign_escaped_moons(&self.bodies);
        self.swap_in("check_and_reassign_escaped_moons", moons);

        let planets = self
            .reconciler
            .check_and_reassign_planets_to_proper_stars(&self.bodies);
        self.swap_in("check_and_reassign_planets_to_proper_stars", planets);
    }

    fn swap_in(&mut self, pass: &'static str, result: Result<BodyMap>) {
        match result {
            Ok(next) => self.bodies = next,
            Err(HierarchyError::AnchorLost) => {
                tracing::error!(pass, "pass stopped: system anchor lost");
            }
            Err(err) => {
                tracing::error!(pass, %err, "pass abandoned, previous hierarchy kept");
            }
        }
    }
}
