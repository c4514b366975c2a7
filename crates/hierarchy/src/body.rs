//! Celestial bodies as seen by the hierarchy engine
//!
//! A body carries its kind, lifecycle status, physical parameters and the
//! two parent links the engine maintains. Bodies are immutable values: every
//! change goes through a `with_*` constructor that returns an updated copy.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a body in the body map
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub String);

impl BodyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the ring system owned by `owner`
    ///
    /// Rings have no independent physical existence, so they are looked up
    /// by convention rather than by scanning for children.
    ///
    /// # Examples
    ///
    /// ```
    /// use orbital_hierarchy::BodyId;
    ///
    /// let saturn = BodyId::new("saturn");
    /// assert_eq!(BodyId::ring_system_of(&saturn).as_str(), "saturn-rings");
    /// ```
    pub fn ring_system_of(owner: &BodyId) -> BodyId {
        BodyId(format!("{}-rings", owner.0))
    }

    /// Owner encoded in a ring-system id, the inverse of
    /// [`ring_system_of`](Self::ring_system_of)
    pub fn ring_owner(&self) -> Option<BodyId> {
        self.0
            .strip_suffix("-rings")
            .filter(|owner| !owner.is_empty())
            .map(BodyId::new)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for BodyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of celestial body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyKind {
    Star,
    Planet,
    GasGiant,
    DwarfPlanet,
    Moon,
    RingSystem,
    AsteroidField,
    OortCloud,
}

impl BodyKind {
    /// Planets and gas giants: the bodies that own moons and orbit stars
    pub fn is_planetary(self) -> bool {
        matches!(self, Self::Planet | Self::GasGiant)
    }

    /// Kinds that may carry a ring system
    pub fn can_own_rings(self) -> bool {
        match self {
            Self::Planet | Self::DwarfPlanet | Self::GasGiant => true,
            Self::Star | Self::Moon | Self::RingSystem | Self::AsteroidField | Self::OortCloud => {
                false
            }
        }
    }

    /// Whether a body of this kind may act as gravitational parent of `target`
    ///
    /// Stars host anything. Gas giants host moons and asteroid fields
    /// regardless of mass; terrestrial planets only when they outweigh the
    /// target (`outweighs_target`). Nothing else is ever a parent.
    pub fn can_host(self, target: BodyKind, outweighs_target: bool) -> bool {
        let satellite_kind = matches!(target, Self::Moon | Self::AsteroidField);
        match self {
            Self::Star => true,
            Self::GasGiant => satellite_kind,
            Self::Planet => satellite_kind && outweighs_target,
            Self::DwarfPlanet
            | Self::Moon
            | Self::RingSystem
            | Self::AsteroidField
            | Self::OortCloud => false,
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Star => "star",
            Self::Planet => "planet",
            Self::GasGiant => "gas giant",
            Self::DwarfPlanet => "dwarf planet",
            Self::Moon => "moon",
            Self::RingSystem => "ring system",
            Self::AsteroidField => "asteroid field",
            Self::OortCloud => "oort cloud",
        };
        f.write_str(name)
    }
}

/// Lifecycle status. `Destroyed` and `Annihilated` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyStatus {
    #[default]
    Active,
    Destroyed,
    Annihilated,
}

impl BodyStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Live kinematic state written by the integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsState {
    /// Position in metres
    pub position_m: Point3<f64>,
    /// Velocity in metres per second
    pub velocity_mps: Vector3<f64>,
}

impl PhysicsState {
    pub fn new(position_m: Point3<f64>, velocity_mps: Vector3<f64>) -> Self {
        Self {
            position_m,
            velocity_mps,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position_m.coords.iter().all(|c| c.is_finite())
            && self.velocity_mps.iter().all(|c| c.is_finite())
    }
}

/// Authored orbit, used only to approximate Hill radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitSummary {
    pub semi_major_axis_m: f64,
    pub eccentricity: f64,
    /// Inclination in radians
    pub inclination: f64,
}

/// A body in the authoritative hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub status: BodyStatus,
    pub mass_kg: f64,
    pub radius_m: f64,
    pub physics_state: Option<PhysicsState>,
    /// Authored (nominal) parent
    pub parent_id: Option<BodyId>,
    /// Live parent maintained by the engine
    pub current_parent_id: Option<BodyId>,
    pub orbit: Option<OrbitSummary>,
    /// Hierarchy root marker, only meaningful for stars
    pub is_main_star: bool,
}

impl CelestialBody {
    /// Creates an active, parentless body without physics state
    ///
    /// # Examples
    ///
    /// ```
    /// use orbital_hierarchy::{BodyKind, BodyStatus, CelestialBody};
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let earth = CelestialBody::new("earth", BodyKind::Planet, 5.972e24, 6.371e6)
    ///     .with_physics(Point3::new(1.496e11, 0.0, 0.0), Vector3::new(0.0, 29_780.0, 0.0))
    ///     .with_parent("sun");
    ///
    /// assert_eq!(earth.status, BodyStatus::Active);
    /// assert_eq!(earth.current_parent_id, earth.parent_id);
    /// ```
    pub fn new(id: impl Into<BodyId>, kind: BodyKind, mass_kg: f64, radius_m: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            status: BodyStatus::Active,
            mass_kg,
            radius_m,
            physics_state: None,
            parent_id: None,
            current_parent_id: None,
            orbit: None,
            is_main_star: false,
        }
    }

    pub fn with_physics(mut self, position_m: Point3<f64>, velocity_mps: Vector3<f64>) -> Self {
        self.physics_state = Some(PhysicsState::new(position_m, velocity_mps));
        self
    }

    pub fn with_physics_state(mut self, state: Option<PhysicsState>) -> Self {
        self.physics_state = state;
        self
    }

    /// Sets both the authored and the live parent
    pub fn with_parent(mut self, parent: impl Into<BodyId>) -> Self {
        let parent = parent.into();
        self.parent_id = Some(parent.clone());
        self.current_parent_id = Some(parent);
        self
    }

    /// Replaces both parent links, `None` makes the body parentless
    pub fn with_parent_links(mut self, parent: Option<BodyId>) -> Self {
        self.parent_id = parent.clone();
        self.current_parent_id = parent;
        self
    }

    pub fn with_orbit(mut self, orbit: OrbitSummary) -> Self {
        self.orbit = Some(orbit);
        self
    }

    pub fn with_mass(mut self, mass_kg: f64) -> Self {
        self.mass_kg = mass_kg;
        self
    }

    pub fn with_status(mut self, status: BodyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn as_main_star(mut self) -> Self {
        self.is_main_star = true;
        self.parent_id = None;
        self.current_parent_id = None;
        self
    }

    pub fn with_main_star(mut self, is_main_star: bool) -> Self {
        self.is_main_star = is_main_star;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == BodyStatus::Active
    }

    pub fn is_star(&self) -> bool {
        self.kind == BodyKind::Star
    }

    pub fn position(&self) -> Option<Point3<f64>> {
        self.physics_state.map(|s| s.position_m)
    }

    pub fn velocity(&self) -> Option<Vector3<f64>> {
        self.physics_state.map(|s| s.velocity_mps)
    }

    /// The live parent, falling back to the authored one
    pub fn effective_parent(&self) -> Option<&BodyId> {
        self.current_parent_id.as_ref().or(self.parent_id.as_ref())
    }

    /// Whether either parent link points at `id`
    pub fn is_child_of(&self, id: &BodyId) -> bool {
        self.current_parent_id.as_ref() == Some(id) || self.parent_id.as_ref() == Some(id)
    }
}
