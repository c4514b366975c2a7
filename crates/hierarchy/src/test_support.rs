//! Fixtures shared by the unit tests

use nalgebra::{Point3, Vector3};

use crate::body::{BodyKind, CelestialBody};
use crate::body_map::BodyMap;
use crate::influence::AU_M;

pub const SOLAR_MASS: f64 = 1.989e30;
pub const EARTH_MASS: f64 = 5.972e24;
pub const JUPITER_MASS: f64 = 1.898e27;
pub const LUNAR_MASS: f64 = 7.342e22;

/// Position `x_au` AU along the x axis
pub fn at_au(x_au: f64) -> Point3<f64> {
    Point3::new(x_au * AU_M, 0.0, 0.0)
}

pub fn body_at(id: &str, kind: BodyKind, mass_kg: f64, x_au: f64) -> CelestialBody {
    CelestialBody::new(id, kind, mass_kg, 1.0e6).with_physics(at_au(x_au), Vector3::zeros())
}

pub fn main_star(id: &str, mass_kg: f64, x_au: f64) -> CelestialBody {
    body_at(id, BodyKind::Star, mass_kg, x_au).as_main_star()
}

pub fn star(id: &str, mass_kg: f64, x_au: f64, parent: &str) -> CelestialBody {
    body_at(id, BodyKind::Star, mass_kg, x_au).with_parent(parent)
}

pub fn planet(id: &str, mass_kg: f64, x_au: f64, parent: &str) -> CelestialBody {
    body_at(id, BodyKind::Planet, mass_kg, x_au).with_parent(parent)
}

pub fn gas_giant(id: &str, mass_kg: f64, x_au: f64, parent: &str) -> CelestialBody {
    body_at(id, BodyKind::GasGiant, mass_kg, x_au).with_parent(parent)
}

pub fn moon(id: &str, mass_kg: f64, x_au: f64, parent: &str) -> CelestialBody {
    body_at(id, BodyKind::Moon, mass_kg, x_au).with_parent(parent)
}

pub fn map_of(bodies: impl IntoIterator<Item = CelestialBody>) -> BodyMap {
    bodies.into_iter().collect()
}

/// Live parent of `id` as a plain string, for terse assertions
pub fn parent_of<'a>(map: &'a BodyMap, id: &str) -> Option<&'a str> {
    map.get(&id.into())?
        .current_parent_id
        .as_ref()
        .map(|p| p.as_str())
}
