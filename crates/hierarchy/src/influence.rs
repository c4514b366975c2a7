//! Distance and gravitational influence between bodies

use crate::body::CelestialBody;

/// One astronomical unit in metres
pub const AU_M: f64 = 1.496e11;

/// Gravitational constant in m³ kg⁻¹ s⁻²
pub const G: f64 = 6.6743e-11;

/// Euclidean distance between two bodies in metres
///
/// A body without physics state is infinitely far from everything.
pub fn distance(a: &CelestialBody, b: &CelestialBody) -> f64 {
    match (a.position(), b.position()) {
        (Some(pa), Some(pb)) => (pa - pb).magnitude(),
        _ => f64::INFINITY,
    }
}

/// Distance between two bodies in AU
pub fn distance_au(a: &CelestialBody, b: &CelestialBody) -> f64 {
    distance(a, b) / AU_M
}

/// Relative gravitational influence of `source` on `target`
///
/// `mass / distance_au²`, a ranking proxy for the acceleration `source`
/// imparts on `target`. Neither G nor the target's mass matter for ranking.
/// Zero when the distance is zero or infinite, or the source is massless.
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{influence, BodyKind, CelestialBody, AU_M};
/// use nalgebra::{Point3, Vector3};
///
/// let sun = CelestialBody::new("sun", BodyKind::Star, 2.0e30, 7.0e8)
///     .with_physics(Point3::origin(), Vector3::zeros());
/// let earth = CelestialBody::new("earth", BodyKind::Planet, 6.0e24, 6.4e6)
///     .with_physics(Point3::new(2.0 * AU_M, 0.0, 0.0), Vector3::zeros());
///
/// assert_eq!(influence(&sun, &earth), 2.0e30 / 4.0);
/// ```
pub fn influence(source: &CelestialBody, target: &CelestialBody) -> f64 {
    let d = distance_au(source, target);
    if d == 0.0 || !d.is_finite() || source.mass_kg.is_nan() || source.mass_kg <= 0.0 {
        return 0.0;
    }
    let score = source.mass_kg / (d * d);
    if score.is_finite() { score } else { 0.0 }
}
