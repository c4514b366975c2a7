//! Hill spheres and bound/escape tests for satellites
//!
//! A satellite counts as bound to its primary when it sits inside the
//! primary's Hill sphere, has negative specific orbital energy relative to
//! it and, in the context-aware variant, is not being pulled away by a star.

use crate::body::{BodyKind, CelestialBody};
use crate::body_map::BodyMap;
use crate::influence::{AU_M, G, distance};

/// Hill radius of a primary orbiting a more massive reference body
///
/// `r_H = a * (m_primary / (3 * m_reference))^(1/3)`. An unknown or
/// unusable semi-major axis defaults to 1 AU.
///
/// # Arguments
///
/// * `primary_mass_kg` - Mass of the body whose sphere of influence is wanted
/// * `semi_major_axis_m` - Primary's orbital distance from the reference body
/// * `reference_mass_kg` - Mass of the body the primary orbits
///
/// # Returns
///
/// Hill radius in metres
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{hill_sphere_radius, AU_M};
///
/// // Earth around the Sun: about 0.01 AU
/// let r_hill = hill_sphere_radius(5.972e24, Some(AU_M), 1.989e30);
/// assert!((r_hill / AU_M - 0.01).abs() < 0.001);
///
/// // Unknown orbit falls back to 1 AU
/// assert_eq!(hill_sphere_radius(5.972e24, None, 1.989e30), r_hill);
/// ```
pub fn hill_sphere_radius(
    primary_mass_kg: f64,
    semi_major_axis_m: Option<f64>,
    reference_mass_kg: f64,
) -> f64 {
    let a = semi_major_axis_m
        .filter(|a| a.is_finite() && *a > 0.0)
        .unwrap_or(AU_M);
    a * (primary_mass_kg / (3.0 * reference_mass_kg)).cbrt()
}

/// Best available orbital distance of `body` around `reference`
///
/// The live separation when both bodies carry physics state, otherwise the
/// authored semi-major axis.
pub fn orbital_distance(body: &CelestialBody, reference: Option<&CelestialBody>) -> Option<f64> {
    let live = reference
        .map(|r| distance(body, r))
        .filter(|d| d.is_finite() && *d > 0.0);
    live.or_else(|| body.orbit.map(|o| o.semi_major_axis_m))
}

/// Hill radius of `primary` while it orbits `reference`
pub fn primary_hill_radius(primary: &CelestialBody, reference: &CelestialBody) -> f64 {
    hill_sphere_radius(
        primary.mass_kg,
        orbital_distance(primary, Some(reference)),
        reference.mass_kg,
    )
}

/// Magnitude of the velocity of `a` relative to `b` (m/s)
pub fn relative_speed(a: &CelestialBody, b: &CelestialBody) -> Option<f64> {
    Some((a.velocity()? - b.velocity()?).magnitude())
}

/// Specific orbital energy of `satellite` relative to `primary` (J/kg)
///
/// `E = v_rel² / 2 - G m_primary / r`. Negative means a closed orbit.
pub fn specific_orbital_energy(satellite: &CelestialBody, primary: &CelestialBody) -> Option<f64> {
    let v_rel = relative_speed(satellite, primary)?;
    let r = distance(satellite, primary);
    if !r.is_finite() {
        return None;
    }
    Some(0.5 * v_rel * v_rel - G * primary.mass_kg / r)
}

/// Whether a moon is still captured by its planet
///
/// Only moons around planets or gas giants can be bound. The satellite must
/// lie within the primary's Hill sphere (computed against `reference`, the
/// body the primary orbits) and have negative orbital energy. Any
/// non-finite intermediate value makes the answer false.
pub fn is_bound(
    satellite: &CelestialBody,
    primary: &CelestialBody,
    reference: &CelestialBody,
) -> bool {
    if satellite.physics_state.is_none() || primary.physics_state.is_none() {
        return false;
    }
    if satellite.kind != BodyKind::Moon || !primary.kind.is_planetary() {
        return false;
    }

    let r = distance(satellite, primary);
    let r_hill = primary_hill_radius(primary, reference);
    if !r.is_finite() || !r_hill.is_finite() || r > r_hill {
        return false;
    }

    match specific_orbital_energy(satellite, primary) {
        Some(energy) if energy.is_finite() => energy <= 0.0,
        _ => false,
    }
}

/// [`is_bound`] plus a check against stellar perturbation
///
/// Near the edge of a Hill sphere a moon can be energetically bound yet
/// dominated by a star. If any active star pulls on the satellite harder
/// than `star_dominance_ratio` times the primary does, the satellite is
/// treated as unbound.
pub fn is_bound_in_context(
    satellite: &CelestialBody,
    primary: &CelestialBody,
    reference: &CelestialBody,
    bodies: &BodyMap,
    star_dominance_ratio: f64,
) -> bool {
    if !is_bound(satellite, primary, reference) {
        return false;
    }

    let r = distance(satellite, primary);
    let primary_pull = G * primary.mass_kg / (r * r);
    if !primary_pull.is_finite() {
        return false;
    }

    bodies
        .active_stars()
        .filter(|star| star.physics_state.is_some())
        .all(|star| {
            let d = distance(satellite, star);
            let star_pull = G * star.mass_kg / (d * d);
            !star_pull.is_nan() && star_pull <= star_dominance_ratio * primary_pull
        })
}

/// Whether `capturer` can take `target` as its satellite
///
/// A body never captures something at least as massive as itself. The
/// target must sit inside the capturer's Hill sphere (the capturer orbiting
/// `star`) and move slower than the capturer's local escape velocity.
pub fn can_capture(
    capturer: &CelestialBody,
    target: &CelestialBody,
    star: &CelestialBody,
) -> bool {
    if capturer.physics_state.is_none() || target.physics_state.is_none() {
        return false;
    }
    if capturer.mass_kg <= target.mass_kg {
        return false;
    }

    let r = distance(capturer, target);
    let r_hill = hill_sphere_radius(
        capturer.mass_kg,
        orbital_distance(capturer, Some(star)),
        star.mass_kg,
    );
    if !r.is_finite() || !r_hill.is_finite() || r > r_hill {
        return false;
    }

    let escape_velocity = (2.0 * G * capturer.mass_kg / r).sqrt();
    match relative_speed(capturer, target) {
        Some(v_rel) if v_rel.is_finite() => v_rel < escape_velocity,
        _ => false,
    }
}
