use approx::assert_relative_eq;
use nalgebra::Vector3;

use crate::body::{BodyKind, CelestialBody, OrbitSummary};
use crate::body_map::BodyMap;
use crate::boundary::*;
use crate::influence::{AU_M, G};
use crate::test_support::*;

/// Sun, Earth at 1 AU and the Moon at its real distance and speed
fn earth_moon() -> (CelestialBody, CelestialBody, CelestialBody) {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let earth = planet("earth", EARTH_MASS, 1.0, "sun");
    let luna = CelestialBody::new("luna", BodyKind::Moon, LUNAR_MASS, 1.737e6)
        .with_physics(at_au(1.00257), Vector3::new(0.0, 1022.0, 0.0))
        .with_parent("earth");
    (sun, earth, luna)
}

#[test]
fn test_earth_hill_radius() {
    let r_hill = hill_sphere_radius(EARTH_MASS, Some(AU_M), SOLAR_MASS);
    assert_relative_eq!(r_hill / AU_M, 0.01, epsilon = 1e-4);
}

#[test]
fn test_jupiter_hill_radius() {
    let r_hill = hill_sphere_radius(JUPITER_MASS, Some(5.2 * AU_M), SOLAR_MASS);
    assert_relative_eq!(r_hill / AU_M, 0.355, epsilon = 1e-3);
}

#[test]
fn test_hill_radius_defaults_to_one_au() {
    let expected = hill_sphere_radius(EARTH_MASS, Some(AU_M), SOLAR_MASS);

    assert_eq!(hill_sphere_radius(EARTH_MASS, None, SOLAR_MASS), expected);
    assert_eq!(hill_sphere_radius(EARTH_MASS, Some(0.0), SOLAR_MASS), expected);
    assert_eq!(hill_sphere_radius(EARTH_MASS, Some(f64::NAN), SOLAR_MASS), expected);
}

#[test]
fn test_orbital_distance_prefers_live_separation() {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let earth = planet("earth", EARTH_MASS, 1.5, "sun").with_orbit(OrbitSummary {
        semi_major_axis_m: AU_M,
        eccentricity: 0.0167,
        inclination: 0.0,
    });

    let live = orbital_distance(&earth, Some(&sun)).unwrap();
    assert_relative_eq!(live, 1.5 * AU_M, max_relative = 1e-12);

    let authored = orbital_distance(&earth, None).unwrap();
    assert_eq!(authored, AU_M);
}

#[test]
fn test_orbital_distance_unknown() {
    let earth = CelestialBody::new("earth", BodyKind::Planet, EARTH_MASS, 6.4e6);
    assert_eq!(orbital_distance(&earth, None), None);
}

#[test]
fn test_specific_orbital_energy() {
    let (_, earth, luna) = earth_moon();
    let r = 0.00257 * AU_M;
    let expected = 0.5 * 1022.0 * 1022.0 - G * EARTH_MASS / r;

    let energy = specific_orbital_energy(&luna, &earth).unwrap();
    assert_relative_eq!(energy, expected, max_relative = 1e-6);
    assert!(energy < 0.0);
}

#[test]
fn test_moon_is_bound_to_earth() {
    let (sun, earth, luna) = earth_moon();
    assert!(is_bound(&luna, &earth, &sun));
}

#[test]
fn test_fast_moon_is_not_bound() {
    let (sun, earth, luna) = earth_moon();
    let fast = luna.with_physics(at_au(1.00257), Vector3::new(0.0, 5000.0, 0.0));

    assert!(!is_bound(&fast, &earth, &sun));
}

#[test]
fn test_moon_outside_hill_sphere_is_not_bound() {
    let (sun, earth, _) = earth_moon();
    let far = moon("far", LUNAR_MASS, 1.02, "earth");

    assert!(!is_bound(&far, &earth, &sun));
}

#[test]
fn test_is_bound_type_rules() {
    let (sun, earth, luna) = earth_moon();

    // A star is never a moon's primary here
    assert!(!is_bound(&luna, &sun, &sun));

    // Only moons can be bound
    let rock = body_at("rock", BodyKind::AsteroidField, 1.0e18, 1.00257);
    assert!(!is_bound(&rock, &earth, &sun));

    // No physics, no answer
    let ghost = CelestialBody::new("ghost", BodyKind::Moon, LUNAR_MASS, 1.0e6);
    assert!(!is_bound(&ghost, &earth, &sun));
}

#[test]
fn test_bound_in_context_with_only_the_sun() {
    let (sun, earth, luna) = earth_moon();
    let map: BodyMap = map_of([sun.clone(), earth.clone(), luna.clone()]);

    assert!(is_bound_in_context(&luna, &earth, &sun, &map, 3.0));
}

#[test]
fn test_nearby_star_unbinds_moon() {
    let (sun, earth, luna) = earth_moon();
    let intruder = star("intruder", 1.0e30, 1.01257, "sun");
    let map = map_of([sun.clone(), earth.clone(), luna.clone(), intruder]);

    assert!(is_bound(&luna, &earth, &sun));
    assert!(!is_bound_in_context(&luna, &earth, &sun, &map, 3.0));
}

#[test]
fn test_jupiter_captures_nearby_slow_body() {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let jupiter = gas_giant("jupiter", JUPITER_MASS, 5.2, "sun");
    let rock = moon("rock", 1.0e20, 5.21, "sun");

    assert!(can_capture(&jupiter, &rock, &sun));
}

#[test]
fn test_capture_needs_more_mass() {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let jupiter = gas_giant("jupiter", JUPITER_MASS, 5.2, "sun");
    let heavy = moon("heavy", 2.0 * JUPITER_MASS, 5.21, "sun");
    let twin = moon("twin", JUPITER_MASS, 5.21, "sun");

    assert!(!can_capture(&jupiter, &heavy, &sun));
    assert!(!can_capture(&jupiter, &twin, &sun));
}

#[test]
fn test_capture_needs_target_inside_hill_sphere() {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let jupiter = gas_giant("jupiter", JUPITER_MASS, 5.2, "sun");
    let rock = moon("rock", 1.0e20, 5.7, "sun");

    assert!(!can_capture(&jupiter, &rock, &sun));
}

#[test]
fn test_capture_needs_speed_below_escape_velocity() {
    let sun = main_star("sun", SOLAR_MASS, 0.0);
    let jupiter = gas_giant("jupiter", JUPITER_MASS, 5.2, "sun");
    let r = 0.01 * AU_M;
    let v_escape = (2.0 * G * JUPITER_MASS / r).sqrt();

    let slow = moon("slow", 1.0e20, 5.21, "sun")
        .with_physics(at_au(5.21), Vector3::new(0.0, 0.9 * v_escape, 0.0));
    let fast = moon("fast", 1.0e20, 5.21, "sun")
        .with_physics(at_au(5.21), Vector3::new(0.0, 1.1 * v_escape, 0.0));

    assert!(can_capture(&jupiter, &slow, &sun));
    assert!(!can_capture(&jupiter, &fast, &sun));
}
