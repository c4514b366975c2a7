//! Periodic reconciliation passes
//!
//! Both passes use hysteresis so that a body hovering near a decision
//! boundary does not flip parents back and forth between runs.

use super::HierarchyReconciler;
use crate::body::{BodyKind, CelestialBody};
use crate::body_map::BodyMap;
use crate::boundary::{is_bound_in_context, primary_hill_radius};
use crate::diagnostics::{Diagnostics, Issue};
use crate::error::Result;
use crate::influence::{distance, influence};
use crate::selection::find_nearest_star;

impl HierarchyReconciler {
    /// Hand moons that escaped their planet to the nearest star
    ///
    /// A moon whose recorded parent is gone goes to its nearest star at once.
    /// A moon that fails the context-aware bound test is only reassigned
    /// once it is farther than `escape_hysteresis` Hill radii from its
    /// planet. Moons already orbiting a star are left alone.
    ///
    /// Without a main star there is nothing to measure Hill spheres against
    /// and the pass does nothing.
    pub fn check_and_reassign_escaped_moons(&self, bodies: &BodyMap) -> Result<BodyMap> {
        let mut next = bodies.clone();
        let Some(main_star) = bodies.main_star() else {
            tracing::debug!("no main star, escaped-moon check skipped");
            return Ok(next);
        };

        let mut diagnostics = Diagnostics::new("check_and_reassign_escaped_moons");
        let thresholds = self.thresholds();

        for moon in bodies.active_of_kind(BodyKind::Moon) {
            if !diagnostics.check_physics(moon) {
                continue;
            }

            let primary = moon.effective_parent().and_then(|id| bodies.get_active(id));
            let Some(primary) = primary else {
                reassign_to_nearest_star(&mut next, moon, bodies, &mut diagnostics)?;
                continue;
            };
            if primary.is_star() || !diagnostics.check_physics(primary) {
                continue;
            }

            let reference = stellar_reference(primary, bodies).unwrap_or(main_star);
            if is_bound_in_context(
                moon,
                primary,
                reference,
                bodies,
                thresholds.star_dominance_ratio,
            ) {
                continue;
            }

            let r = distance(moon, primary);
            let r_hill = primary_hill_radius(primary, reference);
            if !r.is_finite() || !r_hill.is_finite() {
                diagnostics.report(&moon.id, Issue::NonFiniteState);
                continue;
            }
            if r > thresholds.escape_hysteresis * r_hill {
                tracing::debug!(
                    body = %moon.id,
                    former = %primary.id,
                    hill_radii = r / r_hill,
                    "moon escaped its primary"
                );
                reassign_to_nearest_star(&mut next, moon, bodies, &mut diagnostics)?;
            }
        }

        Ok(next)
    }

    /// Move planets to the star that now dominates them
    ///
    /// Needs at least two active stars. A planet switches star only when
    /// the rival's influence beats its current parent's by the
    /// `planet_reassign_hysteresis` factor.
    pub fn check_and_reassign_planets_to_proper_stars(&self, bodies: &BodyMap) -> Result<BodyMap> {
        let mut next = bodies.clone();
        let stars: Vec<&CelestialBody> = bodies
            .active_stars()
            .filter(|s| s.physics_state.is_some_and(|p| p.is_finite()))
            .collect();
        if stars.len() < 2 {
            return Ok(next);
        }

        let mut diagnostics = Diagnostics::new("check_and_reassign_planets_to_proper_stars");
        let factor = self.thresholds().planet_reassign_hysteresis;

        for planet in bodies.active().filter(|b| b.kind.is_planetary()) {
            let Some(current) = planet.current_parent_id.as_ref() else {
                continue;
            };
            if !diagnostics.check_physics(planet) {
                continue;
            }

            let mut best: Option<(&CelestialBody, f64)> = None;
            for &star in &stars {
                let score = influence(star, planet);
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((star, score));
                }
            }
            let Some((best_star, best_score)) = best else {
                continue;
            };

            let current_score = bodies
                .get_active(current)
                .filter(|p| p.is_star())
                .map(|p| influence(p, planet))
                .unwrap_or(0.0);

            if &best_star.id != current && best_score > 0.0 && best_score > factor * current_score
            {
                next.reparent(&planet.id, Some(&best_star.id))?;
                tracing::debug!(
                    body = %planet.id,
                    former = %current,
                    parent = %best_star.id,
                    "planet moved to dominant star"
                );
            }
        }

        Ok(next)
    }
}

/// The star `primary` orbits, if its parent is an active star
fn stellar_reference<'a>(
    primary: &CelestialBody,
    bodies: &'a BodyMap,
) -> Option<&'a CelestialBody> {
    primary
        .effective_parent()
        .and_then(|id| bodies.get_active(id))
        .filter(|p| p.is_star())
}

fn reassign_to_nearest_star(
    next: &mut BodyMap,
    moon: &CelestialBody,
    bodies: &BodyMap,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    match find_nearest_star(moon, bodies) {
        Some(star) => {
            tracing::debug!(body = %moon.id, parent = %star, "moon reassigned to nearest star");
            next.reparent(&moon.id, Some(&star))
        }
        None => {
            diagnostics.report(&moon.id, Issue::NoViableParent);
            Ok(())
        }
    }
}
