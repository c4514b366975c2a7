//! Reconciliation in response to destruction

use std::collections::BTreeSet;

use super::{HierarchyReconciler, ParentUpdate};
use crate::body::{BodyId, BodyKind, CelestialBody};
use crate::body_map::BodyMap;
use crate::boundary::can_capture;
use crate::diagnostics::{Diagnostics, Issue};
use crate::error::{HierarchyError, Result};
use crate::selection::find_nearest_star;

impl HierarchyReconciler {
    /// Re-home every body orphaned by this tick's destructions
    ///
    /// Bodies in `destroyed_ids` are expected to be terminal already (the
    /// cascade runs first). In order:
    ///
    /// 1. If the main star died, promote the most massive surviving star and
    ///    repoint the old root's stellar children at it.
    /// 2. Planets and gas giants of dead stars get their best stellar parent,
    ///    or no parent at all if none is viable.
    /// 3. Moons of dead planets follow the orphaned-moon protocol.
    /// 4. Anything else still pointing at a terminal body is swept up.
    ///
    /// # Errors
    ///
    /// [`HierarchyError::AnchorLost`] when the main star died and no star can
    /// replace it. Guarded writes may also fail on an internal invariant
    /// breach. Either way the pass is abandoned.
    pub fn reassign_orphaned_objects(
        &self,
        destroyed_ids: &BTreeSet<BodyId>,
        bodies: &BodyMap,
    ) -> Result<BodyMap> {
        if destroyed_ids.is_empty() {
            return Ok(bodies.clone());
        }

        let mut diagnostics = Diagnostics::new("reassign_orphaned_objects");
        let mut next = bodies.clone();

        let destroyed_of = |pred: fn(&CelestialBody) -> bool| -> BTreeSet<BodyId> {
            destroyed_ids
                .iter()
                .filter(|id| bodies.get(id).is_some_and(pred))
                .cloned()
                .collect()
        };
        let destroyed_stars = destroyed_of(|b| b.is_star());
        let destroyed_planets = destroyed_of(|b| b.kind.is_planetary());

        // Root replacement. A parentless star only stands in for the root when
        // no flagged main star survives.
        let root_survives = bodies
            .active_stars()
            .any(|s| s.is_main_star && !destroyed_stars.contains(&s.id));
        let was = |pred: fn(&CelestialBody) -> bool| {
            destroyed_stars
                .iter()
                .find(|id| bodies.get(id).is_some_and(pred))
        };
        let old_root = was(|s| s.is_main_star).or_else(|| {
            (!root_survives)
                .then(|| was(|s| s.current_parent_id.is_none()))
                .flatten()
        });
        if let Some(old_root) = old_root {
            let Some(new_root) = self.selector.find_new_main_star(bodies, &destroyed_stars)
            else {
                tracing::error!(
                    destroyed = %old_root,
                    "main star destroyed and no star can replace it"
                );
                return Err(HierarchyError::AnchorLost);
            };

            next.promote_main_star(&new_root)?;
            tracing::info!(old = %old_root, new = %new_root, "promoted new main star");

            for star in bodies
                .active_stars()
                .filter(|s| s.id != new_root && s.is_child_of(old_root))
            {
                next.reparent(&star.id, Some(&new_root))?;
                tracing::debug!(body = %star.id, parent = %new_root, "star repointed to new root");
            }
        }

        // Planets of dead stars
        for planet in bodies.active().filter(|b| b.kind.is_planetary()) {
            let orphaned = planet
                .effective_parent()
                .is_some_and(|p| destroyed_stars.contains(p));
            if !orphaned || !diagnostics.check_physics(planet) {
                continue;
            }

            let parent = self
                .selector
                .find_best_gravitational_parent(planet, bodies, destroyed_ids);
            if parent.is_none() {
                diagnostics.report(&planet.id, Issue::NoViableParent);
            }
            next.reparent(&planet.id, parent.as_ref())?;
            tracing::debug!(body = %planet.id, parent = ?parent, "orphaned planet reassigned");
        }

        // Moons of dead planets
        for planet_id in &destroyed_planets {
            let moons: Vec<BodyId> = bodies
                .active_of_kind(BodyKind::Moon)
                .filter(|m| m.is_child_of(planet_id))
                .map(|m| m.id.clone())
                .collect();
            for update in self.orphaned_moon_updates(&moons, bodies, planet_id, &mut diagnostics) {
                next.reparent(&update.body, Some(&update.parent))?;
            }
        }

        self.sweep_orphans(&mut next, destroyed_ids, &mut diagnostics)?;

        Ok(next)
    }

    /// Parent updates for the moons of a destroyed planet
    ///
    /// The most massive moon becomes the centre of a new system: every
    /// other moon it can capture is handed to it, and it goes to its nearest
    /// star. Moons it cannot capture go to their own nearest star.
    pub fn reassign_orphaned_moons(
        &self,
        moons: &[BodyId],
        bodies: &BodyMap,
        destroyed_primary: &BodyId,
    ) -> Vec<ParentUpdate> {
        let mut diagnostics = Diagnostics::new("reassign_orphaned_moons");
        self.orphaned_moon_updates(moons, bodies, destroyed_primary, &mut diagnostics)
    }

    fn orphaned_moon_updates(
        &self,
        moons: &[BodyId],
        bodies: &BodyMap,
        destroyed_primary: &BodyId,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ParentUpdate> {
        let mut moons: Vec<&CelestialBody> =
            moons.iter().filter_map(|id| bodies.get_active(id)).collect();
        // Stable sort, equal masses keep id order
        moons.sort_by(|a, b| b.mass_kg.total_cmp(&a.mass_kg));

        let mut updates = Vec::new();
        let mut to_nearest_star = |moon: &CelestialBody, updates: &mut Vec<ParentUpdate>| {
            if !diagnostics.check_physics(moon) {
                return;
            }
            match find_nearest_star(moon, bodies) {
                Some(star) => updates.push(ParentUpdate::new(moon.id.clone(), star)),
                None => {
                    diagnostics.report(&moon.id, Issue::NoViableParent);
                }
            }
        };

        match moons.as_slice() {
            [] => {}
            [only] => to_nearest_star(*only, &mut updates),
            [largest, rest @ ..] => {
                let star = find_nearest_star(largest, bodies).and_then(|id| bodies.get_active(&id));
                for moon in rest {
                    if star.is_some_and(|s| can_capture(largest, moon, s)) {
                        tracing::debug!(
                            body = %moon.id,
                            parent = %largest.id,
                            former = %destroyed_primary,
                            "moon captured by surviving sibling"
                        );
                        updates.push(ParentUpdate::new(moon.id.clone(), largest.id.clone()));
                    } else {
                        to_nearest_star(*moon, &mut updates);
                    }
                }
                to_nearest_star(*largest, &mut updates);
            }
        }

        updates
    }

    /// Repair active bodies still pointing at a terminal or destroyed parent
    ///
    /// Stars go to the root, moons to their nearest star, everything else to
    /// its best gravitational parent or failing that (N-body modes only) its
    /// nearest star. Ring systems follow their owner through the cascade and
    /// are left alone.
    fn sweep_orphans(
        &self,
        next: &mut BodyMap,
        destroyed_ids: &BTreeSet<BodyId>,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let snapshot = next.clone();
        let orphans = snapshot.active().filter(|b| {
            b.kind != BodyKind::RingSystem
                && !destroyed_ids.contains(&b.id)
                && b.current_parent_id
                    .as_ref()
                    .is_some_and(|p| destroyed_ids.contains(p) || !snapshot.is_active(p))
        });

        for body in orphans {
            let parent = match body.kind {
                BodyKind::Star => snapshot
                    .main_star()
                    .map(|root| root.id.clone())
                    .filter(|root| root != &body.id),
                BodyKind::Moon => {
                    if !diagnostics.check_physics(body) {
                        continue;
                    }
                    find_nearest_star(body, &snapshot)
                }
                BodyKind::Planet
                | BodyKind::GasGiant
                | BodyKind::DwarfPlanet
                | BodyKind::AsteroidField
                | BodyKind::OortCloud
                | BodyKind::RingSystem => {
                    if !diagnostics.check_physics(body) {
                        continue;
                    }
                    let best = self.selector.find_best_gravitational_parent(
                        body,
                        &snapshot,
                        destroyed_ids,
                    );
                    // Keplerian mode never falls back to live geometry
                    if self.selector.mode.is_n_body() {
                        best.or_else(|| find_nearest_star(body, &snapshot))
                    } else {
                        best
                    }
                }
            };

            if parent.is_none() {
                diagnostics.report(&body.id, Issue::NoViableParent);
            }
            next.reparent(&body.id, parent.as_ref())?;
            tracing::debug!(body = %body.id, parent = ?parent, "orphan swept");
        }
        Ok(())
    }
}
