//! Choosing gravitational parents
//!
//! Parent selection ranks candidates by their influence score. Planets only
//! ever orbit stars and are given to the star with the strongest pull no
//! matter how far away it is. Moons and asteroid fields may also orbit
//! planets, but a non-stellar candidate loses influence exponentially once
//! it is more than a tenth of an AU away, so a distant giant cannot steal a
//! moon from the small world it is actually circling.

use std::collections::BTreeSet;

use crate::body::{BodyId, CelestialBody};
use crate::body_map::BodyMap;
use crate::config::{EngineConfig, IntegratorMode, Thresholds};
use crate::influence::{distance, distance_au, influence};

/// Nearest active star to `body`
///
/// Ties go to the first star in id order. `None` when there is no star or
/// no finite distance (e.g. `body` has no physics state).
pub fn find_nearest_star(body: &CelestialBody, bodies: &BodyMap) -> Option<BodyId> {
    let mut best: Option<(&BodyId, f64)> = None;
    for star in bodies.active_stars().filter(|s| s.id != body.id) {
        let d = distance(body, star);
        if !d.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((&star.id, d));
        }
    }
    best.map(|(id, _)| id.clone())
}

/// Picks parents according to the active integrator mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentSelector {
    pub mode: IntegratorMode,
    pub thresholds: Thresholds,
    /// Allow [`find_new_main_star`](Self::find_new_main_star) to promote a
    /// root in Keplerian mode
    pub promote_root_in_keplerian: bool,
}

impl ParentSelector {
    pub fn new(mode: IntegratorMode) -> Self {
        Self {
            mode,
            thresholds: Thresholds::default(),
            promote_root_in_keplerian: false,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: config.integrator,
            thresholds: config.thresholds,
            promote_root_in_keplerian: config.promote_root_in_keplerian,
        }
    }

    /// Influence of `candidate` on `target` after the distance penalty for
    /// non-stellar candidates
    pub fn weighted_influence(&self, candidate: &CelestialBody, target: &CelestialBody) -> f64 {
        let score = influence(candidate, target);
        if candidate.is_star() {
            return score;
        }
        let d_au = distance_au(candidate, target);
        if d_au > self.thresholds.moon_decay_onset_au {
            score * (-self.thresholds.moon_decay_rate * d_au).exp()
        } else {
            score
        }
    }

    /// Whether `candidate` may parent `target` at all
    fn is_candidate(
        &self,
        candidate: &CelestialBody,
        target: &CelestialBody,
        exclude: &BTreeSet<BodyId>,
    ) -> bool {
        if candidate.id == target.id || exclude.contains(&candidate.id) || !candidate.is_active() {
            return false;
        }
        if !candidate.physics_state.is_some_and(|s| s.is_finite()) {
            return false;
        }
        if target.kind.is_planetary() && !candidate.is_star() {
            return false;
        }
        candidate
            .kind
            .can_host(target.kind, candidate.mass_kg > target.mass_kg)
    }

    /// Best gravitational parent for `target`, ignoring `exclude`
    ///
    /// In coupled N-body modes every eligible candidate is ranked by
    /// [`weighted_influence`](Self::weighted_influence); ties go to the first
    /// candidate in id order. In Keplerian mode nothing is recomputed: the
    /// current parent is kept if it is still valid.
    ///
    /// # Returns
    ///
    /// `None` when no candidate exerts positive influence
    ///
    /// # Examples
    ///
    /// ```
    /// use orbital_hierarchy::{
    ///     AU_M, BodyKind, BodyMap, CelestialBody, IntegratorMode, ParentSelector,
    /// };
    /// use nalgebra::{Point3, Vector3};
    /// use std::collections::BTreeSet;
    ///
    /// let map: BodyMap = [
    ///     CelestialBody::new("a", BodyKind::Star, 2.0e30, 7.0e8)
    ///         .with_physics(Point3::origin(), Vector3::zeros())
    ///         .as_main_star(),
    ///     CelestialBody::new("b", BodyKind::Star, 1.0e30, 7.0e8)
    ///         .with_physics(Point3::new(5.0 * AU_M, 0.0, 0.0), Vector3::zeros())
    ///         .with_parent("a"),
    ///     CelestialBody::new("p", BodyKind::Planet, 6.0e24, 6.4e6)
    ///         .with_physics(Point3::new(4.0 * AU_M, 0.0, 0.0), Vector3::zeros())
    ///         .with_parent("a"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let selector = ParentSelector::new(IntegratorMode::VerletNBody);
    /// let planet = map.get(&"p".into()).unwrap();
    /// let parent = selector.find_best_gravitational_parent(planet, &map, &BTreeSet::new());
    ///
    /// // 1e30 / 1² beats 2e30 / 4²
    /// assert_eq!(parent.as_ref().map(|id| id.as_str()), Some("b"));
    /// ```
    pub fn find_best_gravitational_parent(
        &self,
        target: &CelestialBody,
        bodies: &BodyMap,
        exclude: &BTreeSet<BodyId>,
    ) -> Option<BodyId> {
        if !self.mode.is_n_body() {
            return target
                .current_parent_id
                .as_ref()
                .filter(|id| *id != &target.id && !exclude.contains(*id) && bodies.is_active(id))
                .cloned();
        }

        let mut best: Option<(&BodyId, f64)> = None;
        for candidate in bodies
            .active()
            .filter(|c| self.is_candidate(c, target, exclude))
        {
            let score = self.weighted_influence(candidate, target);
            if !score.is_finite() || score <= 0.0 {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((&candidate.id, score));
            }
        }
        best.map(|(id, _)| id.clone())
    }

    /// Most massive active star not in `exclude`, to become the new root
    ///
    /// Returns `None` in Keplerian mode unless root promotion is enabled
    /// for it: there the root is authored externally.
    pub fn find_new_main_star(
        &self,
        bodies: &BodyMap,
        exclude: &BTreeSet<BodyId>,
    ) -> Option<BodyId> {
        if !self.mode.is_n_body() && !self.promote_root_in_keplerian {
            return None;
        }

        let mut best: Option<&CelestialBody> = None;
        for star in bodies.active_stars().filter(|s| !exclude.contains(&s.id)) {
            if best.is_none_or(|b| star.mass_kg > b.mass_kg) {
                best = Some(star);
            }
        }
        best.map(|s| s.id.clone())
    }
}

impl Default for ParentSelector {
    fn default() -> Self {
        Self::new(IntegratorMode::default())
    }
}
