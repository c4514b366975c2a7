//! The authoritative body map
//!
//! Reconciliation passes never edit the map they read. They clone it, apply
//! guarded writes to the clone and hand the clone back; the engine swaps it
//! in whole. Iteration is always in id order so that every pass is
//! reproducible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::body::{BodyId, BodyKind, CelestialBody};
use crate::error::{HierarchyError, HierarchyViolation, Result};

/// Bodies keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyMap {
    bodies: BTreeMap<BodyId, CelestialBody>,
}

impl BodyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a body, returning the one it replaced
    pub fn insert(&mut self, body: CelestialBody) -> Option<CelestialBody> {
        self.bodies.insert(body.id.clone(), body)
    }

    pub fn get(&self, id: &BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(id)
    }

    pub fn contains(&self, id: &BodyId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All bodies in id order, terminal ones included
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.values()
    }

    /// Looks up `id` and returns the body only if it is active
    pub fn get_active(&self, id: &BodyId) -> Option<&CelestialBody> {
        self.get(id).filter(|b| b.is_active())
    }

    pub fn is_active(&self, id: &BodyId) -> bool {
        self.get_active(id).is_some()
    }

    pub fn active(&self) -> impl Iterator<Item = &CelestialBody> {
        self.iter().filter(|b| b.is_active())
    }

    pub fn active_of_kind(&self, kind: BodyKind) -> impl Iterator<Item = &CelestialBody> {
        self.active().filter(move |b| b.kind == kind)
    }

    pub fn active_stars(&self) -> impl Iterator<Item = &CelestialBody> {
        self.active_of_kind(BodyKind::Star)
    }

    /// The hierarchy root: the active, parentless star flagged as main
    pub fn main_star(&self) -> Option<&CelestialBody> {
        self.active_stars()
            .find(|s| s.is_main_star && s.current_parent_id.is_none())
    }

    /// Points both parent links of `id` at `parent`
    ///
    /// Refuses to create a self reference or a link to a missing or
    /// terminal body. `None` makes the body parentless.
    pub fn reparent(&mut self, id: &BodyId, parent: Option<&BodyId>) -> Result<()> {
        if let Some(parent) = parent {
            if parent == id {
                return Err(HierarchyError::SelfParent(id.clone()));
            }
            match self.get(parent) {
                None => return Err(HierarchyError::UnknownBody(parent.clone())),
                Some(p) if !p.is_active() => {
                    return Err(HierarchyError::InactiveParent {
                        body: id.clone(),
                        parent: parent.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        let body = self
            .bodies
            .get_mut(id)
            .ok_or_else(|| HierarchyError::UnknownBody(id.clone()))?;
        body.parent_id = parent.cloned();
        body.current_parent_id = parent.cloned();
        Ok(())
    }

    /// Makes `id` the hierarchy root
    ///
    /// The promoted star loses its parents; every other star loses the
    /// main-star flag so that at most one root exists.
    pub fn promote_main_star(&mut self, id: &BodyId) -> Result<()> {
        match self.get(id) {
            None => return Err(HierarchyError::UnknownBody(id.clone())),
            Some(b) if !b.is_active() || !b.is_star() => {
                return Err(HierarchyError::NotAnActiveStar(id.clone()));
            }
            Some(_) => {}
        }

        for body in self.bodies.values_mut().filter(|b| b.is_star()) {
            body.is_main_star = false;
        }
        if let Some(star) = self.bodies.get_mut(id) {
            star.is_main_star = true;
            star.parent_id = None;
            star.current_parent_id = None;
        }
        Ok(())
    }
}

impl FromIterator<CelestialBody> for BodyMap {
    fn from_iter<T: IntoIterator<Item = CelestialBody>>(iter: T) -> Self {
        Self {
            bodies: iter.into_iter().map(|b| (b.id.clone(), b)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BodyMap {
    type Item = &'a CelestialBody;
    type IntoIter = std::collections::btree_map::Values<'a, BodyId, CelestialBody>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.values()
    }
}

/// Check hierarchy well-formedness
///
/// Every active body with a live parent must point at another, active body,
/// and whenever an active star exists exactly one active star must be the
/// parentless main star.
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{validate_hierarchy, BodyKind, BodyMap, CelestialBody};
///
/// let map: BodyMap = [
///     CelestialBody::new("sun", BodyKind::Star, 1.989e30, 6.96e8).as_main_star(),
///     CelestialBody::new("earth", BodyKind::Planet, 5.972e24, 6.371e6).with_parent("sun"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert!(validate_hierarchy(&map).is_empty());
/// ```
pub fn validate_hierarchy(map: &BodyMap) -> Vec<HierarchyViolation> {
    let mut violations: Vec<HierarchyViolation> = map
        .active()
        .filter_map(|body| {
            let parent = body.current_parent_id.as_ref()?;
            if parent == &body.id {
                return Some(HierarchyViolation::SelfParent(body.id.clone()));
            }
            match map.get(parent) {
                None => Some(HierarchyViolation::DanglingParent {
                    body: body.id.clone(),
                    parent: parent.clone(),
                }),
                Some(p) if !p.is_active() => Some(HierarchyViolation::InactiveParent {
                    body: body.id.clone(),
                    parent: parent.clone(),
                }),
                Some(_) => None,
            }
        })
        .collect();

    let roots: Vec<BodyId> = map
        .active_stars()
        .filter(|s| s.is_main_star && s.current_parent_id.is_none())
        .map(|s| s.id.clone())
        .collect();

    if map.active_stars().next().is_some() {
        match roots.len() {
            0 => violations.push(HierarchyViolation::MissingRoot),
            1 => {}
            _ => violations.push(HierarchyViolation::MultipleRoots(roots)),
        }
    }

    violations
}
