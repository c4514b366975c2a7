//! Rate-limited per-pass diagnostics
//!
//! A reconciliation pass can touch the same broken body many times (once per
//! candidate comparison). Each (body, issue) pair is reported once per pass.

use std::collections::HashSet;

use crate::body::{BodyId, CelestialBody};

/// Kind of per-body problem a pass can run into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    MissingPhysicsState,
    NonFiniteState,
    NoViableParent,
}

/// Diagnostics collected during one pass
#[derive(Debug, Default)]
pub struct Diagnostics {
    pass: &'static str,
    reported: HashSet<(BodyId, Issue)>,
}

impl Diagnostics {
    pub fn new(pass: &'static str) -> Self {
        Self {
            pass,
            reported: HashSet::new(),
        }
    }

    /// Emit a warning for `(id, issue)` unless already emitted in this pass
    ///
    /// Returns true if the warning was emitted.
    pub fn report(&mut self, id: &BodyId, issue: Issue) -> bool {
        if !self.reported.insert((id.clone(), issue)) {
            return false;
        }
        match issue {
            Issue::MissingPhysicsState => {
                tracing::warn!(pass = self.pass, body = %id, "body has no physics state, skipped")
            }
            Issue::NonFiniteState => {
                tracing::warn!(pass = self.pass, body = %id, "non-finite physics state, skipped")
            }
            Issue::NoViableParent => {
                tracing::warn!(pass = self.pass, body = %id, "no viable parent found")
            }
        }
        true
    }

    /// Returns true when `body` can take part in geometric computations,
    /// reporting it otherwise
    pub fn check_physics(&mut self, body: &CelestialBody) -> bool {
        match &body.physics_state {
            None => {
                self.report(&body.id, Issue::MissingPhysicsState);
                false
            }
            Some(state) if !state.is_finite() => {
                self.report(&body.id, Issue::NonFiniteState);
                false
            }
            Some(_) => true,
        }
    }

    pub fn count(&self) -> usize {
        self.reported.len()
    }

    pub fn has_reported(&self, id: &BodyId, issue: Issue) -> bool {
        self.reported.contains(&(id.clone(), issue))
    }
}
