//! Hierarchy reconciliation
//!
//! Rewrites parent links so that the hierarchy follows the physics:
//!
//! - Reactive passes run right after bodies are destroyed and re-home
//!   everything that orbited them.
//! - Periodic passes run on a cadence and catch moons that drifted out of
//!   their planet's grip and planets that now belong to a different star.
//!
//! Every pass reads an immutable snapshot and returns a complete new map.

mod periodic;
mod reactive;


use serde::{Deserialize, Serialize};

use crate::body::BodyId;
use crate::config::{EngineConfig, Thresholds};
use crate::selection::ParentSelector;

/// A single parent reassignment produced by a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentUpdate {
    pub body: BodyId,
    pub parent: BodyId,
}

impl ParentUpdate {
    pub fn new(body: BodyId, parent: BodyId) -> Self {
        Self { body, parent }
    }
}

/// Runs the reactive and periodic reconciliation passes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HierarchyReconciler {
    pub selector: ParentSelector,
}

impl HierarchyReconciler {
    pub fn new(selector: ParentSelector) -> Self {
        Self { selector }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(ParentSelector::from_config(config))
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.selector.thresholds
    }
}
