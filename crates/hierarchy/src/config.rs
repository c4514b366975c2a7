//! Engine configuration

use serde::{Deserialize, Serialize};

/// Numerical integration scheme currently driving the simulation
///
/// Under the two-body Keplerian approximation orbital parameters only make
/// sense relative to a fixed parent, so live parent recomputation is
/// disabled in that mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorMode {
    TwoBodyKeplerian,
    SymplecticNBody,
    #[default]
    VerletNBody,
}

impl IntegratorMode {
    /// Whether bodies are integrated as a fully coupled N-body system
    pub fn is_n_body(self) -> bool {
        match self {
            Self::TwoBodyKeplerian => false,
            Self::SymplecticNBody | Self::VerletNBody => true,
        }
    }
}

/// Decision margins used by parent selection and the periodic passes
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::Thresholds;
///
/// let thresholds = Thresholds::default();
/// assert_eq!(thresholds.escape_hysteresis, 2.0);
/// assert_eq!(thresholds.planet_reassign_hysteresis, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    /// Multiple of the Hill radius an unbound moon must exceed before it is
    /// handed to a star
    pub escape_hysteresis: f64,

    /// Factor by which a rival star's influence must beat the current
    /// parent's before a planet changes star
    pub planet_reassign_hysteresis: f64,

    /// A moon is unbound when any star pulls harder than this multiple of
    /// its planet's pull
    pub star_dominance_ratio: f64,

    /// Exponential decay rate (per AU) applied to non-stellar candidate
    /// parents beyond `moon_decay_onset_au`
    pub moon_decay_rate: f64,

    /// Distance (AU) below which non-stellar candidates are not penalised
    pub moon_decay_onset_au: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            escape_hysteresis: 2.0,
            planet_reassign_hysteresis: 1.5,
            star_dominance_ratio: 3.0,
            moon_decay_rate: 10.0,
            moon_decay_onset_au: 0.1,
        }
    }
}

/// Configuration of a [`HierarchyEngine`](crate::HierarchyEngine)
///
/// # Examples
///
/// ```
/// use orbital_hierarchy::{EngineConfig, IntegratorMode};
///
/// let config = EngineConfig::default()
///     .with_integrator(IntegratorMode::SymplecticNBody)
///     .with_periodic_interval(30);
///
/// assert_eq!(config.periodic_interval(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub integrator: IntegratorMode,

    /// Run the escaped-moon and planet/star passes every N ticks
    pub periodic_interval_ticks: u64,

    pub thresholds: Thresholds,

    /// Choose a replacement root after the main star dies even in
    /// Keplerian mode
    pub promote_root_in_keplerian: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integrator: IntegratorMode::default(),
            periodic_interval_ticks: 60,
            thresholds: Thresholds::default(),
            promote_root_in_keplerian: false,
        }
    }
}

impl EngineConfig {
    pub fn with_integrator(mut self, integrator: IntegratorMode) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_periodic_interval(mut self, ticks: u64) -> Self {
        self.periodic_interval_ticks = ticks;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_root_promotion_in_keplerian(mut self, enabled: bool) -> Self {
        self.promote_root_in_keplerian = enabled;
        self
    }

    /// Periodic cadence in ticks, never zero
    pub fn periodic_interval(&self) -> u64 {
        self.periodic_interval_ticks.max(1)
    }
}
