//! Firefly algorithm configuration
//!
//! One configuration struct covers the parameters shared by every variant;
//! variant-specific extras live in [`Variant`].

use serde::{Deserialize, Serialize};

use crate::levy::DEFAULT_LEVY_BETA;
use crate::{Error, Result};

/// Default randomness decay rate for [`Variant::DecayingAlpha`]
pub const DEFAULT_THETA: f64 = 0.97;
/// Default elite fraction for [`Variant::ElitistAttractor`]
pub const DEFAULT_ELITE_FRACTION: f64 = 0.1;
/// Smallest elite set protected by [`Variant::ElitistAttractor`]
pub const MIN_ELITE_SIZE: usize = 3;

/// Firefly Algorithm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireflyConfig {
    /// Number of fireflies
    pub population_size: usize,
    /// Number of generations to run
    pub max_generations: usize,
    /// Randomization parameter
    pub alpha: f64,
    /// Attractiveness at distance 0
    pub beta_0: f64,
    /// Attractiveness floor
    pub beta_min: f64,
    /// Light absorption coefficient
    pub gamma: f64,
    /// Shrink alpha every generation (fixed-alpha variants only)
    #[serde(default)]
    pub alpha_annealing: bool,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            population_size: 25,
            max_generations: 25,
            alpha: 0.7,
            beta_0: 1.0,
            beta_min: 0.2,
            gamma: 1.0,
            alpha_annealing: false,
        }
    }
}

impl FireflyConfig {
    /// Create a new config builder
    pub fn builder() -> FireflyConfigBuilder {
        FireflyConfigBuilder::new()
    }

    /// Attractiveness ceiling `beta_0 - beta_min`
    pub fn attractiveness_range(&self) -> f64 {
        self.beta_0 - self.beta_min
    }

    /// Static evaluation budget `population_size * max_generations`
    pub fn evaluation_budget(&self) -> u64 {
        self.population_size as u64 * self.max_generations as u64
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::invalid("population_size", "must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(Error::invalid("max_generations", "must be at least 1"));
        }
        if !(self.alpha > 0.0) || !self.alpha.is_finite() {
            return Err(Error::invalid("alpha", "must be a positive finite number"));
        }
        if !(0.0..1.0).contains(&self.beta_min) {
            return Err(Error::invalid("beta_min", "must lie in [0, 1)"));
        }
        if !(self.beta_0 >= self.beta_min) || !self.beta_0.is_finite() {
            return Err(Error::invalid("beta_0", "must be finite and at least beta_min"));
        }
        if !(self.gamma >= 0.0) || !self.gamma.is_finite() {
            return Err(Error::invalid("gamma", "must be a non-negative finite number"));
        }
        Ok(())
    }
}

/// Builder for [`FireflyConfig`]
#[derive(Debug, Default)]
pub struct FireflyConfigBuilder {
    config: FireflyConfig,
}

impl FireflyConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of fireflies
    pub fn population_size(mut self, n: usize) -> Self {
        self.config.population_size = n;
        self
    }

    /// Set the number of generations
    pub fn max_generations(mut self, generations: usize) -> Self {
        self.config.max_generations = generations;
        self
    }

    /// Set the randomization parameter
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Set the attractiveness at distance 0
    pub fn beta_0(mut self, beta_0: f64) -> Self {
        self.config.beta_0 = beta_0;
        self
    }

    /// Set the attractiveness floor
    pub fn beta_min(mut self, beta_min: f64) -> Self {
        self.config.beta_min = beta_min;
        self
    }

    /// Set the light absorption coefficient
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    /// Enable per-generation alpha annealing
    pub fn alpha_annealing(mut self, enabled: bool) -> Self {
        self.config.alpha_annealing = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> FireflyConfig {
        self.config
    }
}

/// Firefly algorithm variant
///
/// All variants share the pairwise attraction and greedy acceptance kernel;
/// they differ in the perturbation source and parameter schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// Uniform perturbation, fixed parameters
    #[default]
    Standard,
    /// Gaussian, distance-damped perturbation with geometric alpha decay
    /// and a shrinking attractiveness ceiling
    DecayingAlpha {
        /// Per-generation decay factor
        theta: f64,
    },
    /// Heavy-tailed Mantegna Lévy perturbation
    LevyFlight {
        /// Stability exponent in `(0, 2]`
        beta: f64,
    },
    /// Uniform perturbation, oscillating absorption, a pull toward the
    /// best-so-far layout and rollback protection for the elite
    ElitistAttractor {
        /// Fraction of the population protected from regression
        elite_fraction: f64,
    },
}

impl Variant {
    /// Decaying-alpha variant with the default decay rate
    pub fn decaying_alpha() -> Self {
        Self::DecayingAlpha {
            theta: DEFAULT_THETA,
        }
    }

    /// Lévy-flight variant with the default exponent
    pub fn levy_flight() -> Self {
        Self::LevyFlight {
            beta: DEFAULT_LEVY_BETA,
        }
    }

    /// Elitist-attractor variant with the default elite fraction
    pub fn elitist_attractor() -> Self {
        Self::ElitistAttractor {
            elite_fraction: DEFAULT_ELITE_FRACTION,
        }
    }

    /// All four variants with default extras
    pub fn all() -> [Variant; 4] {
        [
            Self::Standard,
            Self::decaying_alpha(),
            Self::levy_flight(),
            Self::elitist_attractor(),
        ]
    }

    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::DecayingAlpha { .. } => "decaying-alpha",
            Self::LevyFlight { .. } => "levy-flight",
            Self::ElitistAttractor { .. } => "elitist-attractor",
        }
    }

    /// Whether alpha stays fixed (before optional annealing)
    pub fn has_fixed_alpha(&self) -> bool {
        !matches!(self, Self::DecayingAlpha { .. })
    }

    /// Number of elite individuals protected in a population of `n`
    pub fn elite_size(&self, n: usize) -> usize {
        match self {
            Self::ElitistAttractor { elite_fraction } => {
                let by_fraction = (n as f64 * elite_fraction).floor() as usize;
                by_fraction.max(MIN_ELITE_SIZE).min(n)
            }
            _ => 0,
        }
    }

    /// Check the variant extras
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Standard => Ok(()),
            Self::DecayingAlpha { theta } => {
                if theta > 0.0 && theta <= 1.0 {
                    Ok(())
                } else {
                    Err(Error::invalid("theta", "must lie in (0, 1]"))
                }
            }
            Self::LevyFlight { beta } => {
                if beta > 0.0 && beta <= 2.0 {
                    Ok(())
                } else {
                    Err(Error::invalid("levy_beta", "must lie in (0, 2]"))
                }
            }
            Self::ElitistAttractor { elite_fraction } => {
                if (0.0..=1.0).contains(&elite_fraction) {
                    Ok(())
                } else {
                    Err(Error::invalid("elite_fraction", "must lie in [0, 1]"))
                }
            }
        }
    }
}

impl core::fmt::Display for Variant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
