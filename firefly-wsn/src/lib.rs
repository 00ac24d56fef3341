//! # Firefly WSN
//!
//! **Sensor placement for wireless sensor networks with firefly-inspired
//! optimizers.**
//!
//! A deployment places `S` sensors of sensing radius `R` on a square field
//! of side `A` so that as much of the field as possible is covered. This
//! crate wraps the engine in [`firefly_wsn_core`] with a deployment builder,
//! a side-by-side comparison of the four movement variants and JSON
//! reporting.
//!
//! ## Quick Start
//!
//! ```rust
//! use firefly_wsn::prelude::*;
//!
//! let report = Deployment::builder()
//!     .problem(
//!         CoverageProblem::default()
//!             .with_sensor_count(10)
//!             .with_grid_resolution(20),
//!     )
//!     .config(
//!         FireflyConfig::builder()
//!             .population_size(5)
//!             .max_generations(3)
//!             .build(),
//!     )
//!     .variant(Variant::levy_flight())
//!     .rng_seed(7)
//!     .build()
//!     .run()?;
//!
//! assert_eq!(report.result.convergence.len(), 3);
//! # Ok::<(), firefly_wsn::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - [`firefly_wsn_core`]: Layouts, coverage evaluation and the optimizer
//! - [`compare`]: Run every variant on the same problem
//! - [`report`]: JSON and plain-text output

#![forbid(unsafe_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

// Re-export the engine
pub use firefly_wsn_core as core;

pub use firefly_wsn_core::{
    algorithms::{FireflyConfig, FireflyConfigBuilder, Variant},
    bounds::Bounds,
    coverage::CoverageProblem,
    layout::Layout,
    optimizer::{FireflyOptimizer, GenerationStats, OptimizationResult},
    Error, Result,
};

pub mod compare;
pub mod report;

/// Prelude module for convenient imports
///
/// ```rust
/// use firefly_wsn::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::prelude::*;

    pub use crate::compare::{compare_variants, VariantComparison, VariantOutcome};
    pub use crate::{Deployment, DeploymentBuilder, DeploymentConfig, DeploymentReport};
}

/// Default seed for the random stream of a deployment
pub const DEFAULT_RNG_SEED: u64 = 42;

/// Everything needed to reproduce one deployment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Field, sensors and coverage sampling
    pub problem: CoverageProblem,
    /// Optimizer parameters
    pub config: FireflyConfig,
    /// Movement variant
    pub variant: Variant,
    /// Seed for the single random stream of the run
    pub rng_seed: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            problem: CoverageProblem::default(),
            config: FireflyConfig::default(),
            variant: Variant::default(),
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Builder for DeploymentConfig
#[derive(Debug, Default)]
pub struct DeploymentBuilder {
    config: DeploymentConfig,
}

impl DeploymentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coverage problem
    pub fn problem(mut self, problem: CoverageProblem) -> Self {
        self.config.problem = problem;
        self
    }

    /// Set the optimizer parameters
    pub fn config(mut self, config: FireflyConfig) -> Self {
        self.config.config = config;
        self
    }

    /// Set the movement variant
    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Set the random seed
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = seed;
        self
    }

    /// Build the deployment
    pub fn build(self) -> Deployment {
        Deployment::new(self.config)
    }
}

/// A sensor deployment on a square field
#[derive(Debug, Clone)]
pub struct Deployment {
    config: DeploymentConfig,
}

impl Deployment {
    /// Create a new deployment builder
    pub fn builder() -> DeploymentBuilder {
        DeploymentBuilder::new()
    }

    /// Create a deployment with the given configuration
    pub fn new(config: DeploymentConfig) -> Self {
        Self { config }
    }

    /// Get the deployment configuration
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Per-sensor bounds `[0, A]` on both axes
    pub fn bounds(&self) -> Bounds {
        let problem = &self.config.problem;
        Bounds::uniform(problem.sensor_count, 0.0, problem.area_side)
    }

    /// Seed layout: every sensor at the middle of its bounds
    pub fn seed_layout(&self) -> Layout {
        self.bounds().midpoint()
    }

    /// Run the optimizer once
    pub fn run(&self) -> Result<DeploymentReport> {
        let DeploymentConfig {
            problem,
            ref config,
            variant,
            rng_seed,
        } = self.config;
        problem.validate()?;

        let span = tracing::info_span!("deployment", variant = %variant, rng_seed);
        let _guard = span.enter();

        let bounds = self.bounds();
        let seed = self.seed_layout();
        let mut rng = StdRng::seed_from_u64(rng_seed);
        let result = FireflyOptimizer::new(config.clone(), variant, problem)?.run(
            Some(&seed),
            &bounds,
            &mut rng,
        )?;

        Ok(DeploymentReport {
            deployment: self.config.clone(),
            result,
        })
    }
}

/// Outcome of one deployment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Configuration that produced the result
    pub deployment: DeploymentConfig,
    /// Optimizer output
    pub result: OptimizationResult,
}

impl DeploymentReport {
    /// Final coverage of the returned layout
    pub fn coverage(&self) -> f64 {
        self.result.best_fitness
    }

    /// Sensor positions of the returned layout
    pub fn sensors(&self) -> Vec<(f64, f64)> {
        self.result.best.points().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DeploymentBuilder {
        Deployment::builder()
            .problem(
                CoverageProblem::default()
                    .with_sensor_count(10)
                    .with_radius(10.0)
                    .with_grid_resolution(20),
            )
            .config(
                FireflyConfig::builder()
                    .population_size(6)
                    .max_generations(4)
                    .build(),
            )
    }

    #[test]
    fn builder_defaults() {
        let deployment = Deployment::builder().build();
        let config = deployment.config();
        assert_eq!(config.problem, CoverageProblem::default());
        assert_eq!(config.config.population_size, 25);
        assert_eq!(config.variant, Variant::Standard);
        assert_eq!(config.rng_seed, DEFAULT_RNG_SEED);
    }

    #[test]
    fn bounds_and_seed_cover_the_field() {
        let deployment = small().build();
        let bounds = deployment.bounds();
        assert_eq!(bounds.len(), 10);
        assert_eq!(bounds.range(0), 100.0);

        let seed = deployment.seed_layout();
        assert_eq!(seed.position(9), (50.0, 50.0));
    }

    #[test]
    fn run_is_reproducible() {
        let deployment = small().variant(Variant::decaying_alpha()).rng_seed(5).build();
        let a = deployment.run().unwrap();
        let b = deployment.run().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.sensors().len(), 10);
        assert!((0.0..=1.0).contains(&a.coverage()));
        assert_eq!(a.deployment.variant, Variant::decaying_alpha());
    }

    #[test]
    fn invalid_problem_is_rejected() {
        let err = small()
            .problem(CoverageProblem::default().with_grid_resolution(0))
            .build()
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "grid_resolution",
                ..
            }
        ));
    }
}
