//! # Firefly WSN Core
//!
//! Firefly-inspired population optimizers for wireless sensor network
//! coverage placement.
//!
//! This crate provides:
//! - Sensor layouts, bounds enforcement and population initialization
//! - A deterministic grid-sampled coverage evaluator
//! - Four movement strategies (Standard, Decaying-Alpha, Lévy-Flight,
//!   Elitist-Attractor) sharing one pairwise attraction kernel
//! - The generation loop that ties them together
//!
//! ## Quick Start
//!
//! ```rust
//! use firefly_wsn_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let problem = CoverageProblem::default()
//!     .with_sensor_count(10)
//!     .with_grid_resolution(20);
//! let lower = vec![0.0; 10];
//! let upper = vec![problem.area_side; 10];
//! let config = FireflyConfig::builder()
//!     .population_size(5)
//!     .max_generations(3)
//!     .build();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let result = optimize(None, &lower, &upper, &config, Variant::Standard, problem, &mut rng)?;
//! assert_eq!(result.convergence.len(), 3);
//! assert!((0.0..=1.0).contains(&result.best_fitness));
//! # Ok::<(), firefly_wsn_core::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod algorithms;
pub mod bounds;
pub mod coverage;
pub mod layout;
pub mod levy;
pub mod movement;
pub mod optimizer;
pub mod population;
pub mod schedule;
pub mod traits;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::*;
    pub use crate::bounds::Bounds;
    pub use crate::coverage::{CoverageGrid, CoverageProblem};
    pub use crate::layout::Layout;
    pub use crate::optimizer::{optimize, FireflyOptimizer, OptimizationResult};
    pub use crate::population::{GenerationSnapshot, Population};
    pub use crate::traits::*;
    pub use crate::{Error, Result};
}

/// Result type for firefly optimizer operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for firefly optimizer configuration
///
/// Every variant is a configuration problem detected before a run starts.
/// Nothing inside the generation loop is fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Lower and upper bound vectors differ in length
    #[error("simple bounds are improper: lower has {lower} entries, upper has {upper}")]
    BoundsMismatch { lower: usize, upper: usize },
    /// A vector disagrees with the problem dimensionality
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A configuration value is out of range
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Bounds are absent and no seed layout was supplied
    #[error("a seed layout is required when bounds are absent")]
    MissingSeed,
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        Error::InvalidParameter { name, reason }
    }
}
