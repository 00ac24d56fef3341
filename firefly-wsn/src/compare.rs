//! Side-by-side runs of every movement variant.
//!
//! Each variant starts from its own random stream seeded with the same
//! value, so initial populations are identical and only the movement
//! policy differs.

use serde::{Deserialize, Serialize};

use crate::{CoverageProblem, Deployment, DeploymentConfig, FireflyConfig, Result, Variant};

/// Result of one variant in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOutcome {
    pub variant: Variant,
    /// Coverage of the returned layout
    pub coverage: f64,
    /// Best coverage seen in any generation
    pub peak_coverage: f64,
    /// Fitness evaluations actually performed
    pub fitness_calls: u64,
    /// Best coverage per generation
    pub convergence: Vec<f64>,
}

/// All variants on one problem, brightest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantComparison {
    pub problem: CoverageProblem,
    pub config: FireflyConfig,
    pub rng_seed: u64,
    pub outcomes: Vec<VariantOutcome>,
}

impl VariantComparison {
    /// Variant with the highest final coverage
    pub fn winner(&self) -> Option<&VariantOutcome> {
        self.outcomes.first()
    }

    /// Outcome for the variant with the given [`Variant::name`]
    pub fn get(&self, name: &str) -> Option<&VariantOutcome> {
        self.outcomes.iter().find(|o| o.variant.name() == name)
    }
}

/// Run all four variants and rank them by final coverage.
///
/// Ties keep the order of [`Variant::all`].
pub fn compare_variants(
    problem: CoverageProblem,
    config: &FireflyConfig,
    rng_seed: u64,
) -> Result<VariantComparison> {
    let mut outcomes = Vec::with_capacity(4);
    for variant in Variant::all() {
        let report = Deployment::new(DeploymentConfig {
            problem,
            config: config.clone(),
            variant,
            rng_seed,
        })
        .run()?;

        tracing::info!(
            variant = %variant,
            coverage = report.coverage(),
            "variant finished"
        );
        outcomes.push(VariantOutcome {
            variant,
            coverage: report.result.best_fitness,
            peak_coverage: report.result.peak_fitness(),
            fitness_calls: report.result.fitness_calls,
            convergence: report.result.convergence,
        });
    }

    outcomes.sort_by(|a, b| {
        b.coverage
            .partial_cmp(&a.coverage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(VariantComparison {
        problem,
        config: config.clone(),
        rng_seed,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> (CoverageProblem, FireflyConfig) {
        let problem = CoverageProblem::default()
            .with_sensor_count(8)
            .with_radius(12.0)
            .with_grid_resolution(16);
        let config = FireflyConfig::builder()
            .population_size(5)
            .max_generations(3)
            .build();
        (problem, config)
    }

    #[test]
    fn every_variant_is_ranked() {
        let (problem, config) = tiny();
        let comparison = compare_variants(problem, &config, 3).unwrap();

        assert_eq!(comparison.outcomes.len(), 4);
        for name in ["standard", "decaying-alpha", "levy-flight", "elitist-attractor"] {
            assert!(comparison.get(name).is_some(), "missing {name}");
        }
        for pair in comparison.outcomes.windows(2) {
            assert!(pair[0].coverage >= pair[1].coverage);
        }
        let winner = comparison.winner().unwrap();
        assert!(winner.peak_coverage >= winner.coverage);
        assert!(comparison
            .outcomes
            .iter()
            .all(|o| o.convergence.len() == 3));
    }

    #[test]
    fn comparison_is_reproducible() {
        let (problem, config) = tiny();
        let a = compare_variants(problem, &config, 11).unwrap();
        let b = compare_variants(problem, &config, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_generation_is_shared() {
        // Same seed, same initial population: the first recorded best is
        // identical for every variant.
        let (problem, config) = tiny();
        let comparison = compare_variants(problem, &config, 4).unwrap();
        let first = comparison.outcomes[0].convergence[0];
        assert!(comparison
            .outcomes
            .iter()
            .all(|o| o.convergence[0] == first));
    }
}
