//! The generation loop
//!
//! Each generation evaluates the population, ranks it, records the best
//! coverage, snapshots the state, runs the variant's movement step, applies
//! elite protection (elitist variant) and clamps everyone back into bounds.
//! After the last generation the population is evaluated once more so the
//! returned fitness belongs to the returned layout.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::algorithms::{FireflyConfig, Variant, MIN_ELITE_SIZE};
use crate::bounds::Bounds;
use crate::coverage::DEFAULT_AREA_SIDE;
use crate::layout::Layout;
use crate::movement::{protect_elite, Attractor, GenerationParams, MoveStats, Movement, Perturbation};
use crate::population::Population;
use crate::schedule;
use crate::traits::{CountingFitness, FitnessFunction};
use crate::{Error, Result};

/// Best layout seen so far across generations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSoFar {
    pub layout: Layout,
    pub fitness: f64,
}

/// Bookkeeping for one finished generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index
    pub generation: usize,
    /// Best coverage at the start of the generation
    pub best_fitness: f64,
    /// Mean coverage at the start of the generation
    pub mean_fitness: f64,
    /// Randomness scale used by the movement step
    pub alpha: f64,
    /// Light absorption coefficient used by the movement step
    pub gamma: f64,
    /// Attractiveness ceiling used by the movement step
    pub ceiling: f64,
    /// Pairwise move counters
    pub moves: MoveStats,
    /// Elite individuals rolled back after the movement step
    pub elite_rollbacks: usize,
}

/// Outcome of an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Variant that produced the result
    pub variant: Variant,
    /// Brightest layout of the final population
    pub best: Layout,
    /// Coverage of `best`
    pub best_fitness: f64,
    /// Static evaluation budget `n * max_generations`
    pub total_evaluations: u64,
    /// Fitness evaluations actually performed
    pub fitness_calls: u64,
    /// Best coverage per generation
    pub convergence: Vec<f64>,
    /// Per-generation details
    pub generations: Vec<GenerationStats>,
}

impl OptimizationResult {
    /// Best coverage in the history (may exceed `best_fitness` when a
    /// later generation lost ground)
    pub fn peak_fitness(&self) -> f64 {
        self.convergence
            .iter()
            .copied()
            .fold(self.best_fitness, f64::max)
    }
}

/// Firefly optimizer for one variant and fitness function
#[derive(Debug, Clone)]
pub struct FireflyOptimizer<F> {
    config: FireflyConfig,
    variant: Variant,
    fitness: F,
}

impl<F: FitnessFunction> FireflyOptimizer<F> {
    /// Create an optimizer, validating the configuration
    pub fn new(config: FireflyConfig, variant: Variant, fitness: F) -> Result<Self> {
        config.validate()?;
        variant.validate()?;
        fitness.validate()?;
        if fitness.dimensions() == 0 {
            return Err(Error::invalid("sensor_count", "must be at least 1"));
        }
        Ok(Self {
            config,
            variant,
            fitness,
        })
    }

    pub fn config(&self) -> &FireflyConfig {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// Run all generations
    pub fn run<R: Rng + ?Sized>(
        &self,
        seed: Option<&Layout>,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Result<OptimizationResult> {
        self.run_observed(seed, bounds, rng, |_, _| {})
    }

    /// Run all generations, calling `observer` after each one with the
    /// generation's stats and the clamped population.
    pub fn run_observed<R, O>(
        &self,
        seed: Option<&Layout>,
        bounds: &Bounds,
        rng: &mut R,
        mut observer: O,
    ) -> Result<OptimizationResult>
    where
        R: Rng + ?Sized,
        O: FnMut(&GenerationStats, &Population),
    {
        let sensors = self.fitness.dimensions();
        if let Some(seed) = seed {
            if seed.sensor_count() != sensors {
                return Err(Error::DimensionMismatch {
                    expected: sensors,
                    actual: seed.sensor_count(),
                });
            }
        }

        let n = self.config.population_size;
        let max_generations = self.config.max_generations;
        let side = self
            .fitness
            .domain_side()
            .or_else(|| bounds_span(bounds))
            .unwrap_or(DEFAULT_AREA_SIDE);
        let perturbation = Perturbation::for_variant(&self.variant, side)?;

        let elite_size = self.variant.elite_size(n);
        if let Variant::ElitistAttractor { .. } = self.variant {
            if elite_size < MIN_ELITE_SIZE {
                warn!(population = n, elite = elite_size, "elite set clipped to population size");
            }
        }

        let mut population = Population::initialize(n, sensors, bounds, seed, rng)?;
        let fitness = CountingFitness::new(&self.fitness);

        info!(
            variant = %self.variant,
            population = n,
            generations = max_generations,
            sensors,
            "starting firefly run"
        );

        let ceiling = self.config.attractiveness_range();
        let mut alpha = self.config.alpha;
        let mut best: Option<BestSoFar> = None;
        let mut convergence = Vec::with_capacity(max_generations);
        let mut generations = Vec::with_capacity(max_generations);

        for generation in 0..max_generations {
            population.evaluate(&fitness);
            population.sort_by_fitness();

            let generation_best = population.max_fitness();
            let generation_mean = population.mean_fitness();
            convergence.push(generation_best);

            if let Variant::ElitistAttractor { .. } = self.variant {
                let retained = best.as_ref().map_or(0.0, |b| b.fitness);
                if generation_best > retained {
                    best = Some(BestSoFar {
                        layout: population.layouts[n - 1].clone(),
                        fitness: generation_best,
                    });
                }
            }

            let snapshot = population.snapshot();
            let params = self.generation_params(alpha, ceiling, generation);
            let attractor = best.as_ref().map(|b| Attractor {
                layout: &b.layout,
                fitness: b.fitness,
            });

            let moves = Movement::new(perturbation, params, &snapshot, &fitness)
                .with_attractor(attractor)
                .run(&mut population, rng);

            let elite_rollbacks = if elite_size > 0 {
                protect_elite(&mut population, &snapshot, elite_size, &fitness)
            } else {
                0
            };

            population.clamp(bounds);

            let stats = GenerationStats {
                generation,
                best_fitness: generation_best,
                mean_fitness: generation_mean,
                alpha: params.alpha,
                gamma: params.gamma,
                ceiling: params.ceiling,
                moves,
                elite_rollbacks,
            };
            debug!(
                generation = generation + 1,
                coverage = generation_best,
                alpha = params.alpha,
                gamma = params.gamma,
                accepted = moves.accepted,
                rejected = moves.rejected,
                elite_rollbacks,
                "generation complete"
            );
            observer(&stats, &population);
            generations.push(stats);

            if self.config.alpha_annealing && self.variant.has_fixed_alpha() {
                alpha = schedule::annealed_alpha(alpha, max_generations);
            }
        }

        population.evaluate(&fitness);
        population.sort_by_fitness();
        population.clamp(bounds);

        let best_index = n - 1;
        let result = OptimizationResult {
            variant: self.variant,
            best: population.layouts[best_index].clone(),
            best_fitness: population.fitness[best_index],
            total_evaluations: self.config.evaluation_budget(),
            fitness_calls: fitness.calls(),
            convergence,
            generations,
        };

        info!(
            variant = %self.variant,
            coverage = result.best_fitness,
            evaluations = result.total_evaluations,
            "firefly run finished"
        );
        Ok(result)
    }

    fn generation_params(&self, alpha: f64, ceiling: f64, generation: usize) -> GenerationParams {
        let max_generations = self.config.max_generations;
        let mut params = GenerationParams {
            alpha,
            ceiling,
            beta_min: self.config.beta_min,
            gamma: self.config.gamma,
        };
        match self.variant {
            Variant::DecayingAlpha { theta } => {
                params.alpha = schedule::decayed_alpha(self.config.alpha, theta, generation);
                params.ceiling = schedule::decayed_ceiling(ceiling, generation, max_generations);
            }
            Variant::ElitistAttractor { .. } => {
                params.gamma =
                    schedule::oscillating_gamma(self.config.gamma, generation, max_generations);
            }
            Variant::Standard | Variant::LevyFlight { .. } => {}
        }
        params
    }
}

fn bounds_span(bounds: &Bounds) -> Option<f64> {
    let span = (0..bounds.len()).map(|i| bounds.range(i)).fold(0.0, f64::max);
    (span > 0.0).then_some(span)
}

/// Run one optimization from raw bound vectors.
///
/// Mismatched bound lengths are reported before any population is created.
pub fn optimize<F, R>(
    seed: Option<&Layout>,
    lower: &[f64],
    upper: &[f64],
    config: &FireflyConfig,
    variant: Variant,
    fitness: F,
    rng: &mut R,
) -> Result<OptimizationResult>
where
    F: FitnessFunction,
    R: Rng + ?Sized,
{
    let bounds = Bounds::new(lower.to_vec(), upper.to_vec())?;
    FireflyOptimizer::new(config.clone(), variant, fitness)?.run(seed, &bounds, rng)
}
