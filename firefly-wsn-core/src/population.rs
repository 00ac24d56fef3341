//! Firefly population state
//!
//! A population is `n` layouts plus a parallel array of light intensities
//! (fitness). It is created once per run, mutated in place by the movement
//! step, and ranked ascending by fitness so the brightest individual is
//! last.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::layout::Layout;
use crate::traits::FitnessFunction;
use crate::{Error, Result};

/// Placeholder light intensity before the first evaluation
pub const UNEVALUATED_FITNESS: f64 = 1.0;

/// Live population of candidate layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    /// Candidate layouts
    pub layouts: Vec<Layout>,
    /// Light intensity of each layout
    pub fitness: Vec<f64>,
}

/// Frozen copy of a population taken before a movement step
///
/// Attraction targets and rejected moves read from the snapshot so a move
/// never compares against peers already updated in the same generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSnapshot {
    layouts: Vec<Layout>,
    fitness: Vec<f64>,
}

impl GenerationSnapshot {
    /// Layout of individual `i` at the start of the generation
    pub fn layout(&self, i: usize) -> &Layout {
        &self.layouts[i]
    }

    /// Fitness of individual `i` at the start of the generation
    pub fn fitness(&self, i: usize) -> f64 {
        self.fitness[i]
    }

    /// All generation-start fitness values
    pub fn fitness_values(&self) -> &[f64] {
        &self.fitness
    }

    /// Number of individuals
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Population {
    /// Draw `n` layouts of `sensors` sensors.
    ///
    /// With bounds present each coordinate is uniform over its interval;
    /// otherwise each coordinate is the seed plus standard-normal noise.
    pub fn initialize<R: Rng + ?Sized>(
        n: usize,
        sensors: usize,
        bounds: &Bounds,
        seed: Option<&Layout>,
        rng: &mut R,
    ) -> Result<Self> {
        let layouts = if !bounds.is_empty() {
            if bounds.len() != sensors {
                return Err(Error::DimensionMismatch {
                    expected: sensors,
                    actual: bounds.len(),
                });
            }
            (0..n)
                .map(|_| {
                    let x = uniform_within(bounds, rng);
                    let y = uniform_within(bounds, rng);
                    Layout { x, y }
                })
                .collect()
        } else {
            let seed = seed.ok_or(Error::MissingSeed)?;
            if seed.sensor_count() != sensors {
                return Err(Error::DimensionMismatch {
                    expected: sensors,
                    actual: seed.sensor_count(),
                });
            }
            (0..n)
                .map(|_| {
                    let x = jitter(&seed.x, rng);
                    let y = jitter(&seed.y, rng);
                    Layout { x, y }
                })
                .collect()
        };

        Ok(Self {
            layouts,
            fitness: vec![UNEVALUATED_FITNESS; n],
        })
    }

    /// Build a population from existing layouts with placeholder fitness
    pub fn from_layouts(layouts: Vec<Layout>) -> Self {
        let n = layouts.len();
        Self {
            layouts,
            fitness: vec![UNEVALUATED_FITNESS; n],
        }
    }

    /// Number of individuals
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Recompute every individual's fitness
    pub fn evaluate<F: FitnessFunction + ?Sized>(&mut self, fitness: &F) {
        for (layout, value) in self.layouts.iter().zip(self.fitness.iter_mut()) {
            *value = fitness.evaluate(layout);
        }
    }

    /// Stable sort ascending by fitness, brightest last
    pub fn sort_by_fitness(&mut self) {
        let order = self.ranked_indices();
        let mut layouts: Vec<Option<Layout>> = self.layouts.drain(..).map(Some).collect();
        self.layouts = order
            .iter()
            .filter_map(|&i| layouts[i].take())
            .collect();
        self.fitness = order.iter().map(|&i| self.fitness[i]).collect();
    }

    /// Indices ordered ascending by fitness (ties keep insertion order)
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            self.fitness[a]
                .partial_cmp(&self.fitness[b])
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        order
    }

    /// Index of the brightest individual (last one wins ties)
    pub fn brightest_index(&self) -> Option<usize> {
        self.ranked_indices().last().copied()
    }

    /// Highest fitness in the population
    pub fn max_fitness(&self) -> f64 {
        self.fitness
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean fitness of the population
    pub fn mean_fitness(&self) -> f64 {
        if self.fitness.is_empty() {
            return 0.0;
        }
        self.fitness.iter().sum::<f64>() / self.fitness.len() as f64
    }

    /// Clamp every individual into `bounds`
    pub fn clamp(&mut self, bounds: &Bounds) {
        for layout in &mut self.layouts {
            bounds.clamp(layout);
        }
    }

    /// Freeze the current coordinates and fitness
    pub fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot {
            layouts: self.layouts.clone(),
            fitness: self.fitness.clone(),
        }
    }

    /// Roll individual `i` back to its snapshot state
    pub fn restore(&mut self, i: usize, snapshot: &GenerationSnapshot) {
        self.layouts[i].copy_from(snapshot.layout(i));
        self.fitness[i] = snapshot.fitness(i);
    }
}

fn uniform_within<R: Rng + ?Sized>(bounds: &Bounds, rng: &mut R) -> Vec<f64> {
    bounds
        .lower()
        .iter()
        .enumerate()
        .map(|(i, lo)| lo + bounds.range(i) * rng.gen::<f64>())
        .collect()
}

fn jitter<R: Rng + ?Sized>(seed: &[f64], rng: &mut R) -> Vec<f64> {
    seed.iter()
        .map(|v| v + rng.sample::<f64, _>(StandardNormal))
        .collect()
}
