//! Pairwise attraction and greedy acceptance
//!
//! Every variant runs the same kernel. For each ordered pair `(i, j)`,
//! visited sequentially, two sensor slots `k` and `l` are drawn and, if `j`
//! was brighter at the start of the generation than `i` is now, `i`'s
//! coordinates at those slots are blended toward `j`'s snapshot
//! coordinates (cross-combined: slot `k` toward `j`'s slot `l` and vice
//! versa) and perturbed. The whole layout is then re-evaluated; a worse
//! layout is rolled back to the generation snapshot.
//!
//! Move order matters: once `i` improves, later pairs compare against the
//! improved value.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::algorithms::Variant;
use crate::layout::Layout;
use crate::levy::LevyFlight;
use crate::population::{GenerationSnapshot, Population};
use crate::traits::FitnessFunction;
use crate::Result;

/// Pull strength toward the best-so-far layout at full fitness gap
pub const ATTRACTOR_PULL: f64 = 0.2;

/// Distance scale of the decaying-alpha damping factor
const DAMPING_SCALE: f64 = 10.0;

/// Source of the random term added to every blended coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Perturbation {
    /// `alpha * (U[0,1) - 0.5)`, one draw shared by all four coordinates
    Uniform,
    /// `alpha * N(0,1)` per axis, damped by `1 / (1 + r / 10)`
    DampedGaussian,
    /// `alpha * L` with an independent Lévy step per coordinate
    Levy(LevyFlight),
}

impl Perturbation {
    /// Perturbation used by `variant` on a square domain of side `area_side`
    pub fn for_variant(variant: &Variant, area_side: f64) -> Result<Self> {
        match *variant {
            Variant::Standard | Variant::ElitistAttractor { .. } => Ok(Self::Uniform),
            Variant::DecayingAlpha { .. } => Ok(Self::DampedGaussian),
            Variant::LevyFlight { beta } => Ok(Self::Levy(LevyFlight::for_domain(beta, area_side)?)),
        }
    }

    fn draw<R: Rng + ?Sized>(&self, alpha: f64, rx: f64, ry: f64, rng: &mut R) -> Offsets {
        match self {
            Self::Uniform => {
                let t = alpha * (rng.gen::<f64>() - 0.5);
                Offsets {
                    kx: t,
                    ky: t,
                    lx: t,
                    ly: t,
                }
            }
            Self::DampedGaussian => {
                let tx = alpha * rng.sample::<f64, _>(StandardNormal);
                let ty = alpha * rng.sample::<f64, _>(StandardNormal);
                let damping = 1.0 / (1.0 + (rx * rx + ry * ry).sqrt() / DAMPING_SCALE);
                Offsets {
                    kx: tx * damping,
                    ky: ty * damping,
                    lx: tx * damping,
                    ly: ty * damping,
                }
            }
            Self::Levy(levy) => {
                let kx = alpha * levy.sample(rng);
                let ky = alpha * levy.sample(rng);
                let lx = alpha * levy.sample(rng);
                let ly = alpha * levy.sample(rng);
                Offsets { kx, ky, lx, ly }
            }
        }
    }
}

/// Random offsets for the `(k, l)` slots of one interaction
#[derive(Debug, Clone, Copy)]
struct Offsets {
    kx: f64,
    ky: f64,
    lx: f64,
    ly: f64,
}

/// Parameters in effect for one generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Randomness scale
    pub alpha: f64,
    /// Attractiveness ceiling `b` above the floor
    pub ceiling: f64,
    /// Attractiveness floor
    pub beta_min: f64,
    /// Light absorption coefficient
    pub gamma: f64,
}

impl GenerationParams {
    /// `b * exp(-gamma * r^2) + beta_min`
    pub fn attractiveness(&self, r: f64) -> f64 {
        self.ceiling * (-self.gamma * r * r).exp() + self.beta_min
    }
}

/// Best-so-far layout that the elitist variant pulls toward
#[derive(Debug, Clone, Copy)]
pub struct Attractor<'a> {
    pub layout: &'a Layout,
    pub fitness: f64,
}

/// Outcome of one pairwise interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// `j` was not brighter than `i`; nothing moved
    Skipped,
    /// The move improved or kept `i`'s fitness
    Accepted { before: f64, after: f64 },
    /// The move made `i` worse; `i` returned to its snapshot
    Rejected { before: f64, rejected: f64 },
}

/// Move counters for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoveStats {
    /// Pairs where an attraction move was attempted
    pub attempted: u64,
    /// Attempted moves that were kept
    pub accepted: u64,
    /// Attempted moves that were rolled back
    pub rejected: u64,
}

impl MoveStats {
    fn record(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::Skipped => {}
            Interaction::Accepted { .. } => {
                self.attempted += 1;
                self.accepted += 1;
            }
            Interaction::Rejected { .. } => {
                self.attempted += 1;
                self.rejected += 1;
            }
        }
    }
}

/// `j` attracts `i` only when strictly brighter; an undefined reference
/// never attracts.
pub fn is_brighter(reference: f64, current: f64) -> bool {
    matches!(
        current.partial_cmp(&reference),
        Some(core::cmp::Ordering::Less)
    )
}

/// One generation's movement step
pub struct Movement<'a, F: ?Sized> {
    perturbation: Perturbation,
    params: GenerationParams,
    snapshot: &'a GenerationSnapshot,
    attractor: Option<Attractor<'a>>,
    fitness: &'a F,
    reference: Vec<f64>,
}

impl<'a, F: FitnessFunction + ?Sized> Movement<'a, F> {
    /// Prepare a movement step against `snapshot`
    pub fn new(
        perturbation: Perturbation,
        params: GenerationParams,
        snapshot: &'a GenerationSnapshot,
        fitness: &'a F,
    ) -> Self {
        Self {
            perturbation,
            params,
            snapshot,
            attractor: None,
            fitness,
            reference: snapshot.fitness_values().to_vec(),
        }
    }

    /// Pull moved individuals toward `attractor`
    pub fn with_attractor(mut self, attractor: Option<Attractor<'a>>) -> Self {
        self.attractor = attractor;
        self
    }

    /// Current reference brightness of individual `j`
    pub fn reference(&self, j: usize) -> f64 {
        self.reference[j]
    }

    /// Run every ordered pair `(i, j)` in sequence
    pub fn run<R: Rng + ?Sized>(&mut self, population: &mut Population, rng: &mut R) -> MoveStats {
        let mut stats = MoveStats::default();
        let n = population.len();
        for i in 0..n {
            for j in 0..n {
                stats.record(self.interact(population, i, j, rng));
            }
        }
        stats
    }

    /// Let `j` attract `i` once
    pub fn interact<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        i: usize,
        j: usize,
        rng: &mut R,
    ) -> Interaction {
        let sensors = population.layouts[i]
            .sensor_count()
            .min(population.layouts[j].sensor_count())
            .min(self.snapshot.layout(j).sensor_count());
        if sensors == 0 {
            return Interaction::Skipped;
        }
        let k = rng.gen_range(0..sensors);
        let l = rng.gen_range(0..sensors);

        let (rx, ry, rx1, ry1) = {
            let a = &population.layouts[i];
            let b = &population.layouts[j];
            (
                (a.x[k] - b.x[l]).abs(),
                (a.y[k] - b.y[l]).abs(),
                (a.x[l] - b.x[k]).abs(),
                (a.y[l] - b.y[k]).abs(),
            )
        };

        let before = population.fitness[i];
        if !is_brighter(self.reference[j], before) {
            return Interaction::Skipped;
        }

        let p = &self.params;
        let (bx, by) = (p.attractiveness(rx), p.attractiveness(ry));
        let (bx1, by1) = (p.attractiveness(rx1), p.attractiveness(ry1));
        let d = self.perturbation.draw(p.alpha, rx, ry, rng);

        let target = self.snapshot.layout(j);
        let layout = &mut population.layouts[i];
        layout.x[k] = layout.x[k] * (1.0 - bx) + target.x[l] * bx + d.kx;
        layout.y[k] = layout.y[k] * (1.0 - by) + target.y[l] * by + d.ky;
        layout.x[l] = layout.x[l] * (1.0 - bx1) + target.x[k] * bx1 + d.lx;
        layout.y[l] = layout.y[l] * (1.0 - by1) + target.y[k] * by1 + d.ly;

        if let Some(best) = self.attractor {
            let gap = (best.fitness - before) / (best.fitness + 1e-10);
            let pull = ATTRACTOR_PULL * gap;
            let shared = sensors.min(best.layout.sensor_count());
            if shared > 0 {
                let m = rng.gen_range(0..shared);
                layout.x[m] += pull * (best.layout.x[m] - layout.x[m]);
                layout.y[m] += pull * (best.layout.y[m] - layout.y[m]);
            }
        }

        let after = self.fitness.evaluate(&population.layouts[i]);
        if after < before {
            population.restore(i, self.snapshot);
            self.reference[i] = self.snapshot.fitness(i);
            Interaction::Rejected {
                before,
                rejected: after,
            }
        } else {
            population.fitness[i] = after;
            self.reference[i] = after;
            Interaction::Accepted { before, after }
        }
    }
}

/// Roll back elite individuals whose fitness fell during the move.
///
/// The elite are the `elite_size` brightest individuals by snapshot
/// fitness. Returns how many were rolled back.
pub fn protect_elite<F: FitnessFunction + ?Sized>(
    population: &mut Population,
    snapshot: &GenerationSnapshot,
    elite_size: usize,
    fitness: &F,
) -> usize {
    let mut order: Vec<usize> = (0..snapshot.len()).collect();
    order.sort_by(|&a, &b| {
        snapshot
            .fitness(b)
            .partial_cmp(&snapshot.fitness(a))
            .unwrap_or(core::cmp::Ordering::Equal)
    });

    let mut rollbacks = 0;
    for &idx in order.iter().take(elite_size) {
        let current = fitness.evaluate(&population.layouts[idx]);
        if current < snapshot.fitness(idx) {
            tracing::trace!(
                individual = idx,
                current,
                snapshot = snapshot.fitness(idx),
                "elite rollback"
            );
            population.restore(idx, snapshot);
            rollbacks += 1;
        } else {
            population.fitness[idx] = current;
        }
    }
    rollbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::coverage::CoverageProblem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> GenerationParams {
        GenerationParams {
            alpha: 0.7,
            ceiling: 0.8,
            beta_min: 0.2,
            gamma: 1.0,
        }
    }

    fn small_problem() -> CoverageProblem {
        CoverageProblem::default()
            .with_sensor_count(12)
            .with_grid_resolution(20)
            .with_radius(12.0)
    }

    fn evaluated_population(seed: u64, problem: &CoverageProblem, n: usize) -> Population {
        let mut rng = StdRng::seed_from_u64(seed);
        let bounds = Bounds::uniform(problem.sensor_count, 0.0, problem.area_side);
        let mut pop =
            Population::initialize(n, problem.sensor_count, &bounds, None, &mut rng).unwrap();
        pop.evaluate(problem);
        pop
    }

    #[test]
    fn attractiveness_bounds() {
        let p = params();
        assert!((p.attractiveness(0.0) - 1.0).abs() < 1e-12);
        assert!((p.attractiveness(1e3) - 0.2).abs() < 1e-12);
        let flat = GenerationParams { gamma: 0.0, ..p };
        assert!((flat.attractiveness(50.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_offset_is_shared_by_all_slots() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let d = Perturbation::Uniform.draw(0.7, 3.0, 4.0, &mut rng);
            assert_eq!(d.kx, d.ky);
            assert_eq!(d.kx, d.lx);
            assert_eq!(d.kx, d.ly);
            assert!(d.kx.abs() <= 0.35);
        }
    }

    #[test]
    fn gaussian_offset_is_damped_by_distance() {
        // Same stream, so both draws see the same normals.
        let near = Perturbation::DampedGaussian.draw(0.7, 0.0, 0.0, &mut StdRng::seed_from_u64(4));
        let far = Perturbation::DampedGaussian.draw(0.7, 30.0, 40.0, &mut StdRng::seed_from_u64(4));
        // r = 50, so the damping factor is 1 / (1 + 50 / 10).
        assert!((far.kx - near.kx / 6.0).abs() < 1e-12);
        assert!((far.ky - near.ky / 6.0).abs() < 1e-12);
        assert_ne!(near.kx, near.ky);
        assert_eq!(far.lx, far.kx);
        assert_eq!(far.ly, far.ky);
    }

    #[test]
    fn levy_offsets_are_independent_and_capped() {
        let levy = Perturbation::for_variant(&Variant::levy_flight(), 100.0).unwrap();
        let cap = match levy {
            Perturbation::Levy(flight) => 0.7 * flight.max_step(),
            _ => unreachable!(),
        };
        let mut rng = StdRng::seed_from_u64(8);
        let mut independent = 0;
        for _ in 0..100 {
            let d = levy.draw(0.7, 3.0, 4.0, &mut rng);
            for v in [d.kx, d.ky, d.lx, d.ly] {
                assert!(v.abs() <= cap);
            }
            if d.kx != d.lx && d.ky != d.ly && d.kx != d.ky {
                independent += 1;
            }
        }
        assert!(independent > 90);
    }

    #[test]
    fn ragged_layouts_do_not_break_interaction() {
        let problem = CoverageProblem::default()
            .with_sensor_count(3)
            .with_grid_resolution(10)
            .with_radius(20.0);
        let mut pop = Population::from_layouts(vec![
            Layout::from_points([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]),
            Layout {
                x: vec![50.0, 60.0],
                y: vec![50.0],
            },
        ]);
        pop.evaluate(&problem);
        let snapshot = pop.snapshot();
        let mut rng = StdRng::seed_from_u64(1);
        let mut movement = Movement::new(Perturbation::Uniform, params(), &snapshot, &problem);
        for _ in 0..20 {
            movement.interact(&mut pop, 0, 1, &mut rng);
            movement.interact(&mut pop, 1, 0, &mut rng);
        }
        assert_eq!(pop.layouts[0].sensor_count(), 3);
        assert_eq!(pop.layouts[1].sensor_count(), 1);
    }

    #[test]
    fn undefined_reference_never_attracts() {
        assert!(!is_brighter(f64::NAN, 0.1));
        assert!(!is_brighter(0.5, f64::NAN));
        assert!(!is_brighter(0.5, 0.5));
        assert!(is_brighter(0.6, 0.5));
    }

    #[test]
    fn accepted_moves_never_regress() {
        let problem = small_problem();
        for perturbation in [
            Perturbation::Uniform,
            Perturbation::DampedGaussian,
            Perturbation::for_variant(&Variant::levy_flight(), 100.0).unwrap(),
        ] {
            let mut pop = evaluated_population(5, &problem, 6);
            let snapshot = pop.snapshot();
            let mut rng = StdRng::seed_from_u64(6);
            let mut movement = Movement::new(perturbation, params(), &snapshot, &problem);
            for i in 0..pop.len() {
                for j in 0..pop.len() {
                    match movement.interact(&mut pop, i, j, &mut rng) {
                        Interaction::Accepted { before, after } => assert!(after >= before),
                        Interaction::Rejected { before, rejected } => {
                            assert!(rejected < before);
                            assert_eq!(&pop.layouts[i], snapshot.layout(i));
                        }
                        Interaction::Skipped => {}
                    }
                    assert_eq!(pop.fitness[i], problem.evaluate(&pop.layouts[i]));
                }
            }
        }
    }

    #[test]
    fn generation_never_ends_below_snapshot() {
        let problem = small_problem();
        let mut pop = evaluated_population(8, &problem, 8);
        let snapshot = pop.snapshot();
        let mut rng = StdRng::seed_from_u64(9);
        let stats =
            Movement::new(Perturbation::Uniform, params(), &snapshot, &problem).run(&mut pop, &mut rng);
        assert_eq!(stats.attempted, stats.accepted + stats.rejected);
        assert_eq!(pop.len(), 8);
        for i in 0..pop.len() {
            assert!(pop.fitness[i] >= snapshot.fitness(i));
        }
    }

    #[test]
    fn brightest_individual_is_never_attracted() {
        let problem = small_problem();
        let mut pop = evaluated_population(10, &problem, 5);
        pop.sort_by_fitness();
        let snapshot = pop.snapshot();
        let best = pop.len() - 1;
        let mut rng = StdRng::seed_from_u64(10);
        let mut movement = Movement::new(Perturbation::Uniform, params(), &snapshot, &problem);
        for j in 0..pop.len() {
            assert_eq!(
                movement.interact(&mut pop, best, j, &mut rng),
                Interaction::Skipped
            );
        }
        assert_eq!(&pop.layouts[best], snapshot.layout(best));
    }

    #[test]
    fn attractor_pull_is_applied() {
        // Single sensor so the pulled slot is known.
        let problem = CoverageProblem::default()
            .with_sensor_count(1)
            .with_radius(30.0)
            .with_grid_resolution(10);
        let mut pop = Population::from_layouts(vec![
            Layout::from_points([(0.0, 0.0)]),
            Layout::from_points([(50.0, 50.0)]),
        ]);
        pop.evaluate(&problem);
        let snapshot = pop.snapshot();
        let best = Layout::from_points([(50.0, 50.0)]);
        let attractor = Attractor {
            layout: &best,
            fitness: snapshot.fitness(1),
        };
        let full = GenerationParams {
            gamma: 0.0,
            ..params()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut movement = Movement::new(Perturbation::Uniform, full, &snapshot, &problem)
            .with_attractor(Some(attractor));
        let outcome = movement.interact(&mut pop, 0, 1, &mut rng);
        assert!(matches!(outcome, Interaction::Accepted { .. }));
        let (x, y) = pop.layouts[0].position(0);
        // Full-strength blend lands near (50, 50); the pull keeps it there.
        assert!((x - 50.0).abs() < 1.0 && (y - 50.0).abs() < 1.0);
        assert!(movement.reference(0) > snapshot.fitness(0));
    }

    #[test]
    fn elite_rollback_restores_regressed_individuals() {
        let problem = small_problem();
        let mut pop = evaluated_population(12, &problem, 6);
        let snapshot = pop.snapshot();
        // Wreck every layout by moving all sensors off the field.
        for layout in &mut pop.layouts {
            for v in layout.x.iter_mut() {
                *v = 1e6;
            }
        }
        let rollbacks = protect_elite(&mut pop, &snapshot, 3, &problem);
        let ranked: Vec<usize> = {
            let mut o: Vec<usize> = (0..snapshot.len()).collect();
            o.sort_by(|&a, &b| snapshot.fitness(b).partial_cmp(&snapshot.fitness(a)).unwrap());
            o
        };
        assert_eq!(rollbacks, 3);
        for &idx in ranked.iter().take(3) {
            assert_eq!(&pop.layouts[idx], snapshot.layout(idx));
            assert!(problem.evaluate(&pop.layouts[idx]) >= snapshot.fitness(idx));
        }
        for &idx in ranked.iter().skip(3) {
            assert_ne!(&pop.layouts[idx], snapshot.layout(idx));
        }
    }
}
