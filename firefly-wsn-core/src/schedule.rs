//! Per-generation parameter schedules
//!
//! Generations are counted from zero; schedules use `generation + 1` so the
//! first movement step already sees a decayed (or oscillated) value and the
//! last one sees `progress == 1`.

use core::f64::consts::PI;

/// Run progress after `generation` in `(0, 1]`
pub fn progress(generation: usize, max_generations: usize) -> f64 {
    if max_generations == 0 {
        return 1.0;
    }
    (generation + 1) as f64 / max_generations as f64
}

/// Geometric randomness decay: `alpha0 * theta^(generation + 1)`
pub fn decayed_alpha(alpha0: f64, theta: f64, generation: usize) -> f64 {
    alpha0 * theta.powi(generation as i32 + 1)
}

/// Attractiveness ceiling shrinking linearly to half over the run
pub fn decayed_ceiling(ceiling: f64, generation: usize, max_generations: usize) -> f64 {
    ceiling * (1.0 - 0.5 * progress(generation, max_generations))
}

/// Absorption coefficient oscillating between `gamma` and `1.5 * gamma`
pub fn oscillating_gamma(gamma: f64, generation: usize, max_generations: usize) -> f64 {
    gamma * (1.0 + 0.5 * (PI * progress(generation, max_generations)).sin())
}

/// One step of annealed randomness reduction.
///
/// `delta = 1 - (0.005 / 0.9)^(1 / max_generations)`, so applying it every
/// generation shrinks alpha by a factor of `0.005 / 0.9` over the run.
pub fn annealed_alpha(alpha: f64, max_generations: usize) -> f64 {
    let generations = max_generations.max(1) as f64;
    let delta = 1.0 - (0.005f64 / 0.9).powf(1.0 / generations);
    (1.0 - delta) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decayed_alpha_starts_one_step_in() {
        assert!((decayed_alpha(0.7, 0.97, 0) - 0.679).abs() < 1e-12);
        assert!((decayed_alpha(0.7, 0.97, 9) - 0.7 * 0.97f64.powi(10)).abs() < 1e-12);
    }

    #[test]
    fn ceiling_halves_by_the_end() {
        assert!((decayed_ceiling(0.8, 24, 25) - 0.4).abs() < 1e-12);
        assert!(decayed_ceiling(0.8, 0, 25) < 0.8);
    }

    #[test]
    fn gamma_peaks_mid_run_and_returns() {
        let g = |i| oscillating_gamma(1.0, i, 20);
        assert!((g(9) - 1.5).abs() < 1e-12);
        assert!((g(19) - 1.0).abs() < 1e-12);
        assert!(g(4) > 1.0 && g(4) < 1.5);
    }

    #[test]
    fn annealing_reaches_target_ratio() {
        let mut alpha = 0.9;
        for _ in 0..50 {
            alpha = annealed_alpha(alpha, 50);
        }
        assert!((alpha - 0.005).abs() < 1e-9);
    }
}
