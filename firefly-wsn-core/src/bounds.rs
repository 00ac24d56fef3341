//! Simple per-dimension bounds
//!
//! Bounds are indexed by sensor: sensor `i` must satisfy
//! `lower[i] <= x[i] <= upper[i]` and the same for `y[i]`. Empty bounds
//! mean the search is unbounded and clamping is a no-op.

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::{Error, Result};

/// Closed interval `[lower[i], upper[i]]` per sensor index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Create bounds, rejecting lower/upper vectors of different length
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(Error::BoundsMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        Ok(Self { lower, upper })
    }

    /// Same interval `[lo, hi]` for all `sensors`
    pub fn uniform(sensors: usize, lo: f64, hi: f64) -> Self {
        Self {
            lower: vec![lo; sensors],
            upper: vec![hi; sensors],
        }
    }

    /// Bounds that impose no limit
    pub fn unbounded() -> Self {
        Self {
            lower: Vec::new(),
            upper: Vec::new(),
        }
    }

    /// Number of bounded dimensions (zero when unbounded)
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether no bounds are set
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Width of dimension `i`
    pub fn range(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Layout with every sensor at the center of its interval
    pub fn midpoint(&self) -> Layout {
        let mid: Vec<f64> = self
            .lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| (lo + hi) / 2.0)
            .collect();
        Layout {
            x: mid.clone(),
            y: mid,
        }
    }

    /// Clamp every coordinate of `layout` into its interval
    pub fn clamp(&self, layout: &mut Layout) {
        for axis in [&mut layout.x, &mut layout.y] {
            for ((v, lo), hi) in axis.iter_mut().zip(&self.lower).zip(&self.upper) {
                if *v < *lo {
                    *v = *lo;
                } else if *v > *hi {
                    *v = *hi;
                }
            }
        }
    }

    /// Whether every coordinate of `layout` already lies within bounds
    pub fn contains(&self, layout: &Layout) -> bool {
        [&layout.x, &layout.y].into_iter().all(|axis| {
            axis.iter()
                .zip(&self.lower)
                .zip(&self.upper)
                .all(|((v, lo), hi)| *lo <= *v && *v <= *hi)
        })
    }
}
