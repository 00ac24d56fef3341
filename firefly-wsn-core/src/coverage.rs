//! Grid-sampled coverage fitness
//!
//! The monitored area `[0, A] x [0, A]` is sampled at `G x G` points spaced
//! `A / G` apart, starting at the origin. A sample is covered when its
//! squared distance to some sensor is strictly below `R^2`. Fitness is the
//! covered fraction of samples.
//!
//! The grid resolution must stay fixed for a run; fitness values from
//! different resolutions are not comparable.

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::traits::FitnessFunction;
use crate::{Error, Result};

/// Default side length of the monitored square
pub const DEFAULT_AREA_SIDE: f64 = 100.0;
/// Default number of sensors
pub const DEFAULT_SENSOR_COUNT: usize = 100;
/// Default sensing radius
pub const DEFAULT_RADIUS: f64 = 7.0;
/// Default number of samples per grid axis
pub const DEFAULT_GRID_RESOLUTION: usize = 50;

/// Sample grid over the monitored square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageGrid {
    /// Side length `A` of the square
    pub side: f64,
    /// Samples per axis `G`
    pub resolution: usize,
}

impl Default for CoverageGrid {
    fn default() -> Self {
        Self {
            side: DEFAULT_AREA_SIDE,
            resolution: DEFAULT_GRID_RESOLUTION,
        }
    }
}

impl CoverageGrid {
    /// Create a grid
    pub fn new(side: f64, resolution: usize) -> Self {
        Self { side, resolution }
    }

    /// Distance between neighbouring samples
    pub fn spacing(&self) -> f64 {
        self.side / self.resolution as f64
    }

    /// Total number of sample points
    pub fn sample_count(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Iterate over sample points, row by row
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let step = self.spacing();
        (0..self.resolution).flat_map(move |p| {
            (0..self.resolution).map(move |q| (p as f64 * step, q as f64 * step))
        })
    }

    /// Fraction of samples within `radius` of one of the first
    /// `sensor_count` sensors of `layout`.
    pub fn coverage(&self, layout: &Layout, sensor_count: usize, radius: f64) -> f64 {
        let total = self.sample_count();
        if total == 0 {
            return 0.0;
        }

        let sensors = sensor_count.min(layout.sensor_count());
        let xs = &layout.x[..sensors];
        let ys = &layout.y[..sensors];
        let r2 = radius * radius;

        let covered = self
            .samples()
            .filter(|&(px, py)| {
                xs.iter()
                    .zip(ys)
                    .any(|(sx, sy)| (sx - px).powi(2) + (sy - py).powi(2) < r2)
            })
            .count();

        covered as f64 / total as f64
    }
}

/// The sensor placement problem: area, sensor count, radius and sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageProblem {
    /// Side length of the square area
    pub area_side: f64,
    /// Number of sensors to place
    pub sensor_count: usize,
    /// Sensing radius of every sensor
    pub radius: f64,
    /// Samples per grid axis
    pub grid_resolution: usize,
}

impl Default for CoverageProblem {
    fn default() -> Self {
        Self {
            area_side: DEFAULT_AREA_SIDE,
            sensor_count: DEFAULT_SENSOR_COUNT,
            radius: DEFAULT_RADIUS,
            grid_resolution: DEFAULT_GRID_RESOLUTION,
        }
    }
}

impl CoverageProblem {
    /// Set the area side length
    pub fn with_area_side(mut self, side: f64) -> Self {
        self.area_side = side;
        self
    }

    /// Set the number of sensors
    pub fn with_sensor_count(mut self, sensors: usize) -> Self {
        self.sensor_count = sensors;
        self
    }

    /// Set the sensing radius
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the grid resolution
    pub fn with_grid_resolution(mut self, resolution: usize) -> Self {
        self.grid_resolution = resolution;
        self
    }

    /// Sample grid for this problem
    pub fn grid(&self) -> CoverageGrid {
        CoverageGrid::new(self.area_side, self.grid_resolution)
    }

    /// Check that the problem is well formed
    pub fn validate(&self) -> Result<()> {
        FitnessFunction::validate(self)
    }
}

impl FitnessFunction for CoverageProblem {
    fn evaluate(&self, layout: &Layout) -> f64 {
        self.grid().coverage(layout, self.sensor_count, self.radius)
    }

    fn dimensions(&self) -> usize {
        self.sensor_count
    }

    fn domain_side(&self) -> Option<f64> {
        Some(self.area_side)
    }

    fn validate(&self) -> Result<()> {
        if !(self.area_side > 0.0) || !self.area_side.is_finite() {
            return Err(Error::invalid("area_side", "must be a positive finite number"));
        }
        if self.sensor_count == 0 {
            return Err(Error::invalid("sensor_count", "must be at least 1"));
        }
        if !(self.radius >= 0.0) {
            return Err(Error::invalid("radius", "must be non-negative"));
        }
        if self.grid_resolution == 0 {
            return Err(Error::invalid("grid_resolution", "must be at least 1"));
        }
        Ok(())
    }
}
