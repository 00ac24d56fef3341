//! Sensor layouts
//!
//! A layout is one candidate solution: a 2-D position for every sensor,
//! stored as two parallel coordinate vectors.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A full sensor placement, one `(x, y)` coordinate per sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// X coordinate of each sensor
    pub x: Vec<f64>,
    /// Y coordinate of each sensor
    pub y: Vec<f64>,
}

impl Layout {
    /// Create a layout from parallel coordinate vectors
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Create a layout with every sensor at `(value, value)`
    pub fn filled(sensors: usize, value: f64) -> Self {
        Self {
            x: vec![value; sensors],
            y: vec![value; sensors],
        }
    }

    /// Create a layout from `(x, y)` points
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { x, y }
    }

    /// Number of sensors with both coordinates present
    pub fn sensor_count(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    /// Position of sensor `index`
    pub fn position(&self, index: usize) -> (f64, f64) {
        (self.x[index], self.y[index])
    }

    /// Iterate over sensor positions
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Overwrite this layout with another of the same size without reallocating
    pub fn copy_from(&mut self, other: &Layout) {
        self.x.copy_from_slice(&other.x);
        self.y.copy_from_slice(&other.y);
    }

    /// Euclidean centroid of all sensors
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.sensor_count().max(1) as f64;
        let sx: f64 = self.x.iter().sum();
        let sy: f64 = self.y.iter().sum();
        (sx / n, sy / n)
    }

    /// Largest per-coordinate absolute difference to another layout
    pub fn max_abs_diff(&self, other: &Layout) -> f64 {
        self.x
            .iter()
            .zip(&other.x)
            .chain(self.y.iter().zip(&other.y))
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
