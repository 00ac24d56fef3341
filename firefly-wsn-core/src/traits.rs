//! Core traits for the firefly optimizer
//!
//! These traits define the seams between the generation loop and the
//! problem being optimized.

use crate::layout::Layout;
use crate::Result;

/// A fitness function for firefly optimization
///
/// Implementations must be pure: the same layout always yields the same
/// value, and higher values are brighter (better).
pub trait FitnessFunction {
    /// Evaluate the fitness of a layout
    fn evaluate(&self, layout: &Layout) -> f64;

    /// Number of sensors the function expects in a layout
    fn dimensions(&self) -> usize;

    /// Side length of the square search domain, if the function knows it
    fn domain_side(&self) -> Option<f64> {
        None
    }

    /// Reject malformed problem settings before a run starts
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<F: FitnessFunction + ?Sized> FitnessFunction for &F {
    fn evaluate(&self, layout: &Layout) -> f64 {
        (**self).evaluate(layout)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn domain_side(&self) -> Option<f64> {
        (**self).domain_side()
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

/// Fitness function wrapper that counts evaluations
///
/// The generation loop reports a static evaluation budget; this wrapper
/// gives the actual number of calls made.
#[derive(Debug)]
pub struct CountingFitness<F> {
    inner: F,
    calls: core::cell::Cell<u64>,
}

impl<F: FitnessFunction> CountingFitness<F> {
    /// Wrap a fitness function
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: core::cell::Cell::new(0),
        }
    }

    /// Number of evaluations performed so far
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }
}

impl<F: FitnessFunction> FitnessFunction for CountingFitness<F> {
    fn evaluate(&self, layout: &Layout) -> f64 {
        self.calls.set(self.calls.get() + 1);
        self.inner.evaluate(layout)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn domain_side(&self) -> Option<f64> {
        self.inner.domain_side()
    }

    fn validate(&self) -> Result<()> {
        self.inner.validate()
    }
}
