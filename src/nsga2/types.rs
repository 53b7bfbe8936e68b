//! Core data model for NSGA-II.
//!
//! A [`Candidate`] is an immutable vector of real-valued decision variables,
//! each confined to the closed interval described by [`Bounds`]. Objective
//! functions are supplied by the caller through the [`Objective`] capability
//! trait, so the number and nature of objectives is a runtime choice.

use super::error::{Nsga2Error, Result};
use rand::Rng;

/// One objective value per objective function, linked to a candidate by
/// its position in the population.
pub type ObjectiveVector = Vec<f64>;

/// An ordered sequence of candidates.
///
/// Order only matters as the index that links candidates to their
/// objective vectors, ranks, and crowding distances within a generation.
pub type Population = Vec<Candidate>;

/// Closed interval `[lower, upper]` shared by every decision variable.
///
/// # Examples
///
/// ```
/// use u_nsga2::nsga2::Bounds;
///
/// let bounds = Bounds::new(-5.0, 5.0).unwrap();
/// assert_eq!(bounds.clamp(7.5), 5.0);
/// assert!(Bounds::new(1.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

impl Bounds {
    /// Creates bounds, rejecting `lower >= upper`, non-finite limits, and
    /// intervals whose width overflows `f64`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Re-checks the interval.
    ///
    /// Needed for values that bypassed [`Bounds::new`], such as deserialized configs.
    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite()
            || !self.upper.is_finite()
            || self.lower >= self.upper
            || !self.width().is_finite()
        {
            return Err(Nsga2Error::InvalidBounds {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }

    /// Lower limit.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper limit.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// `upper - lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Clips `value` into the closed interval.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Draws a value uniformly from the closed interval.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.lower..=self.upper)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }
}

/// A candidate solution: a fixed-length tuple of decision variables.
///
/// Candidates are never modified in place. Crossover and mutation build
/// new candidates from the genes of existing ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    genes: Vec<f64>,
}

impl Candidate {
    /// Wraps a vector of decision variables.
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// The decision variables.
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Number of decision variables.
    pub fn dimensions(&self) -> usize {
        self.genes.len()
    }

    /// Whether every decision variable lies within `bounds`.
    pub fn within(&self, bounds: &Bounds) -> bool {
        self.genes.iter().all(|&g| bounds.contains(g))
    }

    /// Consumes the candidate, returning its decision variables.
    pub fn into_genes(self) -> Vec<f64> {
        self.genes
    }
}

impl From<Vec<f64>> for Candidate {
    fn from(genes: Vec<f64>) -> Self {
        Self::new(genes)
    }
}

/// A real-valued objective to be **minimized**.
///
/// Any `Fn(&[f64]) -> f64` closure is an objective:
///
/// ```
/// use u_nsga2::nsga2::Objective;
///
/// let f1 = |x: &[f64]| x[0] * x[0];
/// let objectives: [&dyn Objective; 1] = [&f1];
/// assert_eq!(objectives[0].evaluate(&[3.0]), 9.0);
/// ```
///
/// For maximization, negate the value.
///
/// # Thread Safety
///
/// `Objective` must be `Send + Sync` because evaluation may run in parallel
/// using rayon.
pub trait Objective: Send + Sync {
    /// Evaluates the objective for one candidate's decision variables.
    fn evaluate(&self, genes: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, genes: &[f64]) -> f64 {
        self(genes)
    }
}

/// Checks that every candidate has exactly `dimensions` decision variables.
pub(crate) fn check_dimensions(population: &[Candidate], dimensions: usize) -> Result<()> {
    match population.iter().find(|c| c.dimensions() != dimensions) {
        Some(c) => Err(Nsga2Error::DimensionMismatch {
            expected: dimensions,
            found: c.dimensions(),
        }),
        None => Ok(()),
    }
}
