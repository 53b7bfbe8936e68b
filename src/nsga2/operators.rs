//! Real-valued variation operators.
//!
//! Crossover and mutation for fixed-length `f64` decision vectors confined to
//! a closed [`Bounds`] interval. Every operator returns fresh gene vectors
//! and clips each variable into bounds before returning.
//!
//! # Crossover Operators
//!
//! - [`Crossover::Sbx`]: Simulated binary crossover, bounded variant (Deb & Agrawal, 1995)
//! - [`Crossover::Blend`]: BLX-α (Eshelman & Schaffer, 1993)
//! - [`Crossover::Arithmetic`]: Random-weight arithmetic recombination
//!
//! # Mutation Operators
//!
//! - [`Mutation::Polynomial`]: Bounded polynomial mutation (Deb & Goyal, 1996)
//! - [`Mutation::Uniform`]: Redraw the variable uniformly within bounds
//! - [`Mutation::Perturb`]: Uniform perturbation scaled by the bound width
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS)"
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and Interval-Schemata"

use super::error::{Nsga2Error, Result};
use super::types::Bounds;
use rand::Rng;

/// Variables closer than this are treated as identical by SBX.
const SBX_EPSILON: f64 = 1e-14;

// ============================================================================
// Crossover
// ============================================================================

/// Crossover operator producing two children from two parents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Bounded simulated binary crossover.
    ///
    /// `eta` is the distribution index: larger values keep children closer
    /// to their parents. Typical value: 20. Each variable is recombined with
    /// probability 0.5, otherwise copied.
    Sbx { eta: f64 },

    /// BLX-α: each child variable is drawn uniformly from the parents'
    /// interval extended by `alpha` times its width on both sides.
    Blend { alpha: f64 },

    /// Per-variable convex combination with a random weight `w`:
    /// `c1 = w·a + (1-w)·b`, `c2 = (1-w)·a + w·b`.
    Arithmetic,
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::Sbx { eta: 20.0 }
    }
}

impl Crossover {
    /// Recombines two parents into two children.
    ///
    /// # Errors
    /// [`Nsga2Error::DimensionMismatch`] if the parents differ in length.
    pub fn apply<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &Bounds,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        if parent1.len() != parent2.len() {
            return Err(Nsga2Error::DimensionMismatch {
                expected: parent1.len(),
                found: parent2.len(),
            });
        }

        let mut child1 = Vec::with_capacity(parent1.len());
        let mut child2 = Vec::with_capacity(parent2.len());
        for (&a, &b) in parent1.iter().zip(parent2) {
            let (c1, c2) = match *self {
                Crossover::Sbx { eta } => sbx_gene(a, b, eta, bounds, rng),
                Crossover::Blend { alpha } => blend_gene(a, b, alpha, rng),
                Crossover::Arithmetic => {
                    let w: f64 = rng.random_range(0.0..=1.0);
                    (w * a + (1.0 - w) * b, (1.0 - w) * a + w * b)
                }
            };
            child1.push(bounds.clamp(c1));
            child2.push(bounds.clamp(c2));
        }
        Ok((child1, child2))
    }
}

/// Bounded SBX for one variable.
fn sbx_gene<R: Rng>(a: f64, b: f64, eta: f64, bounds: &Bounds, rng: &mut R) -> (f64, f64) {
    if rng.random_bool(0.5) || (a - b).abs() < SBX_EPSILON {
        return (a, b);
    }

    let (y1, y2) = if a < b { (a, b) } else { (b, a) };
    let (lo, hi) = (bounds.lower(), bounds.upper());
    let u: f64 = rng.random_range(0.0..1.0);
    let exponent = 1.0 / (eta + 1.0);

    let spread = |beta: f64| {
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(exponent)
        }
    };

    let beta_lo = 1.0 + 2.0 * (y1 - lo).max(0.0) / (y2 - y1);
    let c1 = 0.5 * ((y1 + y2) - spread(beta_lo) * (y2 - y1));

    let beta_hi = 1.0 + 2.0 * (hi - y2).max(0.0) / (y2 - y1);
    let c2 = 0.5 * ((y1 + y2) + spread(beta_hi) * (y2 - y1));

    // Children inherit parent positions at random.
    if rng.random_bool(0.5) {
        (c2, c1)
    } else {
        (c1, c2)
    }
}

/// BLX-α for one variable.
fn blend_gene<R: Rng>(a: f64, b: f64, alpha: f64, rng: &mut R) -> (f64, f64) {
    let lo = a.min(b);
    let hi = a.max(b);
    let range = hi - lo;
    if range < SBX_EPSILON {
        return (a, b);
    }
    let ext = alpha.max(0.0) * range;
    (
        rng.random_range((lo - ext)..=(hi + ext)),
        rng.random_range((lo - ext)..=(hi + ext)),
    )
}

// ============================================================================
// Mutation
// ============================================================================

/// Mutation operator applied independently to each decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Bounded polynomial mutation with distribution index `eta`.
    ///
    /// Typical value: 20. Larger values produce smaller perturbations.
    Polynomial { eta: f64 },

    /// Replace the variable with a uniform draw from the bounds.
    Uniform,

    /// Add a uniform perturbation in `±scale · (upper - lower)`.
    Perturb { scale: f64 },
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::Polynomial { eta: 20.0 }
    }
}

impl Mutation {
    /// Returns a mutated copy of `genes`.
    ///
    /// Each variable is mutated with probability `rate`; every variable of
    /// the result lies within `bounds`, including ones that were not
    /// mutated.
    pub fn apply<R: Rng>(&self, genes: &[f64], rate: f64, bounds: &Bounds, rng: &mut R) -> Vec<f64> {
        let rate = rate.clamp(0.0, 1.0);
        genes
            .iter()
            .map(|&g| {
                if rate > 0.0 && rng.random_bool(rate) {
                    bounds.clamp(self.mutate_gene(g, bounds, rng))
                } else {
                    bounds.clamp(g)
                }
            })
            .collect()
    }

    fn mutate_gene<R: Rng>(&self, y: f64, bounds: &Bounds, rng: &mut R) -> f64 {
        match *self {
            Mutation::Polynomial { eta } => polynomial_gene(y, eta, bounds, rng),
            Mutation::Uniform => bounds.sample(rng),
            Mutation::Perturb { scale } => {
                let reach = scale.abs() * bounds.width();
                if reach > 0.0 {
                    y + rng.random_range(-reach..=reach)
                } else {
                    y
                }
            }
        }
    }
}

/// Bounded polynomial mutation for one variable.
fn polynomial_gene<R: Rng>(y: f64, eta: f64, bounds: &Bounds, rng: &mut R) -> f64 {
    let (lo, hi) = (bounds.lower(), bounds.upper());
    let width = hi - lo;
    let delta1 = (y - lo) / width;
    let delta2 = (hi - y) / width;
    let power = eta + 1.0;
    let u: f64 = rng.random_range(0.0..1.0);

    let deltaq = if u < 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(power);
        val.powf(1.0 / power) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(power);
        1.0 - val.powf(1.0 / power)
    };

    y + deltaq * width
}

// ============================================================================
// Tests
// ============================================================================
