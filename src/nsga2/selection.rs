//! Parent selection driven by Pareto rank and crowding distance.
//!
//! NSGA-II has no scalar fitness: candidates are compared with the crowded
//! comparison operator (lower rank wins, ties go to the larger crowding
//! distance). Every strategy here works on that ordering.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::error::{Nsga2Error, Result};
use super::multi_objective::crowded_cmp;
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_nsga2::nsga2::Selection;
///
/// // Binary tournament, the NSGA-II default
/// let sel = Selection::default();
/// assert_eq!(sel, Selection::Tournament(2));
///
/// // Linear ranking over the crowded order
/// let sel = Selection::Rank;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: draw `k` candidates uniformly with replacement
    /// and keep the best under crowded comparison.
    ///
    /// `k = 2` is binary tournament. When two drawn candidates tie exactly,
    /// the one drawn first wins.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Rank-based selection over the crowded order.
    ///
    /// Candidates are sorted by `(rank, crowding)` and selection probability
    /// falls linearly with position: weight_i = n - position_i.
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Selects a parent index.
    ///
    /// `ranks[i]` and `distances[i]` describe candidate `i`.
    ///
    /// # Errors
    ///
    /// - [`Nsga2Error::EmptyPopulation`] if there are no candidates
    /// - [`Nsga2Error::DimensionMismatch`] if the two slices differ in length
    pub fn select<R: Rng>(&self, ranks: &[usize], distances: &[f64], rng: &mut R) -> Result<usize> {
        if ranks.is_empty() {
            return Err(Nsga2Error::EmptyPopulation);
        }
        if ranks.len() != distances.len() {
            return Err(Nsga2Error::DimensionMismatch {
                expected: ranks.len(),
                found: distances.len(),
            });
        }

        Ok(match self {
            Selection::Tournament(k) => tournament(ranks, distances, *k, rng),
            Selection::Rank => rank(ranks, distances, rng),
        })
    }
}

/// Tournament selection: draw k random candidates, return the best.
fn tournament<R: Rng>(ranks: &[usize], distances: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = ranks.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        let cmp = crowded_cmp(ranks[idx], distances[idx], ranks[best_idx], distances[best_idx]);
        if cmp == Ordering::Less {
            best_idx = idx;
        }
    }
    best_idx
}

/// Rank-based selection using linear ranking over the crowded order.
fn rank<R: Rng>(ranks: &[usize], distances: &[f64], rng: &mut R) -> usize {
    let n = ranks.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| crowded_cmp(ranks[a], distances[a], ranks[b], distances[b]));

    // Linear ranking: position 0 (best) gets weight n
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (position, &original_idx) in order.iter().enumerate() {
        cumulative += (n - position) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    order[n - 1] // floating-point fallback
}
