//! Pareto ranking and diversity utilities.
//!
//! Domain-agnostic building blocks of NSGA-II's survivor selection.
//!
//! # Algorithms
//!
//! - [`dominates`]: Pareto dominance under minimization
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance within a single front
//! - [`assign_crowding_distance`]: Crowding distance for every front of a population
//! - [`survivor_order`]: Deterministic `(rank, crowding)` truncation order
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::error::{Nsga2Error, Result};
use super::types::ObjectiveVector;
use std::cmp::Ordering;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontAssignment {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    ///
    /// Every index appears in exactly one front, in ascending order.
    pub fronts: Vec<Vec<usize>>,
}

impl FrontAssignment {
    /// Rank of the solution at `index`.
    pub fn rank_of(&self, index: usize) -> usize {
        self.ranks[index]
    }

    /// Number of ranked solutions.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no solutions are ranked.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Number of fronts.
    pub fn front_count(&self) -> usize {
        self.fronts.len()
    }
}

/// Returns `true` if `a` Pareto-dominates `b` (minimization).
///
/// `a` dominates `b` iff it is no worse in every objective and strictly
/// better in at least one. Equal vectors dominate neither way.
///
/// ```
/// use u_nsga2::nsga2::multi_objective::dominates;
///
/// assert!(dominates(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]));
/// assert!(!dominates(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]));
/// assert!(!dominates(&[1.0, 3.0, 2.0], &[2.0, 2.0, 3.0]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **minimized**: lower values are better.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Errors
///
/// - [`Nsga2Error::EmptyPopulation`] if `objectives` is empty
/// - [`Nsga2Error::NoObjectives`] if the vectors have zero length
/// - [`Nsga2Error::DimensionMismatch`] if vector lengths differ
/// - [`Nsga2Error::NonFiniteObjective`] if any value is NaN or infinite
///
/// # Example
///
/// ```
/// use u_nsga2::nsga2::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D: dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives).unwrap();
///
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort(objectives: &[ObjectiveVector]) -> Result<FrontAssignment> {
    let n = objectives.len();
    let m = check_objectives(objectives)?;
    debug_assert!(m > 0);

    let mut domination_count = vec![0usize; n];
    let mut dominated_set: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominated_set[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_set[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_set[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        // Discovery order depends on the previous front; keep fronts index-ordered.
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    Ok(FrontAssignment { ranks, fronts })
}

/// Validates a set of objective vectors and returns their common arity.
fn check_objectives(objectives: &[ObjectiveVector]) -> Result<usize> {
    let first = objectives.first().ok_or(Nsga2Error::EmptyPopulation)?;
    let m = first.len();
    if m == 0 {
        return Err(Nsga2Error::NoObjectives);
    }
    if let Some(o) = objectives.iter().find(|o| o.len() != m) {
        return Err(Nsga2Error::DimensionMismatch {
            expected: m,
            found: o.len(),
        });
    }
    for (candidate, o) in objectives.iter().enumerate() {
        if let Some((objective, &value)) = o.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(Nsga2Error::NonFiniteObjective {
                candidate,
                objective,
                value,
            });
        }
    }
    Ok(m)
}

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compare two solutions for Pareto dominance (minimization).
fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Crowding distance assignment for the members of one front.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
/// An objective that is constant across the front contributes zero.
///
/// Distances are only meaningful between members of the same front; never
/// pass a mixed-rank population here.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value (stable; ties keep input order)
/// 2. Assign infinity to boundary solutions
/// 3. For interior solutions, add normalized distance to neighbors
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_nsga2::nsga2::multi_objective::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives).unwrap();
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(objectives: &[ObjectiveVector]) -> Result<Vec<f64>> {
    let m = check_objectives(objectives)?;
    let n = objectives.len();
    if n <= 2 {
        return Ok(vec![f64::INFINITY; n]);
    }

    let mut distances = vec![0.0f64; n];
    let mut indices: Vec<usize> = (0..n).collect();

    for obj_idx in 0..m {
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .total_cmp(&objectives[b][obj_idx])
                .then(a.cmp(&b))
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        // Halved so the span of two finite values cannot overflow.
        let min_val = objectives[indices[0]][obj_idx] / 2.0;
        let max_val = objectives[indices[n - 1]][obj_idx] / 2.0;
        let half_range = max_val - min_val;

        if half_range > 0.0 {
            for w in indices.windows(3) {
                let prev = objectives[w[0]][obj_idx] / 2.0;
                let next = objectives[w[2]][obj_idx] / 2.0;
                distances[w[1]] += (next - prev) / half_range;
            }
        }
    }

    Ok(distances)
}

/// Computes crowding distances front by front for a whole population.
///
/// Returns one distance per solution, indexed like `objectives`. Each front
/// is crowded in isolation.
///
/// `fronts` must come from [`non_dominated_sort`] over the same `objectives`.
pub fn assign_crowding_distance(
    objectives: &[ObjectiveVector],
    fronts: &FrontAssignment,
) -> Result<Vec<f64>> {
    if fronts.len() != objectives.len() {
        return Err(Nsga2Error::DimensionMismatch {
            expected: objectives.len(),
            found: fronts.len(),
        });
    }
    let mut distances = vec![0.0f64; objectives.len()];
    for front in &fronts.fronts {
        let front_objs: Vec<ObjectiveVector> =
            front.iter().map(|&i| objectives[i].clone()).collect();
        let front_dist = crowding_distance(&front_objs)?;
        for (&i, d) in front.iter().zip(front_dist) {
            distances[i] = d;
        }
    }
    Ok(distances)
}

/// Crowded comparison: lower rank wins, then higher crowding distance.
///
/// Returns [`Ordering::Less`] when `a` is the better solution.
pub fn crowded_cmp(rank_a: usize, dist_a: f64, rank_b: usize, dist_b: f64) -> Ordering {
    rank_a.cmp(&rank_b).then_with(|| dist_b.total_cmp(&dist_a))
}

/// Orders all indices by `(rank ascending, crowding distance descending)`.
///
/// The sort is stable over ascending indices, so exact ties keep their
/// original population order and the result is fully deterministic.
/// Truncating to `N` survivors is `survivor_order(..)?[..N]`.
///
/// Returns [`Nsga2Error::DimensionMismatch`] if `distances` does not hold
/// one entry per ranked solution.
pub fn survivor_order(fronts: &FrontAssignment, distances: &[f64]) -> Result<Vec<usize>> {
    if distances.len() != fronts.len() {
        return Err(Nsga2Error::DimensionMismatch {
            expected: fronts.len(),
            found: distances.len(),
        });
    }
    let mut order: Vec<usize> = (0..fronts.len()).collect();
    order.sort_by(|&a, &b| {
        crowded_cmp(fronts.ranks[a], distances[a], fronts.ranks[b], distances[b])
    });
    Ok(order)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Dominance ----

    #[test]
    fn test_dominates_strictly_better_everywhere() {
        assert!(dominates(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]));
        assert!(!dominates(&[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_dominates_equal_is_neither() {
        assert!(!dominates(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_dominates_partial() {
        assert!(!dominates(&[1.0, 3.0, 2.0], &[2.0, 2.0, 3.0]));
        assert!(!dominates(&[2.0, 2.0, 3.0], &[1.0, 3.0, 2.0]));
    }

    #[test]
    fn test_dominates_better_in_one() {
        assert!(dominates(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]));
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_empty_is_error() {
        let objs: Vec<Vec<f64>> = vec![];
        assert_eq!(non_dominated_sort(&objs), Err(Nsga2Error::EmptyPopulation));
    }

    #[test]
    fn test_zero_objectives_is_error() {
        let objs = vec![vec![], vec![]];
        assert_eq!(non_dominated_sort(&objs), Err(Nsga2Error::NoObjectives));
    }

    #[test]
    fn test_arity_mismatch_is_error() {
        let objs = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            non_dominated_sort(&objs),
            Err(Nsga2Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_single_solution() {
        let objs = vec![vec![1.0, 2.0]];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_two_non_dominated() {
        let objs = vec![vec![1.0, 3.0], vec![3.0, 1.0]];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.ranks, vec![0, 0]);
        assert_eq!(result.front_count(), 1);
    }

    #[test]
    fn test_clear_dominance() {
        let objs = vec![
            vec![3.0, 3.0], // dominated by 1 and 2
            vec![1.0, 1.0], // dominates all
            vec![2.0, 2.0], // dominated by 1
        ];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.ranks, vec![2, 0, 1]);
        assert_eq!(result.fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            vec![1.0, 5.0], // front 0
            vec![3.0, 3.0], // front 0
            vec![5.0, 1.0], // front 0
            vec![4.0, 4.0], // dominated by [1]
            vec![6.0, 6.0], // dominated by [3] as well
        ];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_all_equal() {
        let objs = vec![vec![2.0, 2.0], vec![2.0, 2.0], vec![2.0, 2.0]];
        let result = non_dominated_sort(&objs).unwrap();
        assert!(result.ranks.iter().all(|&r| r == 0));
        assert_eq!(result.fronts, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_three_objectives() {
        let objs = vec![
            vec![1.0, 5.0, 3.0],
            vec![3.0, 1.0, 5.0],
            vec![5.0, 3.0, 1.0],
            vec![4.0, 4.0, 4.0], // incomparable with each of the above
        ];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.ranks, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_fronts_listed_in_index_order() {
        // Front 1 members are discovered through different front-0 parents.
        let objs = vec![
            vec![5.0, 5.0], // front 1 (dominated by 3)
            vec![2.0, 6.0], // front 1 (dominated by 2)
            vec![1.0, 5.0], // front 0
            vec![4.0, 1.0], // front 0
        ];
        let result = non_dominated_sort(&objs).unwrap();
        assert_eq!(result.fronts, vec![vec![2, 3], vec![0, 1]]);
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_empty_is_error() {
        let objs: Vec<Vec<f64>> = vec![];
        assert_eq!(crowding_distance(&objs), Err(Nsga2Error::EmptyPopulation));
    }

    #[test]
    fn test_crowding_single() {
        let dist = crowding_distance(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(dist.len(), 1);
        assert!(dist[0].is_infinite());
    }

    #[test]
    fn test_crowding_two() {
        let dist = crowding_distance(&[vec![1.0, 3.0], vec![3.0, 1.0]]).unwrap();
        assert!(dist.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs).unwrap();

        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());

        // (2/4) per objective, two objectives
        for &d in &dist[1..4] {
            assert!((d - 1.0).abs() < 1e-10, "expected 1.0, got {d}");
        }
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs).unwrap();
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        // Only the first objective contributes: (3 - 1) / 2
        assert!((dist[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_unsorted_input() {
        let objs = vec![vec![3.0, 3.0], vec![5.0, 1.0], vec![1.0, 5.0], vec![4.0, 2.0]];
        let dist = crowding_distance(&objs).unwrap();
        assert!(dist[1].is_infinite());
        assert!(dist[2].is_infinite());
        // index 0: obj0 neighbours 1 and 4 → 3/4; obj1 neighbours 2 and 5 → 3/4
        assert!((dist[0] - 1.5).abs() < 1e-12);
        // index 3: obj0 neighbours 3 and 5 → 2/4; obj1 neighbours 1 and 3 → 2/4
        assert!((dist[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_is_deterministic_with_ties() {
        let objs = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]];
        let a = crowding_distance(&objs).unwrap();
        let b = crowding_distance(&objs).unwrap();
        assert_eq!(a, b);
        assert!(a[0].is_infinite());
        assert!(a[3].is_infinite());
        assert_eq!(a[1], 0.0);
        assert_eq!(a[2], 0.0);
    }

    #[test]
    fn test_crowding_extreme_range_stays_finite() {
        // max - min overflows to infinity on both objectives.
        let objs = vec![vec![-1e308, 1e308], vec![0.0, 0.0], vec![1e308, -1e308]];
        let dist = crowding_distance(&objs).unwrap();
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        // Two objectives, each contributing (1e308 - -1e308) / range = 1.
        assert!((dist[1] - 2.0).abs() < 1e-12, "got {}", dist[1]);
    }

    #[test]
    fn test_non_finite_objective_is_error() {
        let objs = vec![vec![1.0, 2.0], vec![0.5, f64::NAN]];
        assert!(matches!(
            non_dominated_sort(&objs),
            Err(Nsga2Error::NonFiniteObjective {
                candidate: 1,
                objective: 1,
                value
            }) if value.is_nan()
        ));
        assert!(matches!(
            crowding_distance(&[vec![f64::INFINITY], vec![0.0]]),
            Err(Nsga2Error::NonFiniteObjective { candidate: 0, .. })
        ));
    }

    // ---- Per-front crowding and truncation order ----

    #[test]
    fn test_assign_crowding_is_per_front() {
        let objs = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0], // front 1, alone
            vec![6.0, 6.0], // front 2, alone
        ];
        let fronts = non_dominated_sort(&objs).unwrap();
        let dist = assign_crowding_distance(&objs, &fronts).unwrap();

        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!((dist[1] - 2.0).abs() < 1e-12);
        assert!(dist[3].is_infinite());
        assert!(dist[4].is_infinite());
    }

    #[test]
    fn test_crowded_cmp() {
        assert_eq!(crowded_cmp(0, 1.0, 1, f64::INFINITY), Ordering::Less);
        assert_eq!(crowded_cmp(1, 2.0, 1, 1.0), Ordering::Less);
        assert_eq!(crowded_cmp(1, 1.0, 1, f64::INFINITY), Ordering::Greater);
        assert_eq!(crowded_cmp(2, 1.0, 2, 1.0), Ordering::Equal);
    }

    #[test]
    fn test_survivor_order() {
        let fronts = FrontAssignment {
            ranks: vec![1, 0, 0, 1, 0],
            fronts: vec![vec![1, 2, 4], vec![0, 3]],
        };
        let dist = vec![f64::INFINITY, 0.5, f64::INFINITY, 0.2, 0.5];
        // Rank 0 first: 2 (inf), then 1 and 4 tied at 0.5 in index order.
        assert_eq!(survivor_order(&fronts, &dist).unwrap(), vec![2, 1, 4, 0, 3]);
    }

    #[test]
    fn test_survivor_order_length_mismatch() {
        let fronts = FrontAssignment {
            ranks: vec![0, 0, 1],
            fronts: vec![vec![0, 1], vec![2]],
        };
        assert_eq!(
            survivor_order(&fronts, &[f64::INFINITY, f64::INFINITY]),
            Err(Nsga2Error::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
    }
}
