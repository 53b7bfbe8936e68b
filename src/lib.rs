//! Domain-agnostic NSGA-II multi-objective optimization.
//!
//! Provides the per-generation machinery of the Non-dominated Sorting
//! Genetic Algorithm II:
//!
//! - **Front assignment**: fast non-dominated sorting into ranked Pareto fronts
//! - **Crowding distance**: per-front diversity measure
//! - **Variation**: crowded binary tournament selection, real-valued
//!   crossover (SBX, BLX-α, arithmetic) and bounded mutation
//! - **Elitist survivor selection**: parents and offspring combined,
//!   re-ranked, and truncated by `(rank, crowding)`
//!
//! # Architecture
//!
//! The crate contains no domain-specific concepts. Objective functions,
//! plotting, persistence, and any driving program are supplied by
//! consumers; the [`nsga2::Observer`] hook is the single seam for
//! inspecting each generation.
//!
//! # Example
//!
//! ```
//! use u_nsga2::nsga2::{Bounds, Nsga2Config, Nsga2Runner, Objective};
//!
//! let f1 = |x: &[f64]| x[0] * x[0];
//! let f2 = |x: &[f64]| (x[0] - 2.0).powi(2);
//! let objectives: [&dyn Objective; 2] = [&f1, &f2];
//!
//! let config = Nsga2Config::default()
//!     .with_population_size(16)
//!     .with_max_generations(10)
//!     .with_bounds(Bounds::new(-5.0, 5.0).unwrap())
//!     .with_seed(1);
//!
//! let result = Nsga2Runner::run(&objectives, &config).unwrap();
//! for (candidate, objectives) in result.pareto_front() {
//!     assert_eq!(candidate.dimensions(), 1);
//!     assert_eq!(objectives.len(), 2);
//! }
//! ```

pub mod nsga2;
