//! NSGA-II multi-objective evolutionary optimization.
//!
//! Evolves a population of real-valued candidates toward the Pareto-optimal
//! trade-off surface of two or more conflicting objectives while keeping
//! the population spread out along it.
//!
//! # Core Types
//!
//! - [`Candidate`]: An immutable vector of decision variables
//! - [`Bounds`]: Closed interval every decision variable lives in
//! - [`Objective`]: Caller-supplied function to minimize (any `Fn(&[f64]) -> f64`)
//! - [`Nsga2Config`]: Algorithm parameters
//! - [`Nsga2Runner`]: Seeds, initializes, and executes the generational loop
//! - [`Observer`]: Per-generation hook for inspection and custom stopping
//!
//! # Step Functions
//!
//! - [`initialize_population`], [`evaluate`], [`rank_population`],
//!   [`generate_offspring`], [`run_generation`], [`run`]
//!
//! # Submodules
//!
//! - [`multi_objective`]: Dominance, non-dominated sorting, crowding distance
//! - [`operators`]: Real-valued crossover and mutation
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Deb (2001), *Multi-Objective Optimization Using Evolutionary Algorithms*

mod config;
mod error;
pub mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::Nsga2Config;
pub use error::{Nsga2Error, Result};
pub use multi_objective::FrontAssignment;
pub use operators::{Crossover, Mutation};
pub use runner::{
    create_rng, evaluate, generate_offspring, initialize_population, rank_population, run,
    run_generation, Control, NoopObserver, Nsga2Result, Nsga2Runner, Observer, RankedPopulation,
};
pub use selection::Selection;
pub use types::{Bounds, Candidate, Objective, ObjectiveVector, Population};
