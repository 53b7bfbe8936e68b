//! NSGA-II configuration.
//!
//! [`Nsga2Config`] holds all parameters that control the generational loop.

use super::error::{Nsga2Error, Result};
use super::operators::{Crossover, Mutation};
use super::selection::Selection;
use super::types::Bounds;

/// Configuration for NSGA-II.
///
/// Controls population size, decision-space shape, operator choice and
/// rates, termination, and parallelism.
///
/// # Defaults
///
/// ```
/// use u_nsga2::nsga2::{Nsga2Config, Selection};
///
/// let config = Nsga2Config::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 250);
/// assert_eq!(config.selection, Selection::Tournament(2));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_nsga2::nsga2::{Bounds, Crossover, Mutation, Nsga2Config};
///
/// let config = Nsga2Config::default()
///     .with_population_size(40)
///     .with_dimensions(3)
///     .with_bounds(Bounds::new(-5.0, 5.0).unwrap())
///     .with_crossover(Crossover::Blend { alpha: 0.5 })
///     .with_mutation(Mutation::Uniform)
///     .with_mutation_rate(1.0 / 3.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga2Config {
    /// Number of candidates in each parent population (N).
    ///
    /// Each generation transiently holds 2N candidates.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Number of decision variables per candidate.
    pub dimensions: usize,

    /// Closed interval every decision variable lives in.
    pub bounds: Bounds,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Crossover operator.
    pub crossover: Crossover,

    /// Mutation operator.
    pub mutation: Mutation,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents pass through unchanged.
    pub crossover_rate: f64,

    /// Per-variable mutation probability (0.0–1.0).
    ///
    /// A common choice is `1 / dimensions`.
    pub mutation_rate: f64,

    /// Whether to evaluate objectives in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Results are
    /// identical either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the run may exceed the
    /// limit by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 250,
            dimensions: 1,
            bounds: Bounds::default(),
            selection: Selection::default(),
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl Nsga2Config {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the number of decision variables.
    pub fn with_dimensions(mut self, n: usize) -> Self {
        self.dimensions = n;
        self
    }

    /// Sets the decision-variable bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, op: Crossover) -> Self {
        self.crossover = op;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, op: Mutation) -> Self {
        self.mutation = op;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-variable mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    ///
    /// Called eagerly by every generation step, before any work is done.
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        if self.population_size == 0 {
            return Err(Nsga2Error::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.dimensions == 0 {
            return Err(Nsga2Error::InvalidConfig(
                "dimensions must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Nsga2Error::InvalidConfig(
                "crossover_rate must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Nsga2Error::InvalidConfig(
                "mutation_rate must be within [0, 1]".into(),
            ));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(Nsga2Error::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        match self.crossover {
            Crossover::Sbx { eta } if !(eta >= 0.0 && eta.is_finite()) => {
                return Err(Nsga2Error::InvalidConfig(
                    "SBX distribution index must be finite and non-negative".into(),
                ));
            }
            Crossover::Blend { alpha } if !(alpha >= 0.0 && alpha.is_finite()) => {
                return Err(Nsga2Error::InvalidConfig(
                    "BLX alpha must be finite and non-negative".into(),
                ));
            }
            _ => {}
        }
        match self.mutation {
            Mutation::Polynomial { eta } if !(eta >= 0.0 && eta.is_finite()) => {
                return Err(Nsga2Error::InvalidConfig(
                    "polynomial distribution index must be finite and non-negative".into(),
                ));
            }
            Mutation::Perturb { scale } if !(scale > 0.0 && scale.is_finite()) => {
                return Err(Nsga2Error::InvalidConfig(
                    "perturbation scale must be finite and positive".into(),
                ));
            }
            _ => {}
        }
        if self.time_limit_ms == Some(0) {
            return Err(Nsga2Error::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
