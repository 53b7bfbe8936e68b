//! NSGA-II generational loop.
//!
//! Each generation runs:
//! evaluate → non-dominated sort → crowding → offspring (selection,
//! crossover, mutation) → union with parents → re-evaluate → re-rank →
//! re-crowd → truncate to N.
//!
//! The free functions expose each step; [`run`] drives the loop and
//! [`Nsga2Runner`] adds seeding and initialization on top.

use super::config::Nsga2Config;
use super::error::{Nsga2Error, Result};
use super::multi_objective::{
    assign_crowding_distance, non_dominated_sort, survivor_order, FrontAssignment,
};
use super::types::{check_dimensions, Bounds, Candidate, Objective, ObjectiveVector, Population};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A population together with its objective vectors, fronts, and
/// crowding distances, all indexed by candidate position.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPopulation {
    /// The candidates.
    pub population: Population,

    /// `objectives[i]` belongs to `population[i]`.
    pub objectives: Vec<ObjectiveVector>,

    /// Pareto fronts over `objectives`.
    pub fronts: FrontAssignment,

    /// Crowding distance of each candidate within its own front.
    pub crowding: Vec<f64>,
}

impl RankedPopulation {
    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.population.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Rank-0 candidates paired with their objective vectors.
    pub fn pareto_front(&self) -> Vec<(&Candidate, &ObjectiveVector)> {
        front_members(&self.population, &self.objectives, &self.fronts)
    }
}

fn front_members<'a>(
    population: &'a [Candidate],
    objectives: &'a [ObjectiveVector],
    fronts: &FrontAssignment,
) -> Vec<(&'a Candidate, &'a ObjectiveVector)> {
    fronts
        .fronts
        .first()
        .map(|front| {
            front
                .iter()
                .map(|&i| (&population[i], &objectives[i]))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the loop should keep going after an observed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Run the next generation.
    Continue,
    /// Terminate now and return the current population.
    Stop,
}

/// Hook called once per generation.
///
/// This is the sole extension point for plotting, logging, persistence,
/// or a custom stopping criterion. Any
/// `FnMut(usize, &RankedPopulation) -> Control` closure is an observer.
///
/// Fired **after truncation**: `ranked` holds the N survivors that form the
/// next parent population, freshly evaluated, sorted into fronts, and
/// crowded. `generation` counts completed generations, starting at 1.
pub trait Observer {
    /// Inspects a completed generation.
    fn on_generation(&mut self, generation: usize, ranked: &RankedPopulation) -> Control;
}

impl<F> Observer for F
where
    F: FnMut(usize, &RankedPopulation) -> Control,
{
    fn on_generation(&mut self, generation: usize, ranked: &RankedPopulation) -> Control {
        self(generation, ranked)
    }
}

/// Observer that never stops the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn on_generation(&mut self, _generation: usize, _ranked: &RankedPopulation) -> Control {
        Control::Continue
    }
}

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct Nsga2Result {
    /// Final parent population.
    pub population: Population,

    /// Objective vectors of the final population.
    pub objectives: Vec<ObjectiveVector>,

    /// Fronts of the final population.
    pub fronts: FrontAssignment,

    /// Crowding distances of the final population.
    pub crowding: Vec<f64>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the observer or the time limit ended the run.
    pub stopped_early: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

impl Nsga2Result {
    /// Non-dominated candidates of the final population with their objectives.
    pub fn pareto_front(&self) -> Vec<(&Candidate, &ObjectiveVector)> {
        front_members(&self.population, &self.objectives, &self.fronts)
    }
}

// ============================================================================
// Single steps
// ============================================================================

/// Creates `size` candidates whose variables are drawn independently and
/// uniformly from `bounds`.
///
/// # Errors
///
/// - [`Nsga2Error::EmptyPopulation`] if `size == 0`
/// - [`Nsga2Error::DimensionMismatch`] if `dimensions == 0`
pub fn initialize_population<R: Rng>(
    size: usize,
    bounds: &Bounds,
    dimensions: usize,
    rng: &mut R,
) -> Result<Population> {
    bounds.validate()?;
    if size == 0 {
        return Err(Nsga2Error::EmptyPopulation);
    }
    if dimensions == 0 {
        return Err(Nsga2Error::DimensionMismatch {
            expected: 1,
            found: 0,
        });
    }
    Ok((0..size)
        .map(|_| Candidate::new((0..dimensions).map(|_| bounds.sample(rng)).collect()))
        .collect())
}

/// Evaluates every objective for every candidate, preserving order.
///
/// With `parallel` (and the `parallel` feature), candidates are evaluated
/// on the rayon pool; the output is identical to the sequential path.
///
/// # Errors
///
/// - [`Nsga2Error::NoObjectives`] if `objectives` is empty
/// - [`Nsga2Error::DimensionMismatch`] if candidates differ in length
/// - [`Nsga2Error::NonFiniteObjective`] if any objective yields NaN or ±∞
pub fn evaluate(
    population: &[Candidate],
    objectives: &[&dyn Objective],
    parallel: bool,
) -> Result<Vec<ObjectiveVector>> {
    if objectives.is_empty() {
        return Err(Nsga2Error::NoObjectives);
    }
    if let Some(first) = population.first() {
        check_dimensions(population, first.dimensions())?;
    }

    let values = evaluate_all(population, objectives, parallel);

    for (candidate, vector) in values.iter().enumerate() {
        if let Some((objective, &value)) = vector.iter().enumerate().find(|(_, v)| !v.is_finite())
        {
            return Err(Nsga2Error::NonFiniteObjective {
                candidate,
                objective,
                value,
            });
        }
    }
    Ok(values)
}

fn evaluate_one(candidate: &Candidate, objectives: &[&dyn Objective]) -> ObjectiveVector {
    objectives
        .iter()
        .map(|f| f.evaluate(candidate.genes()))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    population: &[Candidate],
    objectives: &[&dyn Objective],
    parallel: bool,
) -> Vec<ObjectiveVector> {
    use rayon::prelude::*;

    if parallel {
        population
            .par_iter()
            .map(|c| evaluate_one(c, objectives))
            .collect()
    } else {
        population
            .iter()
            .map(|c| evaluate_one(c, objectives))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    population: &[Candidate],
    objectives: &[&dyn Objective],
    _parallel: bool,
) -> Vec<ObjectiveVector> {
    population
        .iter()
        .map(|c| evaluate_one(c, objectives))
        .collect()
}

/// Evaluates, sorts into fronts, and crowds a population.
pub fn rank_population(
    population: Population,
    objectives: &[&dyn Objective],
    parallel: bool,
) -> Result<RankedPopulation> {
    let values = evaluate(&population, objectives, parallel)?;
    let fronts = non_dominated_sort(&values)?;
    let crowding = assign_crowding_distance(&values, &fronts)?;
    Ok(RankedPopulation {
        population,
        objectives: values,
        fronts,
        crowding,
    })
}

/// Produces an offspring population of the same size as `parents`.
///
/// Parents are chosen by `config.selection` on `(rank, crowding)`.
/// Each pair is recombined with probability `config.crossover_rate`
/// (otherwise both pass through), then every child is mutated per
/// variable with `config.mutation_rate` and clipped to `config.bounds`.
pub fn generate_offspring<R: Rng>(
    parents: &RankedPopulation,
    config: &Nsga2Config,
    rng: &mut R,
) -> Result<Population> {
    let n = parents.len();
    if n == 0 {
        return Err(Nsga2Error::EmptyPopulation);
    }
    let ranks = &parents.fronts.ranks;
    let crowding = &parents.crowding;

    let mut offspring = Vec::with_capacity(n);
    while offspring.len() < n {
        let p1 = &parents.population[config.selection.select(ranks, crowding, rng)?];
        let p2 = &parents.population[config.selection.select(ranks, crowding, rng)?];

        let (c1, c2) = if rng.random_range(0.0..1.0) < config.crossover_rate {
            config
                .crossover
                .apply(p1.genes(), p2.genes(), &config.bounds, rng)?
        } else {
            (p1.genes().to_vec(), p2.genes().to_vec())
        };

        for child in [c1, c2] {
            if offspring.len() >= n {
                break;
            }
            let genes = config
                .mutation
                .apply(&child, config.mutation_rate, &config.bounds, rng);
            offspring.push(Candidate::new(genes));
        }
    }
    Ok(offspring)
}

/// Runs one full generation and returns the next parent population.
///
/// The population size N is `population.len()`; `config.population_size`
/// is only used when the runner creates the initial population.
///
/// # Errors
///
/// Configuration, dimensions, and objectives are validated before any work.
pub fn run_generation<R: Rng>(
    population: &[Candidate],
    objectives: &[&dyn Objective],
    config: &Nsga2Config,
    rng: &mut R,
) -> Result<Population> {
    validate_inputs(population, objectives, config)?;
    let parents = rank_population(population.to_vec(), objectives, config.parallel)?;
    combine_and_truncate(&parents, objectives, config, rng)
}

/// Offspring generation plus elitist survivor selection on a ranked parent set.
fn combine_and_truncate<R: Rng>(
    parents: &RankedPopulation,
    objectives: &[&dyn Objective],
    config: &Nsga2Config,
    rng: &mut R,
) -> Result<Population> {
    let n = parents.len();
    let offspring = generate_offspring(parents, config, rng)?;

    // R = P ∪ Q is a fresh population: evaluate it from scratch.
    let combined: Population = parents.population.iter().cloned().chain(offspring).collect();
    let combined = rank_population(combined, objectives, config.parallel)?;

    let order = survivor_order(&combined.fronts, &combined.crowding)?;
    Ok(order[..n]
        .iter()
        .map(|&i| combined.population[i].clone())
        .collect())
}

fn validate_inputs(
    population: &[Candidate],
    objectives: &[&dyn Objective],
    config: &Nsga2Config,
) -> Result<()> {
    config.validate()?;
    if population.is_empty() {
        return Err(Nsga2Error::EmptyPopulation);
    }
    if objectives.is_empty() {
        return Err(Nsga2Error::NoObjectives);
    }
    check_dimensions(population, config.dimensions)
}

// ============================================================================
// Loop
// ============================================================================

/// Runs up to `config.max_generations` generations from `population`.
///
/// The observer is invoked after each generation's truncation with the
/// ranked survivors; returning [`Control::Stop`] ends the run.
///
/// Given the same seed for `rng`, the same objectives, and the same
/// configuration, two runs produce bit-identical populations.
pub fn run<R: Rng, O: Observer + ?Sized>(
    population: Population,
    objectives: &[&dyn Objective],
    config: &Nsga2Config,
    rng: &mut R,
    observer: &mut O,
) -> Result<Nsga2Result> {
    drive(population, objectives, config, rng, observer, None)
}

fn drive<R: Rng, O: Observer + ?Sized>(
    population: Population,
    objectives: &[&dyn Objective],
    config: &Nsga2Config,
    rng: &mut R,
    observer: &mut O,
    cancel: Option<&AtomicBool>,
) -> Result<Nsga2Result> {
    validate_inputs(&population, objectives, config)?;

    info!(
        "NSGA-II: {} candidates x {} variables, {} objectives, up to {} generations",
        population.len(),
        config.dimensions,
        objectives.len(),
        config.max_generations
    );

    let start = Instant::now();
    let mut ranked = rank_population(population, objectives, config.parallel)?;
    let mut generations = 0usize;
    let mut stopped_early = false;
    let mut cancelled = false;

    for gen in 0..config.max_generations {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            warn!("NSGA-II cancelled after {gen} generations");
            cancelled = true;
            break;
        }
        if let Some(limit) = config.time_limit_ms {
            if start.elapsed().as_millis() >= u128::from(limit) {
                warn!("NSGA-II hit time limit of {limit} ms after {gen} generations");
                stopped_early = true;
                break;
            }
        }

        let next = combine_and_truncate(&ranked, objectives, config, rng)?;
        ranked = rank_population(next, objectives, config.parallel)?;
        generations = gen + 1;

        debug!(
            "generation {}: {} fronts, {} non-dominated",
            generations,
            ranked.fronts.front_count(),
            ranked.fronts.fronts[0].len()
        );

        if observer.on_generation(generations, &ranked) == Control::Stop {
            debug!("observer stopped the run at generation {generations}");
            stopped_early = true;
            break;
        }
    }

    info!(
        "NSGA-II finished after {} generations in {:?}",
        generations,
        start.elapsed()
    );

    let RankedPopulation {
        population,
        objectives,
        fronts,
        crowding,
    } = ranked;
    Ok(Nsga2Result {
        population,
        objectives,
        fronts,
        crowding,
        generations,
        stopped_early,
        cancelled,
    })
}

/// Creates a seeded random number generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seeds, initializes, and runs NSGA-II from a configuration.
///
/// # Usage
///
/// ```
/// use u_nsga2::nsga2::{Bounds, Nsga2Config, Nsga2Runner, Objective};
///
/// let f1 = |x: &[f64]| x[0] * x[0];
/// let f2 = |x: &[f64]| (x[0] - 2.0).powi(2);
/// let objectives: [&dyn Objective; 2] = [&f1, &f2];
///
/// let config = Nsga2Config::default()
///     .with_population_size(20)
///     .with_max_generations(30)
///     .with_bounds(Bounds::new(-5.0, 5.0).unwrap())
///     .with_seed(42);
///
/// let result = Nsga2Runner::run(&objectives, &config).unwrap();
/// assert_eq!(result.population.len(), 20);
/// assert!(!result.pareto_front().is_empty());
/// ```
pub struct Nsga2Runner;

impl Nsga2Runner {
    /// Runs NSGA-II with a random initial population.
    pub fn run(objectives: &[&dyn Objective], config: &Nsga2Config) -> Result<Nsga2Result> {
        Self::run_with(objectives, config, &mut NoopObserver, None)
    }

    /// Runs NSGA-II, reporting every generation to `observer`.
    pub fn run_with_observer<O: Observer + ?Sized>(
        objectives: &[&dyn Objective],
        config: &Nsga2Config,
        observer: &mut O,
    ) -> Result<Nsga2Result> {
        Self::run_with(objectives, config, observer, None)
    }

    /// Runs NSGA-II with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the current population.
    pub fn run_with_cancel(
        objectives: &[&dyn Objective],
        config: &Nsga2Config,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Nsga2Result> {
        Self::run_with(objectives, config, &mut NoopObserver, cancel)
    }

    fn run_with<O: Observer + ?Sized>(
        objectives: &[&dyn Objective],
        config: &Nsga2Config,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Nsga2Result> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let population = initialize_population(
            config.population_size,
            &config.bounds,
            config.dimensions,
            &mut rng,
        )?;

        drive(
            population,
            objectives,
            config,
            &mut rng,
            observer,
            cancel.as_deref(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
