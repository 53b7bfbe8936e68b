//! Error type shared by every NSGA-II operation.

/// Errors reported by NSGA-II operations.
///
/// All input validation happens eagerly at the start of an operation; no
/// partial generation is ever produced on invalid input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Nsga2Error {
    /// The lower bound is not strictly below the upper bound, or either is not finite.
    #[error("invalid bounds: lower ({lower}) must be finite and strictly below upper ({upper})")]
    InvalidBounds { lower: f64, upper: f64 },

    /// Decision-variable count or objective arity differs across candidates.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A front, crowding, or selection operation was invoked on zero candidates.
    #[error("operation requires at least one candidate")]
    EmptyPopulation,

    /// No objective functions were supplied.
    #[error("at least one objective is required")]
    NoObjectives,

    /// An objective returned NaN or an infinite value.
    #[error("objective {objective} returned non-finite value {value} for candidate {candidate}")]
    NonFiniteObjective {
        candidate: usize,
        objective: usize,
        value: f64,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Nsga2Error>;
