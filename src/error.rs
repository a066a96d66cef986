use thiserror::Error;

/// Errors returned by the PAM engines, the worker group and the benchmark harness.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested medoid count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of medoids.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Coordinate buffer does not divide into points of the given dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A precomputed matrix breaks the symmetric / zero-diagonal / finite contract.
    #[error("invalid dissimilarity matrix at ({row}, {col}): {reason}")]
    InvalidMatrix {
        row: usize,
        col: usize,
        reason: &'static str,
    },

    /// The pool cannot admit a group of the requested size.
    #[error("worker pool holds {available} workers, but {requested} were requested")]
    InsufficientWorkers { requested: usize, available: usize },

    /// A group member went away before posting its result for the current round.
    #[error("worker {rank} left the group mid-collective")]
    GroupDisconnected { rank: usize },

    /// A group member posted a message the current collective does not expect.
    #[error("protocol violation from worker {rank}: expected {expected}")]
    ProtocolViolation { rank: usize, expected: &'static str },

    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },

    /// Input stream ended before enough values were read.
    #[error("input ended after {found} values, {expected} required")]
    ShortInput { expected: usize, found: usize },

    /// Token could not be parsed as a number.
    #[error("cannot parse {token:?} at position {position}")]
    Parse { token: String, position: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
