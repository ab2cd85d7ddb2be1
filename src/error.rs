//! Error type shared by all fallible operations of this crate.
use thiserror::Error;

use crate::perm::ParseError;

/// Errors produced when constructing permutations, problems or when reading and writing
/// databases.
#[derive(Debug, Error)]
pub enum Error {
    /// The permutation size is not supported for the requested sign mode.
    #[error("unsupported permutation size {n} (signed: {signed}, maximum is {max})")]
    InvalidWidth {
        /// Requested size.
        n: usize,
        /// Requested sign mode.
        signed: bool,
        /// Largest size supported by the sign mode.
        max: usize,
    },

    /// The given entries do not form a permutation.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// The problem identifier does not name a modeled problem.
    #[error("unknown problem identifier {0}")]
    UnknownProblem(u16),

    /// The heuristic name or identifier is not known.
    #[error("unknown heuristic {0:?}")]
    UnknownHeuristic(String),

    /// A textual permutation could not be parsed.
    #[error("could not parse permutation: {0}")]
    Parse(#[from] ParseError),

    /// A database or evaluation stream is truncated or contains unparsable data.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`RunConfig`][crate::config::RunConfig].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration is well-formed but describes an unsupported run.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
