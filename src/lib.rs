//! Swils sorts small signed and unsigned permutations by weighted inversions.
//!
//! An inversion reverses a contiguous range of positions, negating the moved elements of signed
//! permutations. In the SWI-LS problem its weight depends on the slices of its endpoints, i.e. on
//! their distances to the nearer end of the permutation. The crate computes exact sorting
//! distances for every permutation of a given size and compares them with the results of several
//! greedy heuristics.
//!
//! ```
//! use swils::{heuristics::{sort, Heuristic}, perm::Permutation, problem::Problem};
//!
//! let problem = Problem::swi_ls(4, false)?;
//! let pi = Permutation::parse("2,1,4,3", false)?;
//! let report = sort(&pi, &problem, Heuristic::Lr);
//! assert_eq!(report.weight, Some(4));
//! # Ok::<(), swils::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod db;
pub mod error;
pub mod eval;
pub mod exact;
pub mod heuristics;
pub mod perm;
pub mod pipeline;
pub mod problem;
pub mod rand;
pub mod stats;
pub mod word;

pub use error::{Error, Result};
