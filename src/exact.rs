//! Exact sorting distances of every permutation of a given size.
//!
//! The distance of a permutation is the minimal total weight of inversions sorting it. As every
//! inversion is its own inverse, this equals the distance from the identity to the permutation,
//! which is computed by a single Dijkstra search starting at the identity.
//!
//! Distances are integers and all permutations sharing the smallest pending distance are finalized
//! together as one layer. Within a layer permutations are processed in increasing code order.
use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{perm::Permutation, problem::Problem};

/// Statistics of a completed exact search.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ExactSummary {
    /// Number of permutations reached, each emitted exactly once.
    pub permutations: u64,
    /// Number of distinct distances.
    pub layers: usize,
    /// Largest distance found.
    pub max_distance: u32,
    /// Wall clock time of the search.
    pub elapsed: Duration,
}

/// Exhaustive shortest distance search over all permutations of a problem.
pub struct ExactSolver<'a> {
    problem: &'a Problem,
}

impl<'a> ExactSolver<'a> {
    /// Creates a solver for the given problem.
    pub fn new(problem: &'a Problem) -> Self {
        ExactSolver { problem }
    }

    /// Computes all distances, passing each `(code, distance)` pair to `sink`.
    ///
    /// Pairs are emitted in non-decreasing distance order, starting with the identity at distance
    /// zero.
    pub fn solve(&self, mut sink: impl FnMut(u64, u32)) -> ExactSummary {
        let result: Result<_, Infallible> = self.try_solve(|code, distance| {
            sink(code, distance);
            Ok(())
        });
        match result {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Returns the distances of all permutations.
    pub fn distances(&self) -> HashMap<u64, u32> {
        let mut distances = HashMap::new();
        self.solve(|code, distance| {
            distances.insert(code, distance);
        });
        distances
    }

    /// Like [`Self::solve`], but stops at the first error returned by `sink`.
    pub fn try_solve<E>(
        &self,
        mut sink: impl FnMut(u64, u32) -> Result<(), E>,
    ) -> Result<ExactSummary, E> {
        let start = Instant::now();
        let codec = self.problem.codec();
        let inversions = self.problem.inversions();

        info!(
            event = "exact_start",
            n = codec.len(),
            signed = codec.is_signed(),
            moves = inversions.len(),
        );

        let mut tentative: HashMap<u64, u32> = HashMap::new();
        let mut visited: HashSet<u64> = HashSet::new();
        let mut summary = ExactSummary::default();

        let identity = codec.identity();
        tentative.insert(identity, 0);
        let mut frontier = vec![identity];
        let mut distance = 0;

        while !frontier.is_empty() {
            for &code in &frontier {
                tentative.remove(&code);
                sink(code, distance)?;
                visited.insert(code);

                let mut pi = Permutation::from_codec_unchecked(code, codec);
                for inversion in inversions {
                    pi.apply_inversion(inversion.i, inversion.j);
                    let next = pi.encode();
                    pi.apply_inversion(inversion.i, inversion.j);

                    if visited.contains(&next) {
                        continue;
                    }
                    let relaxed = distance + inversion.w;
                    tentative
                        .entry(next)
                        .and_modify(|pending| *pending = (*pending).min(relaxed))
                        .or_insert(relaxed);
                }
            }

            summary.permutations += frontier.len() as u64;
            summary.layers += 1;
            summary.max_distance = distance;
            debug!(
                event = "layer",
                distance,
                size = frontier.len(),
                pending = tentative.len(),
            );

            frontier.clear();
            if let Some(&next_distance) = tentative.values().min() {
                distance = next_distance;
                frontier.extend(
                    tentative
                        .iter()
                        .filter(|&(_, &pending)| pending == next_distance)
                        .map(|(&code, _)| code),
                );
                frontier.sort_unstable();
            }
        }

        summary.elapsed = start.elapsed();
        info!(
            event = "exact_end",
            permutations = summary.permutations,
            layers = summary.layers,
            max_distance = summary.max_distance,
            duration_ms = summary.elapsed.as_millis() as u64,
        );

        Ok(summary)
    }
}
