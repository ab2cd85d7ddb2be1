//! Greedy strategies choosing inversions that approximately sort a permutation.
//!
//! Every strategy looks at the current permutation and proposes the next inversion to apply, or
//! `None` when it gives up. The [`sort`] and [`sort_code`] drivers apply proposed inversions until
//! the identity is reached, the strategy gives up or too many inversions were applied.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    perm::Permutation,
    problem::{Inversion, Problem},
};

mod lr;
mod nb;
mod smp;
mod strip;

/// A run is abandoned after applying more than this many inversions per element.
pub const LIMIT_MULTIPLIER: usize = 15;

/// Available sorting heuristics, in the order of their identifiers.
///
/// Serialized by name, deserialized from anything [`FromStr`] accepts.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Heuristic {
    /// Corrects the outermost misplaced position, choosing the cheaper side.
    Lr,
    /// Maximizes the reduction of slice misplaced pairs per weight.
    Smp,
    /// Maximizes the reduction of breakpoints per weight, falling back to [`Heuristic::Lr`].
    NbLr,
    /// Breakpoint reduction, falling back to reversing the unsorted middle.
    NbStrip,
    /// Breakpoint reduction, falling back to the cheapest inversion between strip boundaries.
    NbBestStrip,
    /// Breakpoint reduction, falling back to moving the strip of the outermost misplaced element.
    NbLrStrip,
    /// Reduction of breakpoints with slice misplaced pairs as tie breaker.
    NbSmp,
}

impl Heuristic {
    /// All heuristics ordered by identifier.
    pub const ALL: [Heuristic; 7] = [
        Heuristic::Lr,
        Heuristic::Smp,
        Heuristic::NbLr,
        Heuristic::NbStrip,
        Heuristic::NbBestStrip,
        Heuristic::NbLrStrip,
        Heuristic::NbSmp,
    ];

    /// Stable numeric identifier, `1..=7`.
    pub fn id(self) -> u16 {
        self.index() as u16 + 1
    }

    /// Index into [`Heuristic::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the heuristic with the given identifier.
    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }

    /// Display name, as used in configuration files and reports.
    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Lr => "LR",
            Heuristic::Smp => "SMP",
            Heuristic::NbLr => "NB+LR",
            Heuristic::NbStrip => "NB+STRIP",
            Heuristic::NbBestStrip => "NB+BESTSTRIP",
            Heuristic::NbLrStrip => "NB+LRSTRIP",
            Heuristic::NbSmp => "NB+SMP",
        }
    }

    /// Proposes the next inversion for a permutation that is not the identity.
    pub fn next_inversion(self, pi: &Permutation, problem: &Problem) -> Option<Inversion> {
        match self {
            Heuristic::Lr => lr::lr(pi, problem),
            Heuristic::Smp => smp::smp(pi, problem),
            Heuristic::NbLr => nb::nb(pi, problem).or_else(|| lr::lr(pi, problem)),
            Heuristic::NbStrip => nb::nb(pi, problem).or_else(|| Some(strip::middle(pi, problem))),
            Heuristic::NbBestStrip => nb::nb(pi, problem).or_else(|| strip::best(pi, problem)),
            Heuristic::NbLrStrip => {
                nb::nb(pi, problem).or_else(|| Some(strip::outermost(pi, problem)))
            }
            Heuristic::NbSmp => smp::nb_smp(pi, problem),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = Error;

    /// Accepts a name, ignoring case, or a numeric identifier.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u16>() {
            return Self::from_id(id).ok_or_else(|| Error::UnknownHeuristic(s.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|heuristic| heuristic.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownHeuristic(s.to_owned()))
    }
}

impl TryFrom<String> for Heuristic {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Heuristic> for &'static str {
    fn from(heuristic: Heuristic) -> Self {
        heuristic.name()
    }
}

/// Result of sorting a single permutation with [`sort`].
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SortReport {
    /// Inversions in the order they were applied.
    pub inversions: Vec<Inversion>,
    /// Total weight of the applied inversions, `None` if the identity was not reached.
    pub weight: Option<u32>,
}

/// Renders the weight, or `Loop or heuristic error.` for a failed run, followed by one line per
/// applied inversion.
impl fmt::Display for SortReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) => writeln!(f, "{weight}")?,
            None => writeln!(f, "Loop or heuristic error.")?,
        }
        for (index, inversion) in self.inversions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{inversion}")?;
        }
        Ok(())
    }
}

/// Sorts a permutation and reports the applied inversions.
pub fn sort(pi: &Permutation, problem: &Problem, heuristic: Heuristic) -> SortReport {
    let mut inversions = vec![];
    let weight = run(pi.clone(), problem, heuristic, |inversion| {
        inversions.push(inversion)
    });
    SortReport { inversions, weight }
}

/// Sorts the permutation with the given code and returns the total weight.
///
/// The weight is `None` if the heuristic failed to reach the identity. Fails with
/// [`Error::InvalidPermutation`] if `code` does not encode a permutation of the problem's size and
/// sign mode.
pub fn sort_code(code: u64, problem: &Problem, heuristic: Heuristic) -> Result<Option<u32>> {
    let pi = Permutation::from_codec(code, problem.codec())?;
    Ok(run(pi, problem, heuristic, |_| {}))
}

fn run(
    mut pi: Permutation,
    problem: &Problem,
    heuristic: Heuristic,
    mut applied: impl FnMut(Inversion),
) -> Option<u32> {
    let limit = pi.len() * LIMIT_MULTIPLIER;
    let mut weight = 0;
    let mut tries = 0;

    while !pi.is_identity() {
        let Some(inversion) = heuristic.next_inversion(&pi, problem) else {
            debug!(
                event = "sort_failed",
                heuristic = heuristic.name(),
                reason = "no_move",
                tries,
                permutation = %pi,
            );
            break;
        };
        pi.apply_inversion(inversion.i, inversion.j);
        weight += inversion.w;
        applied(inversion);
        trace!(
            event = "step",
            heuristic = heuristic.name(),
            inversion = %inversion,
            permutation = %pi,
        );

        tries += 1;
        if tries > limit {
            debug!(
                event = "sort_failed",
                heuristic = heuristic.name(),
                reason = "limit",
                tries,
                permutation = %pi,
            );
            break;
        }
    }

    pi.is_identity().then_some(weight)
}

/// Outcome of evaluating every inversion of a problem against a score.
struct Scan {
    best: f32,
    inversion: Option<Inversion>,
    zero_unitary: Option<Inversion>,
}

/// Finds the inversion with the largest score decrease per weight.
///
/// Only strictly positive benefits are considered and the first inversion reaching the maximum
/// wins. The first unitary inversion with a zero benefit is recorded separately.
fn scan(pi: &Permutation, problem: &Problem, score: impl Fn(&Permutation) -> f32) -> Scan {
    let mut result = Scan {
        best: 0.0,
        inversion: None,
        zero_unitary: None,
    };
    let pi_score = score(pi);
    let mut sigma = pi.clone();

    for &inversion in problem.inversions() {
        sigma.apply_inversion(inversion.i, inversion.j);
        let benefit = (pi_score - score(&sigma)) / inversion.w as f32;
        sigma.apply_inversion(inversion.i, inversion.j);

        if benefit > result.best {
            result.best = benefit;
            result.inversion = Some(inversion);
        } else if benefit == 0.0 && inversion.is_unitary() && result.zero_unitary.is_none() {
            result.zero_unitary = Some(inversion);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(entries: &[i16], signed: bool) -> Permutation {
        Permutation::from_slice(entries, signed).unwrap()
    }

    #[test]
    fn identifiers_and_names() {
        for (index, heuristic) in Heuristic::ALL.into_iter().enumerate() {
            assert_eq!(heuristic.id() as usize, index + 1);
            assert_eq!(Heuristic::from_id(heuristic.id()), Some(heuristic));
            assert_eq!(heuristic.name().parse::<Heuristic>().unwrap(), heuristic);
            assert_eq!(heuristic.id().to_string().parse::<Heuristic>().unwrap(), heuristic);
        }
        assert_eq!("nb+smp".parse::<Heuristic>().unwrap(), Heuristic::NbSmp);
        assert!(Heuristic::from_id(0).is_none());
        assert!(Heuristic::from_id(8).is_none());
        assert!("NB".parse::<Heuristic>().is_err());
        assert_eq!(Heuristic::NbBestStrip.to_string(), "NB+BESTSTRIP");
    }

    #[test]
    fn lr_sorts_adjacent_swaps() {
        let problem = Problem::swi_ls(4, false).unwrap();
        let pi = perm(&[2, 1, 4, 3], false);
        let report = sort(&pi, &problem, Heuristic::Lr);

        let mut replay = pi.clone();
        for inversion in &report.inversions {
            replay.apply_inversion(inversion.i, inversion.j);
        }
        assert!(replay.is_identity());

        let total: u32 = report
            .inversions
            .iter()
            .map(|inversion| problem.weight(inversion.i, inversion.j))
            .sum();
        assert_eq!(report.weight, Some(total));
        assert_eq!(report.weight, Some(4));
        assert_eq!(
            sort_code(pi.encode(), &problem, Heuristic::Lr).unwrap(),
            report.weight
        );
    }

    #[test]
    fn report_rendering() {
        let problem = Problem::swi_ls(4, false).unwrap();
        let report = sort(&perm(&[2, 1, 4, 3], false), &problem, Heuristic::Lr);
        assert_eq!(report.to_string(), "4\n[1,2] weight=2\n[3,4] weight=2");

        let failed = SortReport {
            inversions: vec![problem.inversion(1, 3)],
            weight: None,
        };
        assert_eq!(
            failed.to_string(),
            "Loop or heuristic error.\n[1,3] weight=2"
        );
        assert_eq!(SortReport::default().to_string(), "Loop or heuristic error.\n");
    }

    #[test]
    fn sort_code_rejects_invalid_codes() {
        let problem = Problem::swi_ls(3, false).unwrap();
        // [1, 1, 1]
        assert!(matches!(
            sort_code(0x000, &problem, Heuristic::NbSmp),
            Err(Error::InvalidPermutation(_))
        ));
        assert_eq!(
            sort_code(problem.codec().identity(), &problem, Heuristic::NbSmp).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn nb_sorts_negated_identity() {
        let problem = Problem::swi_ls(3, true).unwrap();
        let pi = perm(&[-1, -2, -3], true);
        for heuristic in [Heuristic::NbLr, Heuristic::NbStrip, Heuristic::NbBestStrip] {
            let report = sort(&pi, &problem, heuristic);
            assert!(report.weight.is_some(), "{heuristic}");
            assert!(report.inversions.len() <= 3 * LIMIT_MULTIPLIER);
        }
    }

    #[test]
    fn identity_needs_no_moves() {
        for signed in [false, true] {
            let problem = Problem::swi_ls(5, signed).unwrap();
            let pi = Permutation::identity(5, signed).unwrap();
            for heuristic in Heuristic::ALL {
                assert_eq!(sort(&pi, &problem, heuristic), SortReport {
                    inversions: vec![],
                    weight: Some(0),
                });
            }
        }
    }

    #[test]
    fn single_element() {
        let problem = Problem::swi_ls(1, true).unwrap();
        let pi = perm(&[-1], true);
        for heuristic in Heuristic::ALL {
            let report = sort(&pi, &problem, heuristic);
            assert_eq!(report.weight, Some(1), "{heuristic}");
            assert_eq!(report.inversions, [problem.inversion(1, 1)]);
        }
    }

    #[test]
    fn scan_prefers_first_maximum() {
        let problem = Problem::swi_ls(4, false).unwrap();
        let pi = perm(&[2, 1, 3, 4], false);
        let result = scan(&pi, &problem, |p| p.breakpoints() as f32);
        assert_eq!(result.inversion, Some(problem.inversion(1, 2)));
        assert_eq!(result.best, 1.0);
        assert!(result.zero_unitary.is_none());
    }
}
