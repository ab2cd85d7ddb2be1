//! Aggregated comparison of heuristic results against exact distances.
use std::fmt;

use crate::{db::EvaluationRow, heuristics::Heuristic};

/// Identifier of the summary row combining all selected heuristics.
pub const COMBINED_ID: u16 = 1000;

#[derive(Clone, Copy, Default, Debug)]
struct Tally {
    ratio1: u64,
    best: u64,
    error: u64,
    exclusive: u64,
    sum_ratio: f64,
    max_ratio: f64,
}

impl Tally {
    fn add_ratio(&mut self, optimum: u32, result: u32) {
        if result == optimum {
            self.ratio1 += 1;
            self.sum_ratio += 1.0;
            if self.max_ratio == 0.0 {
                self.max_ratio = 1.0;
            }
        } else {
            let ratio = f64::from(result) / f64::from(optimum);
            if ratio > self.max_ratio {
                self.max_ratio = ratio;
            }
            self.sum_ratio += ratio;
        }
    }
}

/// Accumulates evaluation rows for a selection of heuristics.
#[derive(Clone, Debug)]
pub struct Statistics {
    n: usize,
    signed: bool,
    selection: Vec<Heuristic>,
    permutations: u64,
    exclusive_total: u64,
    tallies: [Tally; Heuristic::ALL.len()],
    combined: Tally,
}

impl Statistics {
    /// Creates empty statistics for permutations of size `n`.
    ///
    /// An empty selection selects all heuristics.
    pub fn new(n: usize, signed: bool, selection: &[Heuristic]) -> Self {
        let mut selection = if selection.is_empty() {
            Heuristic::ALL.to_vec()
        } else {
            selection.to_vec()
        };
        selection.sort_unstable();
        selection.dedup();

        Statistics {
            n,
            signed,
            selection,
            permutations: 0,
            exclusive_total: 0,
            tallies: Default::default(),
            combined: Tally::default(),
        }
    }

    /// Selected heuristics, ordered by identifier.
    pub fn selection(&self) -> &[Heuristic] {
        &self.selection
    }

    /// Number of rows added so far.
    pub fn permutations(&self) -> u64 {
        self.permutations
    }

    /// Accounts for a single evaluated permutation.
    pub fn add(&mut self, row: &EvaluationRow) {
        self.permutations += 1;
        let optimum = row.optimum;

        for &heuristic in &self.selection {
            let tally = &mut self.tallies[heuristic.index()];
            match row.result(heuristic) {
                Some(result) if result == optimum || optimum != 0 => {
                    tally.add_ratio(optimum, result)
                }
                _ => tally.error += 1,
            }
        }

        let minimum = self
            .selection
            .iter()
            .filter_map(|&heuristic| row.result(heuristic))
            .min();

        let Some(minimum) = minimum else {
            self.combined.error += 1;
            return;
        };

        for &heuristic in &self.selection {
            if row.result(heuristic) != Some(minimum) {
                continue;
            }
            self.tallies[heuristic.index()].best += 1;

            // Failed results of other heuristics rule out exclusivity.
            let exclusive = self
                .selection
                .iter()
                .filter(|&&other| other != heuristic)
                .all(|&other| row.result(other).is_some_and(|result| minimum < result));
            if exclusive {
                self.tallies[heuristic.index()].exclusive += 1;
                self.exclusive_total += 1;
            }
        }

        self.combined.add_ratio(optimum, minimum);
        self.combined.best += 1;
    }

    /// One row per selected heuristic followed by the combined row.
    ///
    /// Returns no rows when nothing was added.
    pub fn summary(&self) -> Vec<SummaryRow> {
        if self.permutations == 0 {
            return vec![];
        }

        let mut rows: Vec<SummaryRow> = self
            .selection
            .iter()
            .map(|&heuristic| self.row(heuristic.id(), &self.tallies[heuristic.index()], true))
            .collect();
        rows.push(self.row(COMBINED_ID, &self.combined, false));
        rows
    }

    fn row(&self, id: u16, tally: &Tally, with_exclusive: bool) -> SummaryRow {
        let all = self.permutations as f64;
        let valid = self.permutations - tally.error;
        let mut row = SummaryRow {
            n: self.n,
            signed: self.signed,
            id,
            error: tally.error as f64 * 100.0 / all,
            ..SummaryRow::default()
        };
        if valid == 0 {
            return row;
        }

        let valid = valid as f64;
        row.ratio1 = Some(tally.ratio1 as f64 * 100.0 / valid);
        row.avg_ratio = Some(tally.sum_ratio / valid);
        row.max_ratio = Some(tally.max_ratio);
        row.best = Some(tally.best as f64 * 100.0 / all);
        if with_exclusive && self.exclusive_total > 0 {
            row.exclusive = Some(tally.exclusive as f64 * 100.0 / self.exclusive_total as f64);
            row.exclusive_share = Some(self.exclusive_total as f64 * 100.0 / all);
        }
        row
    }
}

/// Summary of one heuristic, or of all selected heuristics combined.
///
/// Percentages range over `0.0..=100.0`. Fields are `None` where they are undefined, i.e. when no
/// valid result exists, or for the exclusivity of the combined row.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SummaryRow {
    /// Permutation size.
    pub n: usize,
    /// Whether the permutations are signed.
    pub signed: bool,
    /// Heuristic identifier or [`COMBINED_ID`].
    pub id: u16,
    /// Percentage of valid results matching the exact distance.
    pub ratio1: Option<f64>,
    /// Average approximation ratio over valid results.
    pub avg_ratio: Option<f64>,
    /// Largest approximation ratio.
    pub max_ratio: Option<f64>,
    /// Percentage of all permutations where the result was the best of the selection.
    pub best: Option<f64>,
    /// Percentage of all permutations without a valid result.
    pub error: f64,
    /// Share of the uniquely best results attributed to this heuristic.
    pub exclusive: Option<f64>,
    /// Percentage of all permutations with a uniquely best heuristic.
    pub exclusive_share: Option<f64>,
}

struct Field(Option<f64>);

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.3}"),
            None => f.write_str("NA"),
        }
    }
}

impl fmt::Display for SummaryRow {
    /// Formats the row as tab separated values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.n,
            u8::from(self.signed),
            self.id,
            Field(self.ratio1),
            Field(self.avg_ratio),
            Field(self.max_ratio),
            Field(self.best),
            Field(Some(self.error)),
            Field(self.exclusive),
            Field(self.exclusive_share),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(optimum: u32, results: [Option<u32>; 7]) -> EvaluationRow {
        EvaluationRow { optimum, results }
    }

    #[test]
    fn counts_matches_ratios_and_errors() {
        let mut stats = Statistics::new(4, false, &[Heuristic::Lr, Heuristic::Smp]);
        stats.add(&row(2, [Some(2), Some(4), None, None, None, None, None]));
        stats.add(&row(2, [None, Some(3), None, None, None, None, None]));
        stats.add(&row(0, [Some(0), Some(0), None, None, None, None, None]));

        let summary = stats.summary();
        assert_eq!(summary.len(), 3);
        let [lr, smp, combined] = summary.as_slice() else {
            unreachable!()
        };

        assert_eq!(lr.id, 1);
        assert_eq!(lr.ratio1, Some(100.0));
        assert_eq!(lr.avg_ratio, Some(1.0));
        assert!((lr.error - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(smp.id, 2);
        assert_eq!(smp.max_ratio, Some(2.0));
        assert!((smp.avg_ratio.unwrap() - 4.5 / 3.0).abs() < 1e-9);
        assert_eq!(smp.error, 0.0);

        // SMP is the only success in the second row, but the failed LR result still rules out
        // exclusivity.
        assert_eq!(lr.exclusive, Some(100.0));
        assert_eq!(smp.exclusive, Some(0.0));
        assert!((lr.exclusive_share.unwrap() - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(combined.id, COMBINED_ID);
        assert_eq!(combined.error, 0.0);
        assert_eq!(combined.best, Some(100.0));
        assert_eq!(combined.exclusive, None);
        assert_eq!(combined.max_ratio, Some(1.5));
    }

    #[test]
    fn formatting() {
        let mut stats = Statistics::new(3, true, &[Heuristic::NbSmp]);
        stats.add(&row(1, [None; 7]));
        let summary = stats.summary();
        assert_eq!(
            summary[0].to_string(),
            "3\t1\t7\tNA\tNA\tNA\tNA\t100.000\tNA\tNA"
        );
        assert_eq!(
            summary[1].to_string(),
            "3\t1\t1000\tNA\tNA\tNA\tNA\t100.000\tNA\tNA"
        );

        let mut stats = Statistics::new(3, false, &[]);
        assert_eq!(stats.selection().len(), 7);
        assert!(stats.summary().is_empty());
        stats.add(&row(2, [Some(3); 7]));
        assert_eq!(
            stats.summary()[0].to_string(),
            "3\t0\t1\t0.000\t1.500\t1.500\t100.000\t0.000\tNA\tNA"
        );
    }
}
