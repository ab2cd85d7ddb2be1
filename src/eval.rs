//! Running every heuristic on a set of permutations.
use rayon::prelude::*;
use tracing::info;

use crate::{
    db::{EvaluationRow, Record, HEURISTICS},
    error::Result,
    exact::ExactSolver,
    heuristics::{sort_code, Heuristic},
    problem::Problem,
};

/// Evaluates one record, its value being the exact distance.
pub fn evaluate_record(record: &Record, problem: &Problem) -> Result<EvaluationRow> {
    let mut results = [None; HEURISTICS];
    for (result, heuristic) in results.iter_mut().zip(Heuristic::ALL) {
        *result = sort_code(record.code, problem, heuristic)?;
    }
    Ok(EvaluationRow {
        optimum: record.value,
        results,
    })
}

/// Evaluates all records in parallel on the current rayon thread pool.
///
/// The returned rows are in the order of `records`. Fails if a record does not encode a
/// permutation of the problem's size and sign mode.
pub fn evaluate(records: &[Record], problem: &Problem) -> Result<Vec<EvaluationRow>> {
    info!(event = "evaluate_start", records = records.len());
    let rows: Vec<EvaluationRow> = records
        .par_iter()
        .map(|record| evaluate_record(record, problem))
        .collect::<Result<_>>()?;
    info!(event = "evaluate_end", rows = rows.len());
    Ok(rows)
}

/// Computes the exact distances of all permutations and evaluates every heuristic on them.
///
/// Rows are returned in the order the exact search finalized the permutations.
pub fn evaluate_all(problem: &Problem) -> Result<Vec<(Record, EvaluationRow)>> {
    let mut records = vec![];
    ExactSolver::new(problem).solve(|code, value| records.push(Record { code, value }));
    let rows = evaluate(&records, problem)?;
    Ok(records.into_iter().zip(rows).collect())
}
