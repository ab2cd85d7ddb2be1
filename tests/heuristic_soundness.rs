//! Properties every heuristic run has to satisfy.

use proptest::prelude::*;
use rand_core::SeedableRng;
use swils::{
    eval::evaluate_all,
    heuristics::{sort, sort_code, Heuristic, SortReport, LIMIT_MULTIPLIER},
    perm::Permutation,
    problem::Problem,
    rand::{Sample, TinyRng},
};

// ============================================================================
//  Strategies
// ============================================================================

/// Strategy for a permutation of size `1..=max`, with random signs when `signed`.
fn permutation(max: usize, signed: bool) -> impl Strategy<Value = Permutation> {
    (1..=max).prop_flat_map(move |n| {
        let magnitudes = Just((1..=n as i16).collect::<Vec<i16>>()).prop_shuffle();
        let signs = prop::collection::vec(any::<bool>(), n);
        (magnitudes, signs).prop_map(move |(magnitudes, signs)| {
            let entries: Vec<i16> = magnitudes
                .into_iter()
                .zip(signs)
                .map(|(e, negative)| if signed && negative { -e } else { e })
                .collect();
            Permutation::from_slice(&entries, signed).unwrap()
        })
    })
}

fn heuristic() -> impl Strategy<Value = Heuristic> {
    prop::sample::select(Heuristic::ALL.to_vec())
}

/// Checks that a report is consistent with the permutation it was computed for.
fn verify(pi: &Permutation, problem: &Problem, report: &SortReport) -> Result<(), TestCaseError> {
    let mut replay = pi.clone();
    let mut total = 0;
    for inversion in &report.inversions {
        prop_assert!(1 <= inversion.i && inversion.i <= inversion.j && inversion.j <= pi.len());
        prop_assert_eq!(inversion.w, problem.weight(inversion.i, inversion.j));
        replay.apply_inversion(inversion.i, inversion.j);
        total += inversion.w;
    }
    prop_assert!(report.inversions.len() <= pi.len() * LIMIT_MULTIPLIER + 1);

    match report.weight {
        Some(weight) => {
            prop_assert!(replay.is_identity());
            prop_assert_eq!(weight, total);
        }
        None => prop_assert!(!replay.is_identity()),
    }
    Ok(())
}

proptest! {
    #[test]
    fn unsigned_reports_are_consistent(pi in permutation(16, false), heuristic in heuristic()) {
        let problem = Problem::swi_ls(pi.len(), false).unwrap();
        let report = sort(&pi, &problem, heuristic);
        verify(&pi, &problem, &report)?;
        prop_assert_eq!(sort_code(pi.encode(), &problem, heuristic).unwrap(), report.weight);
    }

    #[test]
    fn signed_reports_are_consistent(pi in permutation(12, true), heuristic in heuristic()) {
        let problem = Problem::swi_ls(pi.len(), true).unwrap();
        let report = sort(&pi, &problem, heuristic);
        verify(&pi, &problem, &report)?;
        prop_assert_eq!(sort_code(pi.encode(), &problem, heuristic).unwrap(), report.weight);
    }

    #[test]
    fn codes_round_trip(pi in permutation(12, true)) {
        let code = pi.encode();
        prop_assert!(code < 1 << pi.codec().code_bits());
        let decoded = Permutation::from_code(code, pi.len(), true).unwrap();
        prop_assert_eq!(decoded, pi);
    }
}

#[test]
fn breakpoint_heuristics_sort_signed_reversal() {
    let problem = Problem::swi_ls(3, true).unwrap();
    let pi = Permutation::parse("-1,-2,-3", true).unwrap();
    for heuristic in Heuristic::ALL {
        let report = sort(&pi, &problem, heuristic);
        assert!(report.weight.is_some(), "{heuristic}");
        verify(&pi, &problem, &report).unwrap();
    }
}

#[test]
fn largest_sizes() {
    let mut rng = TinyRng::seed_from_u64(0x5eed);
    for (n, signed) in [(16, false), (12, true)] {
        let problem = Problem::swi_ls(n, signed).unwrap();
        for _ in 0..3 {
            let pi = rng.next_permutation(n, signed).unwrap();
            for heuristic in Heuristic::ALL {
                let report = sort(&pi, &problem, heuristic);
                verify(&pi, &problem, &report).unwrap();
            }
        }
    }
}

#[test]
fn never_below_the_optimum() {
    for (n, signed) in [(6, false), (4, true)] {
        let problem = Problem::swi_ls(n, signed).unwrap();
        for (record, row) in evaluate_all(&problem).unwrap() {
            for heuristic in Heuristic::ALL {
                if let Some(result) = row.result(heuristic) {
                    assert!(
                        result >= record.value,
                        "{heuristic} on {:#x}: {result} < {}",
                        record.code,
                        record.value
                    );
                }
            }
        }
    }
}
