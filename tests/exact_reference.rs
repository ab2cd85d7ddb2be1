//! Compares the layered exact search with a textbook Dijkstra search.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use swils::{
    exact::ExactSolver,
    perm::{Permutation, Permutations},
    problem::Problem,
};

/// Distances from the identity using a binary heap with lazy deletion.
fn reference_distances(problem: &Problem) -> HashMap<u64, u32> {
    let codec = problem.codec();
    let mut distances: HashMap<u64, u32> = HashMap::new();
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0, codec.identity())));

    while let Some(Reverse((distance, code))) = heap.pop() {
        if distances.contains_key(&code) {
            continue;
        }
        distances.insert(code, distance);

        let pi = Permutation::from_codec(code, codec).unwrap();
        for inversion in problem.inversions() {
            let mut sigma = pi.clone();
            sigma.apply_inversion(inversion.i, inversion.j);
            let next = sigma.encode();
            if !distances.contains_key(&next) {
                heap.push(Reverse((distance + inversion.w, next)));
            }
        }
    }

    distances
}

fn check(n: usize, signed: bool) {
    let problem = Problem::swi_ls(n, signed).unwrap();

    let mut emitted = vec![];
    let summary = ExactSolver::new(&problem).solve(|code, distance| emitted.push((code, distance)));

    let total = Permutations::total(problem.codec());
    assert_eq!(summary.permutations, total);
    assert_eq!(emitted.len() as u64, total);
    assert_eq!(emitted[0], (problem.codec().identity(), 0));
    assert!(emitted.windows(2).all(|pair| pair[0].1 <= pair[1].1));
    assert_eq!(summary.max_distance, emitted.last().unwrap().1);

    let reference = reference_distances(&problem);
    let mut seen = HashMap::new();
    for &(code, distance) in &emitted {
        assert!(seen.insert(code, distance).is_none(), "{code:#x} emitted twice");
        assert_eq!(reference[&code], distance, "n={n} signed={signed} code={code:#x}");
    }
    assert_eq!(seen.len(), reference.len());
}

#[test]
fn unsigned_up_to_six() {
    for n in 1..=6 {
        check(n, false);
    }
}

#[test]
fn signed_up_to_four() {
    for n in 1..=4 {
        check(n, true);
    }
}

#[test]
fn reversal_costs_one() {
    // Reversing the whole permutation connects the two positions of slice 1.
    for (n, signed) in [(5, false), (4, true)] {
        let problem = Problem::swi_ls(n, signed).unwrap();
        let distances = ExactSolver::new(&problem).distances();

        let mut pi = Permutation::identity(n, signed).unwrap();
        pi.apply_inversion(1, n);
        assert_eq!(distances[&pi.encode()], 1);
    }
}
