use super::{scan, Heuristic};
use crate::{
    perm::{symmetric, Permutation},
    problem::{Inversion, Problem},
};

/// Chooses the inversion removing the most slice misplaced pairs per weight.
///
/// Without an improving inversion, an element outside of its final slice is moved to the other
/// side of the permutation by a symmetric inversion, even though this does not reduce the number
/// of slice misplaced pairs. When every element is already in its final slice, the slices are
/// adjusted instead, see [`adjust_slices`].
pub fn smp(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let result = scan(pi, problem, |sigma| sigma.slice_misplaced_pairs() as f32);

    if result.best > 0.0 {
        return result.inversion;
    }

    let n = pi.len();
    let mistake = (0..=n as i16)
        .map(|element| (pi.current_slice(element), pi.final_slice(element)))
        .find(|(current, target)| current != target);

    match mistake {
        None => adjust_slices(pi, problem),
        Some((current, target)) => {
            let i = current.max(target);
            let j = symmetric(i, n);
            Some(problem.inversion(i.min(j), i.max(j)))
        }
    }
}

/// Reverses the outermost slice whose element pair is not in place, or otherwise flips the sign
/// of the first negative element.
fn adjust_slices(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let n = pi.len();
    let (mut i, mut j) = (1, n);
    while i <= j {
        if pi.position(i as i16) != i {
            return Some(problem.inversion(i, j));
        }
        i += 1;
        j -= 1;
    }

    if pi.is_signed() {
        return (1..=n)
            .find(|&pos| pi.element_at(pos) < 0)
            .map(|pos| problem.inversion(pos, pos));
    }

    None
}

/// Chooses the inversion removing the most breakpoints per weight, using slice misplaced pairs to
/// break ties.
///
/// Signed permutations are first scored with signed breakpoints. When that finds no improvement,
/// and always for unsigned permutations, breakpoints are counted ignoring signs. When neither
/// improves, the cheapest strip inversion is used.
pub fn nb_smp(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let n_sq = (pi.len() * pi.len()) as f32;

    if pi.is_signed() {
        let result = scan(pi, problem, |sigma| {
            sigma.breakpoints() as f32 + sigma.slice_misplaced_pairs() as f32 / n_sq
        });
        if result.best > 0.0 {
            return result.inversion;
        }
    }

    let result = scan(pi, problem, |sigma| {
        sigma.breakpoints_unsigned() as f32 + sigma.slice_misplaced_pairs() as f32 / n_sq
    });
    if result.best > 0.0 {
        return result.inversion;
    }

    Heuristic::NbBestStrip.next_inversion(pi, problem)
}
