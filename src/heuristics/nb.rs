use super::scan;
use crate::{
    perm::Permutation,
    problem::{Inversion, Problem},
};

/// Chooses the inversion removing the most breakpoints per weight.
///
/// Signed permutations without any improving inversion get the first unitary inversion that does
/// not add breakpoints. Returns `None` when neither exists.
pub fn nb(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let result = scan(pi, problem, |sigma| sigma.breakpoints() as f32);

    if result.best > 0.0 {
        return result.inversion;
    }
    if pi.is_signed() {
        return result.zero_unitary;
    }
    None
}
