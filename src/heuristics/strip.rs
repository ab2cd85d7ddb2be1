//! Fallbacks built on strips, maximal runs of positions holding consecutive ascending elements.
use smallvec::SmallVec;

use crate::{
    perm::{Permutation, UNSIGNED_MAX},
    problem::{Inversion, Problem},
};

/// Start positions of the strips between `right` and `left`, followed by `left + 1`.
type Strips = SmallVec<[usize; UNSIGNED_MAX + 2]>;

/// Returns the first and the last position not holding its own element.
///
/// Only meaningful for permutations that are not the identity.
fn right_and_left(pi: &Permutation) -> (usize, usize) {
    let n = pi.len();
    let right = (1..=n)
        .find(|&pos| pi.element_at(pos) != pos as i16)
        .unwrap_or(n + 1);
    let left = (2..=n)
        .rev()
        .find(|&pos| pi.element_at(pos) != pos as i16)
        .unwrap_or(1);
    (right, left)
}

fn strips(pi: &Permutation) -> (usize, usize, Strips) {
    let (right, left) = right_and_left(pi);
    let mut strips = Strips::new();
    strips.push(right);
    for index in right..left {
        if pi.element_at(index + 1) - pi.element_at(index) != 1 {
            strips.push(index + 1);
        }
    }
    strips.push(left + 1);
    (right, left, strips)
}

/// Reverses everything between the outermost misplaced positions.
pub fn middle(pi: &Permutation, problem: &Problem) -> Inversion {
    let (right, left) = right_and_left(pi);
    problem.inversion(right, left)
}

/// Cheapest inversion starting at a strip and ending right before a later strip.
pub fn best(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let (_, _, strips) = strips(pi);
    strips
        .iter()
        .enumerate()
        .flat_map(|(index, &start)| {
            strips[index + 1..]
                .iter()
                .map(move |&end| problem.inversion(start, end - 1))
        })
        .min_by_key(|inversion| inversion.w)
}

/// Moves the element belonging to the first or to the last misplaced position, together with the
/// strips up to it, whichever is cheaper.
pub fn outermost(pi: &Permutation, problem: &Problem) -> Inversion {
    let (right, left, strips) = strips(pi);
    let pos_right = pi.position(right as i16);
    let pos_left = pi.position(left as i16);

    let j_right = strips[1..]
        .iter()
        .find(|&&start| start > pos_right)
        .map_or(right, |&start| start - 1);
    let towards_right = problem.inversion(right, j_right);

    // The final entry `left + 1` is not a strip of its own and never ends this search.
    let i_left = (1..strips.len() - 1)
        .find(|&index| strips[index] > pos_left)
        .map_or(left, |index| strips[index - 1]);
    let towards_left = problem.inversion(i_left, left);

    if towards_right.w <= towards_left.w {
        towards_right
    } else {
        towards_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(entries: &[i16], signed: bool) -> Permutation {
        Permutation::from_slice(entries, signed).unwrap()
    }

    #[test]
    fn strip_boundaries() {
        let (right, left, found) = strips(&perm(&[2, 3, 1, 6, 4, 5], false));
        assert_eq!((right, left), (1, 6));
        assert_eq!(found.as_slice(), &[1, 3, 4, 5, 7]);

        let (right, left, found) = strips(&perm(&[1, -3, -2, 4, 5], true));
        assert_eq!((right, left), (2, 3));
        assert_eq!(found.as_slice(), &[2, 4]);
    }

    #[test]
    fn fallbacks() {
        let problem = Problem::swi_ls(6, false).unwrap();
        let pi = perm(&[2, 3, 1, 6, 4, 5], false);
        assert_eq!(middle(&pi, &problem), problem.inversion(1, 6));
        assert_eq!(best(&pi, &problem), Some(problem.inversion(1, 6)));
        assert_eq!(outermost(&pi, &problem), problem.inversion(1, 3));

        let problem = Problem::swi_ls(5, false).unwrap();
        let pi = perm(&[3, 1, 2, 5, 4], false);
        assert_eq!(middle(&pi, &problem), problem.inversion(1, 5));
        assert_eq!(best(&pi, &problem), Some(problem.inversion(1, 1)));
        assert_eq!(outermost(&pi, &problem), problem.inversion(4, 5));

        let problem = Problem::swi_ls(5, true).unwrap();
        let pi = perm(&[1, -3, -2, 4, 5], true);
        assert_eq!(middle(&pi, &problem), problem.inversion(2, 3));
        assert_eq!(best(&pi, &problem), Some(problem.inversion(2, 3)));
        assert_eq!(outermost(&pi, &problem), problem.inversion(3, 3));
    }
}
