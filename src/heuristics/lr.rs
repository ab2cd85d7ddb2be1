use crate::{
    perm::Permutation,
    problem::{Inversion, Problem},
};

/// Corrects the outermost misplaced position from whichever side is cheaper.
///
/// Ties in cost go to the correction using fewer inversions, then to the right side, i.e. the one
/// starting at position 1.
pub fn lr(pi: &Permutation, problem: &Problem) -> Option<Inversion> {
    let (mut right, mut left) = (1, pi.len());
    while right < left {
        if pi.element_at(right) != right as i16 || pi.element_at(left) != left as i16 {
            break;
        }
        right += 1;
        left -= 1;
    }

    let from_right = problem.inversions_to_correct_position(right, pi);
    let from_left = problem.inversions_to_correct_position(left, pi);

    let chosen = match (from_right.cost, from_left.cost) {
        (r, 0) if r != 0 => &from_right,
        (0, l) if l != 0 => &from_left,
        (r, l) if r != l => {
            if r < l {
                &from_right
            } else {
                &from_left
            }
        }
        _ => {
            if from_right.inversions.len() <= from_left.inversions.len() {
                &from_right
            } else {
                &from_left
            }
        }
    };

    chosen.inversions.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_cheaper_side() {
        let problem = Problem::swi_ls(5, false).unwrap();

        // Position 1 is fine, position 5 needs the element 5 from position 2.
        let pi = Permutation::from_slice(&[1, 5, 3, 4, 2], false).unwrap();
        assert_eq!(lr(&pi, &problem), Some(problem.inversion(2, 5)));

        let pi = Permutation::from_slice(&[3, 2, 1, 4, 5], false).unwrap();
        assert_eq!(lr(&pi, &problem), Some(problem.inversion(1, 3)));

        // Both sides cost 2, so the right side wins.
        let pi = Permutation::from_slice(&[2, 1, 3, 5, 4], false).unwrap();
        assert_eq!(lr(&pi, &problem), Some(problem.inversion(1, 2)));
    }

    #[test]
    fn fixes_signs() {
        let problem = Problem::swi_ls(3, true).unwrap();
        let pi = Permutation::from_slice(&[1, -2, 3], true).unwrap();
        assert_eq!(lr(&pi, &problem), Some(problem.inversion(2, 2)));

        // Moving the positive 1 to the front needs a second unitary inversion, fixing the sign of
        // the 3 is cheaper.
        let pi = Permutation::from_slice(&[2, 1, -3], true).unwrap();
        assert_eq!(lr(&pi, &problem), Some(problem.inversion(3, 3)));
    }
}
