//! The weighted inversion model.
//!
//! A [`Problem`] fixes the permutation size, the sign mode and the rule assigning weights to
//! inversions. It also enumerates the universe of inversions in the order used by the exact solver
//! and by every heuristic.
use std::fmt;

use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    perm::{slice, Codec, Permutation},
};

/// Identifies a sorting problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ProblemKind {
    /// Sorting by weighted inversions where the weight of an inversion is one more than the
    /// difference of the slices of its two endpoints.
    SwiLs,
}

impl ProblemKind {
    /// Returns the problem with the given numeric identifier.
    pub fn from_id(id: u16) -> Result<Self> {
        match id {
            1 => Ok(ProblemKind::SwiLs),
            _ => Err(Error::UnknownProblem(id)),
        }
    }

    /// Numeric identifier of the problem.
    pub fn id(self) -> u16 {
        match self {
            ProblemKind::SwiLs => 1,
        }
    }
}

/// Reversal of the positions `i..=j`, negating the moved elements of signed permutations.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Inversion {
    /// First position, `1 <= i <= j`.
    pub i: usize,
    /// Last position, `j <= n`.
    pub j: usize,
    /// Weight of applying the inversion.
    pub w: u32,
}

impl Inversion {
    /// Whether the inversion covers a single position, i.e. only flips a sign.
    #[inline(always)]
    pub fn is_unitary(&self) -> bool {
        self.i == self.j
    }
}

impl fmt::Display for Inversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}] weight={}", self.i, self.j, self.w)
    }
}

/// Inversions moving a single element to its final position, together with their total weight.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Correction {
    /// Inversions in application order.
    pub inversions: SmallVec<[Inversion; 2]>,
    /// Sum of the inversion weights.
    pub cost: u32,
}

impl Correction {
    fn push(&mut self, inversion: Inversion) {
        self.cost += inversion.w;
        self.inversions.push(inversion);
    }
}

/// Sorting problem for permutations of a fixed size and sign mode.
#[derive(Clone, Debug)]
pub struct Problem {
    kind: ProblemKind,
    codec: Codec,
    inversions: Vec<Inversion>,
}

impl Problem {
    /// Creates the problem with identifier `id`.
    ///
    /// Fails with [`Error::UnknownProblem`] for identifiers other than `1` and with
    /// [`Error::InvalidWidth`] for unsupported sizes.
    pub fn new(id: u16, n: usize, signed: bool) -> Result<Self> {
        let kind = ProblemKind::from_id(id)?;
        let codec = Codec::new(n, signed)?;
        let mut problem = Problem {
            kind,
            codec,
            inversions: vec![],
        };
        problem.inversions = problem.enumerate_inversions();
        Ok(problem)
    }

    /// Shorthand for the SWI-LS problem.
    pub fn swi_ls(n: usize, signed: bool) -> Result<Self> {
        Self::new(ProblemKind::SwiLs.id(), n, signed)
    }

    fn enumerate_inversions(&self) -> Vec<Inversion> {
        let n = self.n();
        // Unitary inversions are no-ops on unsigned permutations.
        let delta = usize::from(!self.is_signed());
        let mut inversions = vec![];
        for i in 1..=n {
            for j in i + delta..=n {
                inversions.push(Inversion {
                    i,
                    j,
                    w: self.weight(i, j),
                });
            }
        }
        inversions
    }

    /// Numeric identifier of the problem.
    pub fn id(&self) -> u16 {
        self.kind.id()
    }

    /// Kind of the problem.
    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    /// Size of the permutations.
    pub fn n(&self) -> usize {
        self.codec.len()
    }

    /// Whether the permutations are signed.
    pub fn is_signed(&self) -> bool {
        self.codec.is_signed()
    }

    /// Codec for the permutations of this problem.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// All allowed inversions, ordered by `i` and then by `j`.
    ///
    /// Heuristics break ties in favor of the inversion appearing first in this order.
    pub fn inversions(&self) -> &[Inversion] {
        &self.inversions
    }

    /// Weight of the inversion `i..=j`, symmetric in `i` and `j` and at least 1.
    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> u32 {
        let n = self.n();
        match self.kind {
            ProblemKind::SwiLs => slice(i, n).abs_diff(slice(j, n)) as u32 + 1,
        }
    }

    /// Returns an inversion of `i..=j` with its weight.
    #[inline]
    pub fn inversion(&self, i: usize, j: usize) -> Inversion {
        Inversion {
            i,
            j,
            w: self.weight(i, j),
        }
    }

    /// Inversions that bring the element `pos` to position `pos`.
    ///
    /// When the element already is at `pos` this is empty, unless the permutation is signed and
    /// the element negative, in which case a single unitary inversion fixes the sign. Otherwise
    /// the element is moved with one inversion between its position and `pos`. Signed elements
    /// that are positive before this move become negative, so a unitary inversion follows.
    pub fn inversions_to_correct_position(&self, pos: usize, pi: &Permutation) -> Correction {
        let mut correction = Correction::default();
        let current = pi.position(pos as i16);
        let element = pi.element_at(current);

        if current == pos {
            if pi.is_signed() && element < 0 {
                correction.push(self.inversion(pos, pos));
            }
        } else {
            match self.kind {
                ProblemKind::SwiLs => {
                    correction.push(self.inversion(current.min(pos), current.max(pos)));
                    if pi.is_signed() && element > 0 {
                        correction.push(self.inversion(pos, pos));
                    }
                }
            }
        }

        correction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_problems() {
        assert!(matches!(
            Problem::new(2, 4, false),
            Err(Error::UnknownProblem(2))
        ));
        assert!(matches!(
            Problem::new(1, 13, true),
            Err(Error::InvalidWidth { .. })
        ));
        assert_eq!(Problem::swi_ls(4, false).unwrap().id(), 1);
    }

    #[test]
    fn inversion_universe() {
        let unsigned = Problem::swi_ls(4, false).unwrap();
        let pairs: Vec<_> = unsigned.inversions().iter().map(|x| (x.i, x.j)).collect();
        assert_eq!(pairs, [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);

        let signed = Problem::swi_ls(3, true).unwrap();
        let pairs: Vec<_> = signed.inversions().iter().map(|x| (x.i, x.j)).collect();
        assert_eq!(pairs, [(1, 1), (1, 2), (1, 3), (2, 2), (2, 3), (3, 3)]);
    }

    #[test]
    fn weights() {
        let problem = Problem::swi_ls(6, false).unwrap();
        assert_eq!(problem.weight(1, 6), 1);
        assert_eq!(problem.weight(1, 3), 3);
        assert_eq!(problem.weight(3, 4), 1);
        assert_eq!(problem.weight(2, 4), 2);
        for i in 1..=6 {
            for j in 1..=6 {
                assert_eq!(problem.weight(i, j), problem.weight(j, i));
                assert!(problem.weight(i, j) >= 1);
            }
        }
        assert_eq!(problem.inversion(1, 3).to_string(), "[1,3] weight=3");
    }

    #[test]
    fn corrections() {
        let unsigned = Problem::swi_ls(4, false).unwrap();
        let pi = Permutation::from_slice(&[2, 1, 4, 3], false).unwrap();
        let correction = unsigned.inversions_to_correct_position(1, &pi);
        assert_eq!(correction.inversions.as_slice(), &[unsigned.inversion(1, 2)]);
        assert_eq!(correction.cost, 2);

        let pi = Permutation::from_slice(&[1, 2, 3, 4], false).unwrap();
        assert_eq!(
            unsigned.inversions_to_correct_position(3, &pi),
            Correction::default()
        );

        let signed = Problem::swi_ls(3, true).unwrap();
        let pi = Permutation::from_slice(&[-1, 3, 2], true).unwrap();
        let correction = signed.inversions_to_correct_position(1, &pi);
        assert_eq!(correction.inversions.as_slice(), &[signed.inversion(1, 1)]);
        assert_eq!(correction.cost, 1);

        let correction = signed.inversions_to_correct_position(2, &pi);
        assert_eq!(
            correction.inversions.as_slice(),
            &[signed.inversion(2, 3), signed.inversion(2, 2)]
        );
        assert_eq!(correction.cost, 3);

        let pi = Permutation::from_slice(&[1, -3, 2], true).unwrap();
        let correction = signed.inversions_to_correct_position(3, &pi);
        assert_eq!(correction.inversions.as_slice(), &[signed.inversion(2, 3)]);
    }
}
