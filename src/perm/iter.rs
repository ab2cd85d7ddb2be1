//! Enumeration of all permutations of a fixed size.

use super::{Codec, Entries};

/// Iterator over the codes of all permutations of a codec's size and sign mode.
///
/// Arrangements of the magnitudes are visited in lexicographical order. For signed permutations
/// each arrangement is yielded once for every assignment of signs, the sign of position `k`
/// following bit `n - k` of a counter.
pub struct Permutations {
    codec: Codec,
    magnitudes: Entries,
    signs: u32,
    done: bool,
}

impl Permutations {
    /// Starts the enumeration at the identity.
    pub fn new(codec: Codec) -> Self {
        Permutations {
            codec,
            magnitudes: (1..=codec.len() as i16).collect(),
            signs: 0,
            done: false,
        }
    }

    /// Total number of permutations, `n!` respectively `n! * 2^n` for signed permutations.
    pub fn total(codec: Codec) -> u64 {
        let arrangements: u64 = (1..=codec.len() as u64).product();
        if codec.is_signed() {
            arrangements << codec.len()
        } else {
            arrangements
        }
    }

    fn sign_masks(&self) -> u32 {
        if self.codec.is_signed() {
            1 << self.codec.len()
        } else {
            1
        }
    }

    fn current(&self) -> u64 {
        let n = self.codec.len();
        let signed: Entries = self
            .magnitudes
            .iter()
            .enumerate()
            .map(|(index, &magnitude)| {
                if self.signs & (1 << (n - 1 - index)) != 0 {
                    -magnitude
                } else {
                    magnitude
                }
            })
            .collect();
        self.codec.encode(&signed)
    }

    /// Advances the magnitudes to the next arrangement, returns `false` after the last one.
    fn lexicographical_next(&mut self) -> bool {
        let target = &mut self.magnitudes;
        let len = target.len();

        let Some(a) = (0..len.saturating_sub(1))
            .rev()
            .find(|&index| target[index] < target[index + 1])
        else {
            return false;
        };

        let a_image = target[a];
        let b = a + 1 + target[a + 2..].partition_point(|&b_image| b_image > a_image);

        target.swap(a, b);
        target[a + 1..].reverse();

        true
    }
}

impl Iterator for Permutations {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        let code = self.current();

        self.signs += 1;
        if self.signs == self.sign_masks() {
            self.signs = 0;
            self.done = !self.lexicographical_next();
        }

        Some(code)
    }
}
