//! Signed and unsigned permutations acted on by inversions.
//!
//! A [`Permutation`] stores its entries at the 1-based positions `1..=n` together with two
//! sentinel entries, `0` at position `0` and `n + 1` at position `n + 1`. Alongside the entries it
//! keeps the inverse mapping from an element's magnitude to its position. Both arrays are only
//! ever modified together by [`Permutation::apply_inversion`].

use smallvec::SmallVec;

use crate::error::{Error, Result};

mod codec;
mod fmt;
mod iter;
mod parse;

pub use codec::{Codec, Entries, SIGNED_MAX, UNSIGNED_MAX};
pub use iter::Permutations;
pub use parse::ParseError;

/// Storage for entries including the two sentinels.
type Slots = SmallVec<[i16; UNSIGNED_MAX + 2]>;

/// Returns the slice of position `pos` in a permutation of size `n`.
///
/// The slice is the distance of the position to the nearer end of the permutation, so positions
/// `1` and `n` are in slice 1, positions `2` and `n - 1` in slice 2 and so on.
#[inline(always)]
pub fn slice(pos: usize, n: usize) -> usize {
    pos.min(n + 1 - pos)
}

/// Returns the other position in the same slice as `pos`.
#[inline(always)]
pub fn symmetric(pos: usize, n: usize) -> usize {
    n + 1 - pos
}

/// A permutation together with its inverse.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    codec: Codec,
    // Invariant: `entries[1..=n]` hold each magnitude `1..=n` exactly once, `entries[0] == 0` and
    // `entries[n + 1] == n + 1`, and for every position `p`, `inverse[|entries[p]|] == p`.
    entries: Slots,
    inverse: SmallVec<[u8; UNSIGNED_MAX + 2]>,
}

impl Permutation {
    /// Returns the identity permutation of size `n`.
    ///
    /// Fails with [`Error::InvalidWidth`] for unsupported sizes.
    pub fn identity(n: usize, signed: bool) -> Result<Self> {
        let codec = Codec::new(n, signed)?;
        Ok(Self::from_entries_unchecked(
            &(1..=n as i16).collect::<Entries>(),
            codec,
        ))
    }

    /// Decodes a permutation from its packed integer code.
    ///
    /// Fails with [`Error::InvalidPermutation`] when the decoded entries do not contain every
    /// magnitude `1..=n` exactly once.
    pub fn from_code(code: u64, n: usize, signed: bool) -> Result<Self> {
        let codec = Codec::new(n, signed)?;
        Self::from_codec(code, codec)
    }

    /// Decodes a permutation using an existing codec.
    pub fn from_codec(code: u64, codec: Codec) -> Result<Self> {
        let entries = codec.decode(code);
        validate(&entries, codec.is_signed())?;
        Ok(Self::from_entries_unchecked(&entries, codec))
    }

    /// Decodes a code known to encode a valid permutation.
    pub(crate) fn from_codec_unchecked(code: u64, codec: Codec) -> Self {
        let entries = codec.decode(code);
        debug_assert!(validate(&entries, codec.is_signed()).is_ok());
        Self::from_entries_unchecked(&entries, codec)
    }

    /// Creates a permutation from its entries at the positions `1..=entries.len()`.
    ///
    /// Fails with [`Error::InvalidPermutation`] when an entry is zero, its magnitude exceeds the
    /// size, a magnitude repeats, or when an entry of an unsigned permutation is negative.
    pub fn from_slice(entries: &[i16], signed: bool) -> Result<Self> {
        let codec = Codec::new(entries.len(), signed)?;
        validate(entries, signed)?;
        Ok(Self::from_entries_unchecked(entries, codec))
    }

    /// Parses a comma separated list of entries, e.g. `"3,-1,2"`.
    pub fn parse(s: &str, signed: bool) -> Result<Self> {
        let entries = parse::parse_entries(s.as_bytes())?;
        Self::from_slice(&entries, signed)
    }

    fn from_entries_unchecked(entries: &[i16], codec: Codec) -> Self {
        let n = entries.len();
        let entries: Slots = std::iter::once(0)
            .chain(entries.iter().copied())
            .chain(std::iter::once(n as i16 + 1))
            .collect();
        let mut inverse = SmallVec::from_elem(0, n + 2);
        for (pos, &element) in entries.iter().enumerate() {
            inverse[element.unsigned_abs() as usize] = pos as u8;
        }
        Permutation {
            codec,
            entries,
            inverse,
        }
    }

    /// Size of the permutation.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codec.len()
    }

    /// Always `false`, empty permutations cannot be constructed.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this is a signed permutation.
    #[inline(always)]
    pub fn is_signed(&self) -> bool {
        self.codec.is_signed()
    }

    /// Returns the entries at the positions `1..=n`.
    #[inline(always)]
    pub fn as_slice(&self) -> &[i16] {
        &self.entries[1..self.entries.len() - 1]
    }

    /// Returns the codec matching this permutation's size and sign mode.
    #[inline(always)]
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Returns the packed integer code of this permutation.
    #[inline]
    pub fn encode(&self) -> u64 {
        self.codec.encode(self.as_slice())
    }

    /// Returns the position of the element with the magnitude of `element`.
    ///
    /// The sentinels `0` and `n + 1` are at the positions `0` and `n + 1`. Panics when the
    /// magnitude exceeds `n + 1`.
    #[inline(always)]
    pub fn position(&self, element: i16) -> usize {
        self.inverse[element.unsigned_abs() as usize] as usize
    }

    /// Returns the signed element at position `pos`.
    ///
    /// Positions `0` and `n + 1` hold the sentinels. Panics when `pos` exceeds `n + 1`.
    #[inline(always)]
    pub fn element_at(&self, pos: usize) -> i16 {
        self.entries[pos]
    }

    /// Returns `true` when every element is at its own position with a positive sign.
    pub fn is_identity(&self) -> bool {
        self.as_slice()
            .iter()
            .zip(1..)
            .all(|(&element, pos)| element == pos)
    }

    /// Reverses the entries at the positions `i..=j` in place.
    ///
    /// For signed permutations every reversed element also changes its sign, so `i == j` only
    /// flips the sign of a single element. Applying the same inversion twice restores the
    /// permutation.
    ///
    /// Callers must ensure `1 <= i <= j <= n`. This is not validated, out of range positions
    /// panic or corrupt the sentinels.
    #[inline]
    pub fn apply_inversion(&mut self, i: usize, j: usize) {
        debug_assert!(1 <= i && i <= j && j <= self.len());
        let (mut b, mut e) = (i, j);
        while b <= e {
            let (front, back) = (self.entries[b], self.entries[e]);
            if self.is_signed() {
                self.entries[b] = -back;
                self.entries[e] = -front;
            } else {
                self.entries[b] = back;
                self.entries[e] = front;
            }
            self.inverse[back.unsigned_abs() as usize] = b as u8;
            self.inverse[front.unsigned_abs() as usize] = e as u8;
            b += 1;
            e -= 1;
        }
    }

    /// Number of breakpoints, i.e. adjacent positions (including both sentinels) whose elements
    /// are not consecutive.
    ///
    /// For signed permutations an adjacency `a, b` is only fine when `b == a + 1`. For unsigned
    /// permutations a descending adjacency `b == a - 1` is fine as well.
    pub fn breakpoints(&self) -> usize {
        if self.is_signed() {
            self.entries
                .windows(2)
                .filter(|pair| pair[1] - pair[0] != 1)
                .count()
        } else {
            self.breakpoints_unsigned()
        }
    }

    /// Number of breakpoints when ignoring the signs of all elements.
    pub fn breakpoints_unsigned(&self) -> usize {
        self.entries
            .windows(2)
            .filter(|pair| (pair[1].abs() - pair[0].abs()).abs() != 1)
            .count()
    }

    /// Slice a given element occupies in the identity permutation.
    #[inline(always)]
    pub fn final_slice(&self, element: i16) -> usize {
        slice(element.unsigned_abs() as usize, self.len())
    }

    /// Slice a given element currently occupies.
    #[inline(always)]
    pub fn current_slice(&self, element: i16) -> usize {
        slice(self.position(element), self.len())
    }

    /// Number of slice misplaced pairs.
    ///
    /// For each element currently in slice `s`, this counts the elements in the slices
    /// `1..s` (on both sides) which belong to a larger slice than the element itself does. The
    /// identity has no slice misplaced pairs.
    pub fn slice_misplaced_pairs(&self) -> usize {
        let n = self.len();
        let mut pairs = 0;
        for pos in 1..=n {
            let final_slice = self.final_slice(self.entries[pos]);
            let (mut left, mut right) = (1, n);
            while left < slice(pos, n) {
                if self.final_slice(self.entries[left]) > final_slice {
                    pairs += 1;
                }
                if self.final_slice(self.entries[right]) > final_slice {
                    pairs += 1;
                }
                left += 1;
                right -= 1;
            }
        }
        pairs
    }
}

/// Checks that `entries` contain every magnitude `1..=entries.len()` exactly once.
fn validate(entries: &[i16], signed: bool) -> Result<()> {
    let n = entries.len();
    let mut seen: SmallVec<[bool; UNSIGNED_MAX + 1]> = SmallVec::from_elem(false, n + 1);
    for (index, &element) in entries.iter().enumerate() {
        let magnitude = element.unsigned_abs() as usize;
        if element == 0 || magnitude > n {
            return Err(Error::InvalidPermutation(format!(
                "entry {element} at position {} is out of range 1..={n}",
                index + 1
            )));
        }
        if !signed && element < 0 {
            return Err(Error::InvalidPermutation(format!(
                "negative entry {element} at position {} in an unsigned permutation",
                index + 1
            )));
        }
        if std::mem::replace(&mut seen[magnitude], true) {
            return Err(Error::InvalidPermutation(format!(
                "element {magnitude} occurs more than once"
            )));
        }
    }
    Ok(())
}
