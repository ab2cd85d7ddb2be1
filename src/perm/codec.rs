//! Bit-packed integer encoding of permutations.
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    word::RecordWidth,
};

/// Largest supported size of an unsigned permutation.
pub const UNSIGNED_MAX: usize = 16;

/// Largest supported size of a signed permutation.
pub const SIGNED_MAX: usize = 12;

const UNSIGNED_BITS: u32 = 4;
const SIGNED_BITS: u32 = 5;

const VALUE_MASK: u64 = 0b01111;
const SIGN_MASK: u64 = 0b10000;

/// Decoded entries of a permutation, in position order.
pub type Entries = SmallVec<[i16; UNSIGNED_MAX]>;

/// Converts between permutations of a fixed size and sign mode and their packed integer codes.
///
/// Each element occupies one group of bits, the element at position 1 being stored in the most
/// significant group. Unsigned permutations use 4 bits per element holding `element - 1`. Signed
/// permutations use 5 bits per element, the low 4 bits holding `|element| - 1` and the high bit
/// being set for negative elements.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Codec {
    n: usize,
    signed: bool,
}

impl Codec {
    /// Returns the codec for permutations of size `n`.
    ///
    /// Fails with [`Error::InvalidWidth`] when `n` is zero or exceeds [`UNSIGNED_MAX`]
    /// respectively [`SIGNED_MAX`].
    pub fn new(n: usize, signed: bool) -> Result<Self> {
        let max = if signed { SIGNED_MAX } else { UNSIGNED_MAX };
        if n == 0 || n > max {
            return Err(Error::InvalidWidth { n, signed, max });
        }
        Ok(Codec { n, signed })
    }

    /// Size of the encoded permutations.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`, codecs for empty permutations cannot be constructed.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether this codec encodes signed permutations.
    #[inline(always)]
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Number of bits used per element.
    #[inline(always)]
    pub fn bits(&self) -> u32 {
        if self.signed {
            SIGNED_BITS
        } else {
            UNSIGNED_BITS
        }
    }

    /// Number of low-order bits occupied by a code.
    #[inline(always)]
    pub fn code_bits(&self) -> u32 {
        self.bits() * self.n as u32
    }

    /// Smallest record width that holds every code of this codec.
    pub fn width(&self) -> RecordWidth {
        RecordWidth::for_bits(self.code_bits())
    }

    /// Returns the code of the identity permutation.
    pub fn identity(&self) -> u64 {
        (0..self.n).fold(0, |code, index| (code << self.bits()) | index as u64)
    }

    /// Packs the entries of a permutation into its code.
    ///
    /// The entries must form a permutation of size `self.len()`, this is not checked. Passing
    /// anything else produces an unspecified code.
    #[inline]
    pub fn encode(&self, entries: &[i16]) -> u64 {
        debug_assert_eq!(entries.len(), self.n);
        let bits = self.bits();
        let mut code = 0;
        for &element in entries {
            let mut group = u64::from(element.unsigned_abs() - 1) & VALUE_MASK;
            if element < 0 {
                group |= SIGN_MASK;
            }
            code = (code << bits) | group;
        }
        code
    }

    /// Unpacks a code into the entries of a permutation.
    ///
    /// This does not check whether the result is a permutation, see
    /// [`Permutation::from_code`][super::Permutation::from_code] for a validating constructor.
    #[inline]
    pub fn decode(&self, code: u64) -> Entries {
        let bits = self.bits();
        let mut entries: Entries = SmallVec::from_elem(0, self.n);
        let mut pending = code;
        for entry in entries.iter_mut().rev() {
            let value = ((pending & VALUE_MASK) + 1) as i16;
            *entry = if self.signed && pending & SIGN_MASK != 0 {
                -value
            } else {
                value
            };
            pending >>= bits;
        }
        entries
    }
}
