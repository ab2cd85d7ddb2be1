//! Fixed-width unsigned integers used to store encoded permutations and distances.
use std::{fmt, hash::Hash, io};

use num_traits::{PrimInt, Unsigned};

pub(crate) mod sealed {
    /// No other implementations than the ones in this file are allowed.
    pub trait Sealed {}
}

/// Unsigned primitive integer types used as record words in database files.
///
/// This trait is sealed and implemented for `u16`, `u32` and `u64` only.
pub trait Word:
    PrimInt + Unsigned + Hash + Default + fmt::Display + fmt::Debug + sealed::Sealed + 'static
{
    /// Width of the word in bits.
    const BITS: u32;

    /// Width of the word in bytes.
    const BYTES: usize;

    /// Returns the word as a `u64`.
    fn widen(self) -> u64;

    /// Returns the word with the given value or `None` if it does not fit.
    #[inline(always)]
    fn narrow(value: u64) -> Option<Self> {
        num_traits::cast(value)
    }

    /// Writes the word using the host's native byte order.
    fn write_ne(self, target: &mut impl io::Write) -> io::Result<()>;

    /// Reads a word stored using the host's native byte order.
    fn from_ne_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Word for $t {
                const BITS: u32 = <$t>::BITS;
                const BYTES: usize = std::mem::size_of::<$t>();

                #[inline(always)]
                fn widen(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn write_ne(self, target: &mut impl io::Write) -> io::Result<()> {
                    target.write_all(&self.to_ne_bytes())
                }

                #[inline]
                fn from_ne_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                    <$t>::from_ne_bytes(buf)
                }
            }
        )*
    };
}

impl_word!(u16, u32, u64);

/// Width of the integers used for one record field in a binary database.
///
/// Database files carry no header, so readers and writers derive the width from the permutation
/// size and sign mode, see [`Codec::width`][crate::perm::Codec::width].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum RecordWidth {
    /// 16-bit fields.
    U16,
    /// 32-bit fields.
    U32,
    /// 64-bit fields.
    U64,
}

impl RecordWidth {
    /// Returns the smallest width that can hold `bits` bits.
    pub fn for_bits(bits: u32) -> Self {
        if bits <= u16::BITS {
            RecordWidth::U16
        } else if bits <= u32::BITS {
            RecordWidth::U32
        } else {
            RecordWidth::U64
        }
    }

    /// Size of a single field in bytes.
    pub fn bytes(self) -> usize {
        match self {
            RecordWidth::U16 => u16::BYTES,
            RecordWidth::U32 => u32::BYTES,
            RecordWidth::U64 => u64::BYTES,
        }
    }

    /// Writes `value` truncated to this width.
    ///
    /// Returns an [`io::ErrorKind::InvalidInput`] error if `value` does not fit.
    pub fn write(self, target: &mut impl io::Write, value: u64) -> io::Result<()> {
        fn write_word<W: Word>(target: &mut impl io::Write, value: u64) -> io::Result<()> {
            W::narrow(value)
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!(
                            "value {value} does not fit into {} bits (maximum {})",
                            W::BITS,
                            W::max_value()
                        ),
                    )
                })?
                .write_ne(target)
        }

        match self {
            RecordWidth::U16 => write_word::<u16>(target, value),
            RecordWidth::U32 => write_word::<u32>(target, value),
            RecordWidth::U64 => write_word::<u64>(target, value),
        }
    }

    /// Reads a field of this width from the beginning of `bytes`.
    ///
    /// Panics if `bytes` is shorter than [`Self::bytes`].
    pub fn read(self, bytes: &[u8]) -> u64 {
        match self {
            RecordWidth::U16 => u16::from_ne_slice(bytes).widen(),
            RecordWidth::U32 => u32::from_ne_slice(bytes).widen(),
            RecordWidth::U64 => u64::from_ne_slice(bytes).widen(),
        }
    }
}
