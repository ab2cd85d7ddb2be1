use std::fmt;

use super::Permutation;

/// Writes the entries separated by `sep`, signed entries as signed decimals.
pub fn display_entries(entries: &[i16], f: &mut impl fmt::Write, sep: char) -> fmt::Result {
    let mut pending = entries.iter();

    if let Some(first) = pending.next() {
        write!(f, "{first}")?;
    }
    for element in pending {
        write!(f, "{sep}{element}")?;
    }

    Ok(())
}

impl fmt::Display for Permutation {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_entries(self.as_slice(), f, ',')
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        display_entries(self.as_slice(), f, ' ')?;
        if self.is_signed() {
            write!(f, "]±")
        } else {
            write!(f, "]")
        }
    }
}
