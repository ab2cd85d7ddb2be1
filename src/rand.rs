//! Sampling random permutations.
use rand_core::{RngCore, SeedableRng};

use crate::perm::Permutation;

/// A non-cryptographic pesudo-random number generator with a tiny state.
///
/// Currently implements the wyrand algorithm, but this may change in the future.
#[derive(Default)]
pub struct TinyRng {
    state: u64,
}

impl SeedableRng for TinyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut new = Self {
            state: u64::from_le_bytes(seed),
        };
        new.next_u64();
        new
    }
}

impl RngCore for TinyRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // Based on https://github.com/lemire/testingRNG/blob/master/source/wyrand.h
        let state = self.state;
        self.state = self.state.wrapping_add(0xa0761d6478bd642f);
        let xored = state ^ 0xe7037ed1a0b428db;
        let wide_prod = (state as u128) * (xored as u128);
        (wide_prod as u64) ^ ((wide_prod >> 64) as u64)
    }

    #[inline(always)]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }

    #[inline(always)]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// `RngCore` extension trait to sample indices and permutations.
pub trait Sample: RngCore {
    /// Returns a random index sampled uniformly from `0..degree`.
    ///
    /// Returns `0` when the range is empty.
    #[inline]
    fn next_index(&mut self, degree: usize) -> usize {
        // Based on
        // https://lemire.me/blog/2019/06/06/nearly-divisionless-random-integer-generation-on-various-systems/
        let s: u64 = degree as u64;
        let mut x = self.next_u64();
        let mut m = (x as u128) * (s as u128);
        let mut l = m as u64;
        if l < s {
            let t = s.wrapping_neg() % s;
            while l < t {
                x = self.next_u64();
                m = (x as u128) * (s as u128);
                l = m as u64;
            }
        }

        (m >> 64) as usize
    }

    /// Uniformly samples a random permutation of size `n`.
    ///
    /// For signed permutations every element is negated with probability one half.
    fn next_permutation(&mut self, n: usize, signed: bool) -> crate::error::Result<Permutation> {
        let mut entries: Vec<i16> = (1..=n as i16).collect();

        // Fisher-Yates shuffle
        for i in 0..n {
            let j = self.next_index(n - i);
            entries.swap(n - i - 1, j);
        }
        if signed {
            for entry in entries.iter_mut() {
                if self.next_u32() & 1 != 0 {
                    *entry = -*entry;
                }
            }
        }

        Permutation::from_slice(&entries, signed)
    }
}

impl<T: RngCore> Sample for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_permutations() {
        let mut r = TinyRng::seed_from_u64(7);

        for n in 1..=12 {
            for _ in 0..10 {
                let p = r.next_permutation(n, n % 2 == 0).unwrap();
                assert_eq!(p.len(), n);
            }
        }
        assert!(r.next_permutation(17, false).is_err());
    }
}
