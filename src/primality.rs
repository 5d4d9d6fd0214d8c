//! # Primality: Injected Primality Capability
//!
//! The search and verifier never test primality directly; they call a
//! [`PrimalityOracle`]. Any correct implementation satisfies the contract.
//!
//! [`MillerRabin`] is the default: trial division by the small-prime table,
//! then two screening Miller–Rabin rounds, then the full round count for
//! survivors (GMP's `mpz_probab_prime_p`, which also runs Baillie–PSW style
//! checks). `next_prime` delegates to GMP's `mpz_nextprime`.

use rug::integer::IsPrime;
use rug::Integer;

use crate::config::DEFAULT_MR_ROUNDS;
use crate::{has_small_factor, mr_screened_test};

/// Primality queries over arbitrary-precision integers.
///
/// `Send + Sync` so a single oracle can serve a rayon batch.
pub trait PrimalityOracle: Send + Sync {
    /// True iff `n` is (with overwhelming probability) prime. Values below 2 are not.
    fn is_prime(&self, n: &Integer) -> bool;

    /// Smallest prime strictly greater than `n`.
    fn next_prime(&self, n: &Integer) -> Integer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    rounds: u32,
}

impl MillerRabin {
    pub fn new(rounds: u32) -> Self {
        MillerRabin {
            rounds: rounds.max(1),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        MillerRabin::new(DEFAULT_MR_ROUNDS)
    }
}

impl PrimalityOracle for MillerRabin {
    fn is_prime(&self, n: &Integer) -> bool {
        if *n < 2 {
            return false;
        }
        if has_small_factor(n) {
            return false;
        }
        mr_screened_test(n, self.rounds) != IsPrime::No
    }

    fn next_prime(&self, n: &Integer) -> Integer {
        n.clone().next_prime()
    }
}
