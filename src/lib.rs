//! # echoprime: Deterministic Safe Prime Oracle
//!
//! Given an index `n`, projects it to the magnitude of the n-th safe prime,
//! searches forward for an actual pair `(p, q)` with `p = 2q + 1` and both
//! prime, verifies the pair, and emits a hashed trace record whose hash is
//! bit-exact across runs and implementations.
//!
//! ## Pipeline
//!
//! ```text
//! index → estimator → estimate → search → (p, q) → verify → verdict → trace
//! ```
//!
//! The four core stages live in [`estimator`], [`search`], [`verify`] (with
//! [`collapse`]) and [`trace`]. Primality is injected through the
//! [`primality::PrimalityOracle`] trait. [`contract`], [`export`] and
//! [`progress`] are thin layers consumed by the `echoprime` binary.

pub mod collapse;
pub mod config;
pub mod contract;
pub mod error;
pub mod estimator;
pub mod export;
pub mod known;
pub mod primality;
pub mod progress;
pub mod search;
pub mod trace;
pub mod verify;

pub use collapse::collapse_score;
pub use config::OracleConfig;
pub use error::OracleError;
pub use estimator::{estimate_nth_safe_prime, get_candidate_from_index, projector_index};
pub use primality::{MillerRabin, PrimalityOracle};
pub use search::{find_safe_prime_near, SafePrimePair};
pub use trace::{create_trace, Trace};
pub use verify::{batch_verify, batch_verify_par, verify_safe_prime, VerificationResult};

use rug::Integer;

/// Small primes for trial division pre-filter.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];

/// Quick check if n is divisible by any small prime.
/// Returns true if n is definitely composite (has a small factor).
/// Returns false if n might be prime (passed trial division).
pub fn has_small_factor(n: &Integer) -> bool {
    for &p in &SMALL_PRIMES {
        if n.is_divisible_u(p) {
            // n equal to the small prime itself is prime, not composite
            return n > &Integer::from(p);
        }
    }
    false
}

/// Two-round Miller-Rabin pre-screening: run 2 fast rounds first, full rounds only for survivors.
pub fn mr_screened_test(candidate: &Integer, mr_rounds: u32) -> rug::integer::IsPrime {
    use rug::integer::IsPrime;
    if mr_rounds > 2 && candidate.is_probably_prime(2) == IsPrime::No {
        return IsPrime::No;
    }
    candidate.is_probably_prime(mr_rounds)
}

/// Estimate decimal digit count from bit length, avoiding expensive to_string conversion.
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

/// Exact decimal digit count (expensive for very large numbers).
pub fn exact_digits(n: &Integer) -> u64 {
    n.to_string_radix(10).len() as u64
}

/// Serde adapter storing a `rug::Integer` as a plain base-10 string.
pub(crate) mod decimal {
    use rug::Integer;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Integer, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Integer, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Integer::from_str_radix(raw.trim(), 10)
            .map_err(|e| de::Error::custom(format!("invalid decimal integer {:?}: {}", raw, e)))
    }
}
