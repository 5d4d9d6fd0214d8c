//! # Search: Bounded Forward Search for a Safe Prime Pair
//!
//! Starts from half the index's estimate and walks Sophie Germain candidates
//! `q` upward through consecutive primes until `p = 2q + 1` is also prime.
//!
//! ## Algorithm
//!
//! 1. `q₀ = next_prime(⌊estimate / 2⌋)`.
//! 2. For each `q`, test `p = 2q + 1`; return on the first prime `p`.
//! 3. Otherwise `q ← next_prime(q)`; since `next_prime` advances strictly the
//!    walk never revisits a candidate.
//!
//! The walk is capped at `max_search_attempts` iterations and fails with
//! [`OracleError::SearchExhausted`] when the cap is reached. Safe primes have
//! density roughly `1.32 / (ln x)²` so the default cap of 10 000 is far above
//! the expected gap for any magnitude this estimator produces in practice.

use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::estimate_digits;
use crate::error::OracleError;
use crate::estimator::estimate_nth_safe_prime;
use crate::primality::PrimalityOracle;

/// A confirmed safe prime `p` with its Sophie Germain prime `q`, `p = 2q + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafePrimePair {
    #[serde(with = "crate::decimal")]
    pub p: Integer,
    #[serde(with = "crate::decimal")]
    pub q: Integer,
}

/// Find the first safe prime whose `q` lies above half the estimate for index `n`.
pub fn find_safe_prime_near(
    n: i64,
    config: &OracleConfig,
    oracle: &dyn PrimalityOracle,
) -> Result<SafePrimePair, OracleError> {
    let estimate = estimate_nth_safe_prime(n, config.a)?;
    let half = Integer::from(&estimate >> 1u32);
    let mut q = oracle.next_prime(&half);
    debug!(index = n, estimate = %estimate, start_q = %q, "safe prime search started");

    for attempt in 0..config.max_search_attempts {
        let p = Integer::from(&q << 1u32) + 1u32;
        if oracle.is_prime(&p) {
            debug!(
                index = n,
                attempts = attempt + 1,
                digits = estimate_digits(&p),
                "safe prime found"
            );
            return Ok(SafePrimePair { p, q });
        }
        q = oracle.next_prime(&q);
    }

    warn!(
        index = n,
        attempts = config.max_search_attempts,
        "safe prime search exhausted"
    );
    Err(OracleError::SearchExhausted {
        index: n,
        attempts: config.max_search_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primality::MillerRabin;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn find(n: i64) -> SafePrimePair {
        find_safe_prime_near(n, &OracleConfig::default(), &MillerRabin::default()).unwrap()
    }

    #[test]
    fn reference_pairs() {
        let cases: &[(i64, u32, u32)] = &[
            (1, 7, 3),
            (2, 11, 5),
            (3, 23, 11),
            (5, 59, 29),
            (6, 59, 29),
            (10, 167, 83),
            (20, 563, 281),
            (50, 2447, 1223),
            (100, 6599, 3299),
            (1000, 138059, 69029),
        ];
        for &(n, p, q) in cases {
            let pair = find(n);
            assert_eq!(pair.p, p, "p for index {}", n);
            assert_eq!(pair.q, q, "q for index {}", n);
        }
    }

    #[test]
    fn pair_structure_holds_for_first_hundred_indices() {
        let oracle = MillerRabin::default();
        for n in 1..=100 {
            let pair = find(n);
            assert!(oracle.is_prime(&pair.p), "index {}: p={} not prime", n, pair.p);
            assert!(oracle.is_prime(&pair.q), "index {}: q={} not prime", n, pair.q);
            assert_eq!(pair.p, Integer::from(&pair.q * 2u32) + 1u32);
        }
    }

    #[test]
    fn invalid_index_propagates() {
        let err = find_safe_prime_near(0, &OracleConfig::default(), &MillerRabin::default());
        assert_eq!(err, Err(OracleError::InvalidIndex { index: 0 }));
    }

    /// Oracle that never accepts `p`, counting how often it is asked.
    struct NeverPrime {
        calls: AtomicU64,
    }

    impl PrimalityOracle for NeverPrime {
        fn is_prime(&self, _n: &Integer) -> bool {
            self.calls.fetch_add(1, Ordering::Relaxed);
            false
        }

        fn next_prime(&self, n: &Integer) -> Integer {
            Integer::from(n + 1u32)
        }
    }

    #[test]
    fn exhaustion_reports_index_and_budget() {
        let oracle = NeverPrime {
            calls: AtomicU64::new(0),
        };
        let config = OracleConfig {
            max_search_attempts: 37,
            ..OracleConfig::default()
        };
        let err = find_safe_prime_near(12, &config, &oracle).unwrap_err();
        assert_eq!(
            err,
            OracleError::SearchExhausted {
                index: 12,
                attempts: 37
            }
        );
        assert_eq!(oracle.calls.load(Ordering::Relaxed), 37);
    }

    #[test]
    fn single_attempt_budget_still_finds_immediate_hit() {
        // index 1: q starts at next_prime(2) = 3 and p = 7 is prime on the first try
        let config = OracleConfig {
            max_search_attempts: 1,
            ..OracleConfig::default()
        };
        let pair = find_safe_prime_near(1, &config, &MillerRabin::default()).unwrap();
        assert_eq!(pair.p, 7);
    }

    #[test]
    fn logged_digit_count_tracks_pair_size() {
        for n in [1, 10, 1000] {
            let pair = find(n);
            let exact = crate::exact_digits(&pair.p);
            assert!(estimate_digits(&pair.p).abs_diff(exact) <= 1, "index {}", n);
        }
    }

    #[test]
    fn pair_serializes_as_decimal_strings() {
        let json = serde_json::to_value(find(10)).unwrap();
        assert_eq!(json, serde_json::json!({"p": "167", "q": "83"}));
    }
}
