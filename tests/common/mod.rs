//! Shared test helpers for integration tests.

#![allow(dead_code)]

use echoprime::{MillerRabin, OracleConfig};
use rug::Integer;

/// Default configuration and its primality oracle.
pub fn defaults() -> (OracleConfig, MillerRabin) {
    let config = OracleConfig::default();
    let oracle = config.oracle();
    (config, oracle)
}

/// Trial-division primality, independent of the oracle under test.
pub fn naive_is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Convert a small pair to u64 for naive checks.
pub fn to_u64(n: &Integer) -> u64 {
    n.to_u64().expect("value fits in u64")
}
