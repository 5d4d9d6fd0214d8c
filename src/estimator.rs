//! # Estimator: Analytic Projection of Safe Prime Magnitudes
//!
//! A Bateman–Horn style count puts the n-th safe prime near
//! `a · n · (ln n)²` with the empirically fitted `a = 2.8913`. The first five
//! indices return the exact safe primes 5, 7, 11, 23, 47.
//!
//! All floating-point evaluation happens in IEEE-754 double precision with the
//! product taken left to right, `((a·n)·ln n)·ln n`, and the result truncated
//! toward zero. Changing that order changes estimates near integer
//! boundaries, and with them every downstream trace hash.

use rug::Integer;

use crate::error::OracleError;
use crate::primality::PrimalityOracle;

/// Exact safe primes returned for indices 1 through 5.
const FIRST_SAFE_PRIMES: [u32; 5] = [5, 7, 11, 23, 47];

/// `floor(a · n · ln(x)²)` as an arbitrary-precision integer.
fn analytic_magnitude(n: i64, ln_x: f64, a: f64) -> Integer {
    let raw = a * n as f64 * ln_x * ln_x;
    // The product is finite and non-negative for n >= 1 and finite a > 0.
    Integer::from_f64(raw.trunc()).unwrap_or_default()
}

/// Estimate the n-th safe prime.
pub fn estimate_nth_safe_prime(n: i64, a: f64) -> Result<Integer, OracleError> {
    if n < 1 {
        return Err(OracleError::InvalidIndex { index: n });
    }
    if n <= FIRST_SAFE_PRIMES.len() as i64 {
        return Ok(Integer::from(FIRST_SAFE_PRIMES[(n - 1) as usize]));
    }
    let ln_n = (n as f64).ln();
    Ok(analytic_magnitude(n, ln_n, a))
}

/// Map an epoch number back to a starting index, approximately inverting the
/// estimator. Never returns less than 1.
pub fn projector_index(epoch: u64, offset: i64, a: f64) -> u64 {
    let ln_n = (epoch.max(2) as f64).ln();
    let k_start = (epoch as f64 / (a * ln_n * ln_n)).trunc() as i64;
    k_start.saturating_add(offset).max(1) as u64
}

/// Candidate `p = 2q + 1` where `q` is the first prime above the analytic
/// magnitude of index `k`.
///
/// Only `q` is prime by construction. `p` is not tested and is frequently
/// composite (index 10 gives 315 = 3²·5·7); callers wanting a safe prime
/// must run it through [`crate::verify_safe_prime`].
pub fn get_candidate_from_index(
    k: i64,
    a: f64,
    oracle: &dyn PrimalityOracle,
) -> Result<Integer, OracleError> {
    if k < 1 {
        return Err(OracleError::InvalidIndex { index: k });
    }
    let ln_k = (k.max(2) as f64).ln();
    let raw = analytic_magnitude(k, ln_k, a);
    let q = oracle.next_prime(&raw);
    Ok(Integer::from(&q << 1u32) + 1u32)
}
