//! # Verify: Safe Prime Verdicts
//!
//! A candidate `p` passes through three checks:
//!
//! 1. Structural gate: values below 5 and even values are rejected without
//!    any primality test, with `reason` set.
//! 2. Fallback primality: `p` and `q = (p - 1) / 2` both go through the
//!    [`PrimalityOracle`], and `p = 2q + 1` must hold.
//! 3. Collapse score: both `score_p` and `score_q` must reach `threshold`.
//!
//! `verified` requires both the fallback and the score check.

use rayon::prelude::*;
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::collapse::collapse_score;
use crate::primality::PrimalityOracle;

/// Reason attached to candidates rejected before any primality test.
pub const STRUCTURAL_REJECTION: &str = "Invalid candidate (too small or even)";

/// Verdict for a single safe-prime candidate `p`.
///
/// `verified` implies both `fallback_ok` and `symbolic_pass`; `fallback_ok`
/// implies `p` and `q` are prime with `p = 2q + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(with = "crate::decimal")]
    pub p: Integer,
    #[serde(with = "crate::decimal")]
    pub q: Integer,
    pub p_is_prime: bool,
    pub q_is_prime: bool,
    pub is_safe_prime: bool,
    pub score_p: f64,
    pub score_q: f64,
    pub symbolic_pass: bool,
    pub fallback_ok: bool,
    pub verified: bool,
    pub window: u64,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Round to 6 decimal places, ties to even on the exact binary value.
///
/// Goes through fixed-precision formatting rather than `(x * 1e6).round()`,
/// which rounds ties away from zero and can misround after the multiply.
fn round6(x: f64) -> f64 {
    format!("{:.6}", x).parse().unwrap_or(x)
}

/// Verify a safe-prime candidate with the primality oracle and the collapse score.
///
/// Never fails: structurally invalid inputs (below 5 or even) come back with
/// `reason` set and every flag false.
pub fn verify_safe_prime(
    p: &Integer,
    window: u64,
    threshold: f64,
    oracle: &dyn PrimalityOracle,
) -> VerificationResult {
    let q = Integer::from(p - 1u32) >> 1u32;

    if *p < 5 || p.is_even() {
        return VerificationResult {
            p: p.clone(),
            q,
            p_is_prime: false,
            q_is_prime: false,
            is_safe_prime: false,
            score_p: 0.0,
            score_q: 0.0,
            symbolic_pass: false,
            fallback_ok: false,
            verified: false,
            window,
            threshold,
            reason: Some(STRUCTURAL_REJECTION.to_string()),
        };
    }

    let p_is_prime = oracle.is_prime(p);
    let q_is_prime = oracle.is_prime(&q);
    let fallback_ok = p_is_prime && q_is_prime && Integer::from(&q << 1u32) + 1u32 == *p;

    let score_p = collapse_score(p, window);
    let score_q = collapse_score(&q, window);
    let symbolic_pass = score_p >= threshold && score_q >= threshold;

    VerificationResult {
        p: p.clone(),
        q,
        p_is_prime,
        q_is_prime,
        is_safe_prime: fallback_ok,
        score_p: round6(score_p),
        score_q: round6(score_q),
        symbolic_pass,
        fallback_ok,
        verified: fallback_ok && symbolic_pass,
        window,
        threshold,
        reason: None,
    }
}

/// Verify each candidate in order.
pub fn batch_verify(
    candidates: &[Integer],
    window: u64,
    threshold: f64,
    oracle: &dyn PrimalityOracle,
) -> Vec<VerificationResult> {
    candidates
        .iter()
        .map(|p| verify_safe_prime(p, window, threshold, oracle))
        .collect()
}

/// Same contract as [`batch_verify`], spread across the rayon pool.
/// Output order matches input order.
pub fn batch_verify_par(
    candidates: &[Integer],
    window: u64,
    threshold: f64,
    oracle: &dyn PrimalityOracle,
) -> Vec<VerificationResult> {
    candidates
        .par_iter()
        .map(|p| verify_safe_prime(p, window, threshold, oracle))
        .collect()
}
