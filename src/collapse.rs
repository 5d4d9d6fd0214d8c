//! # Collapse: Modular Binomial Collapse Score
//!
//! For an integer `p` the score is the fraction of `k ∈ 1..=T`,
//! `T = min(window, p − 1)`, with `C(p, k) ≡ 0 (mod p)`.
//!
//! For prime `p` every such binomial is divisible by `p`: the factor `p` in
//! the numerator `p!` cannot be cancelled by `k!(p−k)!` when `0 < k < p`.
//! Every prime therefore scores exactly 1.0, and the score adds no information
//! beyond a primality test. It is kept because trace consumers read
//! `score_p`/`score_q`; it carries no cryptographic weight.
//!
//! ## Computation
//!
//! Binomials are built exactly with the running product
//! `C(p, k) = C(p, k−1) · (p − k + 1) / k`, where each division is exact.
//! `C(p, k)` grows to roughly `k · log₂ p` bits, so a window of 128 over a
//! 1000-bit `p` peaks near 128 kbit. No floating point touches the residues.

use rug::Integer;

/// Collapse score of `p` over the first `window` binomial coefficients.
///
/// Returns 0.0 for `p < 2` or an empty window.
pub fn collapse_score(p: &Integer, window: u64) -> f64 {
    if *p < 2 {
        return 0.0;
    }
    let span = Integer::from(p - 1u32);
    let t = match span.to_u64() {
        Some(s) => s.min(window),
        None => window,
    };
    if t == 0 {
        return 0.0;
    }

    let mut binom = Integer::from(1u32);
    let mut hits: u64 = 0;
    for k in 1..=t {
        binom *= Integer::from(p - (k - 1));
        binom.div_exact_mut(&Integer::from(k));
        if binom.is_divisible(p) {
            hits += 1;
        }
    }
    hits as f64 / t as f64
}
