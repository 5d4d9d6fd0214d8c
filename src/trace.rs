//! # Trace: Canonical Hashed Oracle Records
//!
//! A [`Trace`] snapshots one verification outcome for publication. Its
//! `hash` is SHA-256 over
//!
//! ```text
//! {index}:{p}:{q}:{score_p}:{score_q}:{verified}
//! ```
//!
//! and must match previously stored traces byte for byte, so every field has a
//! fixed rendering:
//!
//! - integers: plain decimal, `-` sign when negative.
//! - floats: shortest round-trip digits. Fixed notation with at least one
//!   fractional digit when the decimal exponent is in `[-4, 16)` (`1.0`,
//!   `0.5`, `0.0001`), scientific otherwise with a signed exponent of at
//!   least two digits (`1e-07`, `1.5e+16`). `inf`, `-inf`, `nan` spelled out.
//! - booleans: `True` / `False`.
//!
//! The timestamp is not part of the hash; two traces built from the same
//! inputs differ only in `timestamp`.

use chrono::{SecondsFormat, Utc};
use rug::Integer;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Trace record format version.
pub const TRACE_VERSION: &str = "1.0.0";

/// One published oracle outcome with its integrity hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub version: String,
    pub index: u64,
    pub p: String,
    pub q: String,
    pub score_p: f64,
    pub score_q: f64,
    pub verified: bool,
    pub timestamp: String,
    pub hash: String,
}

impl Trace {
    /// Recompute the integrity hash from this record's own fields.
    pub fn compute_hash(&self) -> String {
        trace_hash(
            self.index,
            &self.p,
            &self.q,
            self.score_p,
            self.score_q,
            self.verified,
        )
    }

    /// True if the stored hash matches the record's fields.
    pub fn is_intact(&self) -> bool {
        self.compute_hash() == self.hash
    }
}

/// Build a trace for a verification outcome, stamped with the current UTC time.
pub fn create_trace(
    index: u64,
    p: &Integer,
    q: &Integer,
    score_p: f64,
    score_q: f64,
    verified: bool,
) -> Trace {
    let p = p.to_string_radix(10);
    let q = q.to_string_radix(10);
    let hash = trace_hash(index, &p, &q, score_p, score_q, verified);
    Trace {
        version: TRACE_VERSION.to_string(),
        index,
        p,
        q,
        score_p,
        score_q,
        verified,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        hash,
    }
}

/// The exact string the trace hash covers.
pub fn canonical_payload(
    index: u64,
    p: &str,
    q: &str,
    score_p: f64,
    score_q: f64,
    verified: bool,
) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}",
        index,
        p,
        q,
        canonical_float(score_p),
        canonical_float(score_q),
        if verified { "True" } else { "False" }
    )
}

fn trace_hash(index: u64, p: &str, q: &str, score_p: f64, score_q: f64, verified: bool) -> String {
    sha256_hex(&canonical_payload(index, p, q, score_p, score_q, verified))
}

/// Compute SHA-256 hex digest of a string.
fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Render a float with shortest round-trip digits in the trace hash format.
pub fn canonical_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip digits as `d.ddde<exp>`.
    let sci = format!("{:e}", x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let body = if point <= 0 {
            format!("0.{}{}", "0".repeat((-point) as usize), digits)
        } else if point as usize >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
        } else {
            let (int_part, frac_part) = digits.split_at(point as usize);
            format!("{}.{}", int_part, frac_part)
        };
        format!("{}{}", sign, body)
    } else {
        let (lead, rest) = digits.split_at(1);
        let mant = if rest.is_empty() {
            lead.to_string()
        } else {
            format!("{}.{}", lead, rest)
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", sign, mant, exp_sign, exp.abs())
    }
}
