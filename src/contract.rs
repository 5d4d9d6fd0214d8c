//! # Contract: Ledger Submission Tuple
//!
//! Converts a [`Trace`] into the positional tuple a ledger contract call
//! expects: scores become fixed-point integers with four decimal places and
//! the hex hash becomes its 32 raw bytes.

use anyhow::{anyhow, bail, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::trace::Trace;

/// Fixed-point scale for scores (4 decimal places).
pub const SCORE_SCALE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTuple {
    pub index: u64,
    #[serde(with = "crate::decimal")]
    pub p: Integer,
    #[serde(with = "crate::decimal")]
    pub q: Integer,
    pub score_p: i64,
    pub score_q: i64,
    pub verified: bool,
    pub hash: [u8; 32],
}

/// Build the contract tuple for a trace.
pub fn format_for_contract(trace: &Trace) -> Result<ContractTuple> {
    let p = Integer::from_str_radix(&trace.p, 10)
        .map_err(|e| anyhow!("trace p is not a decimal integer: {}", e))?;
    let q = Integer::from_str_radix(&trace.q, 10)
        .map_err(|e| anyhow!("trace q is not a decimal integer: {}", e))?;
    Ok(ContractTuple {
        index: trace.index,
        p,
        q,
        score_p: fixed_point(trace.score_p)?,
        score_q: fixed_point(trace.score_q)?,
        verified: trace.verified,
        hash: decode_hash(&trace.hash)?,
    })
}

fn fixed_point(score: f64) -> Result<i64> {
    if !score.is_finite() {
        bail!("score {} has no fixed-point form", score);
    }
    Ok((score * SCORE_SCALE).round() as i64)
}

/// Decode a 64-character hex SHA-256 digest.
fn decode_hash(hex: &str) -> Result<[u8; 32]> {
    if hex.len() != 64 || !hex.is_ascii() {
        bail!("hash must be 64 hex characters (got {:?})", hex);
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        let pair = &hex[2 * i..2 * i + 2];
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|_| anyhow!("invalid hex byte {:?} in hash", pair))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::create_trace;

    #[test]
    fn formats_reference_trace() {
        let trace = create_trace(1, &Integer::from(47), &Integer::from(23), 1.0, 1.0, true);
        let tuple = format_for_contract(&trace).unwrap();
        assert_eq!(tuple.index, 1);
        assert_eq!(tuple.p, 47);
        assert_eq!(tuple.q, 23);
        assert_eq!(tuple.score_p, 10_000);
        assert_eq!(tuple.score_q, 10_000);
        assert!(tuple.verified);
        assert_eq!(tuple.hash[0], 0x5c);
        assert_eq!(tuple.hash[31], 0x33);
    }

    #[test]
    fn scores_round_to_four_places() {
        let trace = create_trace(7, &Integer::from(15), &Integer::from(7), 0.571429, 0.75, false);
        let tuple = format_for_contract(&trace).unwrap();
        assert_eq!(tuple.score_p, 5714);
        assert_eq!(tuple.score_q, 7500);
        assert_eq!(fixed_point(0.666667).unwrap(), 6667);
        assert!(fixed_point(f64::NAN).is_err());
    }

    #[test]
    fn rejects_malformed_traces() {
        let good = create_trace(1, &Integer::from(47), &Integer::from(23), 1.0, 1.0, true);

        let mut bad_p = good.clone();
        bad_p.p = "4x7".into();
        assert!(format_for_contract(&bad_p).is_err());

        let mut short_hash = good.clone();
        short_hash.hash.truncate(10);
        assert!(format_for_contract(&short_hash).is_err());

        let mut bad_hex = good;
        bad_hex.hash.replace_range(0..2, "zz");
        assert!(format_for_contract(&bad_hex).is_err());
    }
}
