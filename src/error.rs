//! Hard failures raised by the estimator and the forward search.
//!
//! Negative verdicts are not errors: the verifier reports them through
//! [`crate::VerificationResult`] fields instead.

/// Errors from index projection and safe-prime search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Caller supplied an index below 1.
    InvalidIndex { index: i64 },
    /// The bounded forward search found no safe-prime pair.
    SearchExhausted { index: i64, attempts: u32 },
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::InvalidIndex { index } => {
                write!(f, "Index must be >= 1 (got {})", index)
            }
            OracleError::SearchExhausted { index, attempts } => write!(
                f,
                "No safe prime found after {} attempts from index {}",
                attempts, index
            ),
        }
    }
}

impl std::error::Error for OracleError {}
