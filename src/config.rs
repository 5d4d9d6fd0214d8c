//! # Config: Oracle Constants as Explicit Configuration
//!
//! Every tunable the pipeline reads (the analytic constant `a`, the collapse
//! window and threshold, the search budget and Miller–Rabin rounds) lives in
//! [`OracleConfig`] and is passed by reference. Defaults reproduce the
//! reference oracle exactly.
//!
//! Parsed from TOML; missing keys take their defaults:
//!
//! ```toml
//! a = 2.8913
//! window = 128
//! threshold = 0.95
//! max_search_attempts = 10000
//! mr_rounds = 25
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::primality::MillerRabin;

/// Empirically fitted constant of the safe-prime counting heuristic.
pub const A_CONSTANT: f64 = 2.8913;
/// Number of binomial residues tested by the collapse score.
pub const DEFAULT_WINDOW: u64 = 128;
/// Minimum collapse score for both `p` and `q` to pass.
pub const DEFAULT_THRESHOLD: f64 = 0.95;
/// Iteration budget of the forward search.
pub const DEFAULT_MAX_SEARCH_ATTEMPTS: u32 = 10_000;
/// Miller–Rabin rounds used by the default primality oracle.
pub const DEFAULT_MR_ROUNDS: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub a: f64,
    pub window: u64,
    pub threshold: f64,
    pub max_search_attempts: u32,
    pub mr_rounds: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            a: A_CONSTANT,
            window: DEFAULT_WINDOW,
            threshold: DEFAULT_THRESHOLD,
            max_search_attempts: DEFAULT_MAX_SEARCH_ATTEMPTS,
            mr_rounds: DEFAULT_MR_ROUNDS,
        }
    }
}

impl OracleConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: OracleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a TOML file path.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Check the values for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.a.is_finite() || self.a <= 0.0 {
            bail!("a must be a positive finite number (got {})", self.a);
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!("threshold must be within [0, 1] (got {})", self.threshold);
        }
        if self.max_search_attempts == 0 {
            bail!("max_search_attempts must be >= 1");
        }
        if self.mr_rounds == 0 {
            bail!("mr_rounds must be >= 1");
        }
        Ok(())
    }

    /// Primality oracle configured with this config's round count.
    pub fn oracle(&self) -> MillerRabin {
        MillerRabin::new(self.mr_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = OracleConfig::default();
        assert_eq!(config.a, 2.8913);
        assert_eq!(config.window, 128);
        assert_eq!(config.threshold, 0.95);
        assert_eq!(config.max_search_attempts, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = OracleConfig::from_toml_str("").unwrap();
        assert_eq!(config, OracleConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = OracleConfig::from_toml_str("window = 64\nthreshold = 0.5\n").unwrap();
        assert_eq!(config.window, 64);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.a, A_CONSTANT);
        assert_eq!(config.mr_rounds, DEFAULT_MR_ROUNDS);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(OracleConfig::from_toml_str("threshold = 1.5").is_err());
        assert!(OracleConfig::from_toml_str("a = -1.0").is_err());
        assert!(OracleConfig::from_toml_str("max_search_attempts = 0").is_err());
        assert!(OracleConfig::from_toml_str("mr_rounds = 0").is_err());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(OracleConfig::from_toml_str("windw = 12").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echoprime.toml");
        std::fs::write(&path, "max_search_attempts = 500\n").unwrap();
        let config = OracleConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.max_search_attempts, 500);

        let missing = dir.path().join("missing.toml");
        assert!(OracleConfig::from_toml_file(&missing).is_err());
    }
}
