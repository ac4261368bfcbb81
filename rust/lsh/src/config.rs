//! Hyperparameters for one pipeline run.
//!
//! A run is fully determined by its documents and one [`LshParams`] value.
//! There is no global state: switching between word and character shingles
//! is done by passing a different [`ShingleMode`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unit a shingle is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShingleMode {
    /// Whitespace-separated words; a shingle is a tuple of consecutive words.
    #[default]
    Word,
    /// Unicode scalar values; a shingle is a contiguous substring.
    Char,
}

/// Configuration for a MinHash + LSH run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LshParams {
    /// Number of units per shingle
    pub shingle_size: usize,
    /// Stride between consecutive shingle starts
    pub window_step: usize,
    /// Number of MinHash functions (signature length)
    pub n_hash: usize,
    /// Number of LSH bands (n_hash must be divisible by n_bands)
    pub n_bands: usize,
    /// Number of buckets per band (K)
    pub buckets: u64,
    /// Seed for every random coefficient
    pub seed: u64,
    /// Word- or character-based shingling
    #[serde(default)]
    pub mode: ShingleMode,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            shingle_size: 3,
            window_step: 1,
            n_hash: 100,
            n_bands: 20,
            buckets: 100_000,
            seed: 42,
            mode: ShingleMode::Word,
        }
    }
}

impl LshParams {
    /// Check every parameter range and the `n_hash % n_bands == 0` constraint.
    pub fn validate(&self) -> Result<()> {
        if self.shingle_size == 0 {
            return Err(Error::InvalidConfig("shingle_size must be >= 1".into()));
        }
        if self.window_step == 0 {
            return Err(Error::InvalidConfig("window_step must be >= 1".into()));
        }
        validate_hashing(self.n_hash, self.n_bands, self.buckets)
    }

    /// Signature rows hashed together per band.
    pub fn rows_per_band(&self) -> usize {
        if self.n_bands == 0 {
            0
        } else {
            self.n_hash / self.n_bands
        }
    }

    /// Probability that two documents with Jaccard similarity `s` share a
    /// bucket in at least one band: \(1 - (1 - s^r)^b\).
    ///
    /// Bucket collisions between unequal band slices are ignored, so this is
    /// the ideal S-curve for an infinite `K`.
    pub fn candidate_probability(&self, jaccard_similarity: f64) -> f64 {
        let r = self.rows_per_band() as f64;
        let b = self.n_bands as f64;
        1.0 - (1.0 - jaccard_similarity.powf(r)).powf(b)
    }
}

pub(crate) fn validate_hashing(n_hash: usize, n_bands: usize, buckets: u64) -> Result<()> {
    if n_hash == 0 {
        return Err(Error::InvalidConfig("n_hash must be >= 1".into()));
    }
    if n_bands == 0 {
        return Err(Error::InvalidConfig("n_bands must be >= 1".into()));
    }
    if n_hash % n_bands != 0 {
        return Err(Error::InvalidConfig(format!(
            "n_hash ({n_hash}) must be divisible by n_bands ({n_bands})"
        )));
    }
    if buckets == 0 {
        return Err(Error::InvalidConfig("buckets (K) must be >= 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let params = LshParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.rows_per_band(), 5);
    }

    #[test]
    fn test_rejects_indivisible_bands() {
        let params = LshParams {
            n_hash: 100,
            n_bands: 30,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("divisible"));
    }

    #[test]
    fn test_rejects_zero_sizes() {
        for params in [
            LshParams { shingle_size: 0, ..Default::default() },
            LshParams { window_step: 0, ..Default::default() },
            LshParams { n_bands: 0, ..Default::default() },
            LshParams { buckets: 0, ..Default::default() },
        ] {
            assert!(params.validate().is_err(), "{params:?} should be rejected");
        }
    }

    #[test]
    fn test_candidate_probability_curve() {
        let params = LshParams::default();
        assert!(params.candidate_probability(0.0).abs() < 1e-12);
        assert!((params.candidate_probability(1.0) - 1.0).abs() < 1e-12);
        assert!(params.candidate_probability(0.8) > params.candidate_probability(0.3));
    }
}
