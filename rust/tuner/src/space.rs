//! Hyperparameter search space.
//!
//! A grid over shingle size, window step, hash count, band count and bucket
//! count. Configurations are sampled without replacement from the grid with a
//! seeded RNG, so a search is reproducible from its seed.
//!
//! Spaces serialize to JSON so experiment grids can be kept next to results.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use plagio_lsh::{LshParams, ShingleMode};

use crate::error::{Error, Result};

/// Grid of candidate hyperparameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub shingle_size: Vec<usize>,
    pub window_step: Vec<usize>,
    pub n_hash: Vec<usize>,
    pub n_bands: Vec<usize>,
    /// Bucket counts (K)
    pub buckets: Vec<u64>,
    /// Shingling mode shared by every configuration
    #[serde(default)]
    pub mode: ShingleMode,
    /// Seed for every model's hash family
    pub seed: u64,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            shingle_size: vec![2, 3, 5, 6, 7],
            window_step: vec![1, 2, 3, 5, 8],
            n_hash: vec![50, 100, 150, 200, 300],
            n_bands: vec![10, 25, 50],
            buckets: vec![20_000, 50_000, 100_000],
            mode: ShingleMode::Word,
            seed: 42,
        }
    }
}

impl SearchSpace {
    /// Check that the grid is non-empty and every combination is buildable.
    ///
    /// Every `n_hash` must be a multiple of every `n_bands`, since any hash
    /// count may be paired with any band count.
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("shingle_size", self.shingle_size.is_empty()),
            ("window_step", self.window_step.is_empty()),
            ("n_hash", self.n_hash.is_empty()),
            ("n_bands", self.n_bands.is_empty()),
            ("buckets", self.buckets.is_empty()),
        ];
        if let Some((name, _)) = lists.iter().find(|(_, empty)| *empty) {
            return Err(Error::EmptySearchSpace(name));
        }

        if self.shingle_size.contains(&0) || self.window_step.contains(&0) {
            return Err(Error::InvalidSpace(
                "shingle_size and window_step must be >= 1".into(),
            ));
        }
        if self.buckets.contains(&0) {
            return Err(Error::InvalidSpace("buckets must be >= 1".into()));
        }
        for &bands in &self.n_bands {
            for &hashes in &self.n_hash {
                if bands == 0 || hashes % bands != 0 {
                    return Err(Error::InvalidSpace(format!(
                        "{hashes} is not a multiple of {bands}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of configurations in the grid.
    pub fn len(&self) -> usize {
        self.shingle_size.len()
            * self.window_step.len()
            * self.n_hash.len()
            * self.n_bands.len()
            * self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configuration at grid position `index` (mixed-radix decoding).
    pub fn get(&self, index: usize) -> Option<LshParams> {
        if index >= self.len() {
            return None;
        }
        let mut rest = index;
        let mut digit = |len: usize| {
            let d = rest % len;
            rest /= len;
            d
        };
        let buckets = self.buckets[digit(self.buckets.len())];
        let n_bands = self.n_bands[digit(self.n_bands.len())];
        let n_hash = self.n_hash[digit(self.n_hash.len())];
        let window_step = self.window_step[digit(self.window_step.len())];
        let shingle_size = self.shingle_size[digit(self.shingle_size.len())];
        Some(LshParams {
            shingle_size,
            window_step,
            n_hash,
            n_bands,
            buckets,
            seed: self.seed,
            mode: self.mode,
        })
    }

    /// Every configuration, in grid order.
    pub fn iter(&self) -> impl Iterator<Item = LshParams> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Sample `n_iter` distinct configurations using `seed`.
    ///
    /// Returns the whole grid when `n_iter` is at least its size.
    pub fn sample(&self, n_iter: usize, seed: u64) -> Vec<LshParams> {
        let len = self.len();
        if n_iter >= len {
            return self.iter().collect();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rand::seq::index::sample(&mut rng, len, n_iter)
            .into_iter()
            .filter_map(|i| self.get(i))
            .collect()
    }

    /// Save the space to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate a space from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let space: Self = serde_json::from_str(&json)?;
        space.validate()?;
        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn small_space() -> SearchSpace {
        SearchSpace {
            shingle_size: vec![2, 3],
            window_step: vec![1],
            n_hash: vec![20, 40],
            n_bands: vec![5, 10],
            buckets: vec![1_000, 5_000, 10_000],
            mode: ShingleMode::Char,
            seed: 7,
        }
    }

    #[test]
    fn test_default_space_is_valid() {
        let space = SearchSpace::default();
        assert!(space.validate().is_ok());
        assert_eq!(space.len(), 5 * 5 * 5 * 3 * 3);
    }

    #[test]
    fn test_grid_enumerates_every_combination_once() {
        let space = small_space();
        let all: Vec<LshParams> = space.iter().collect();
        assert_eq!(all.len(), 24);
        let unique: HashSet<LshParams> = all.iter().cloned().collect();
        assert_eq!(unique.len(), 24);
        assert!(all.iter().all(|p| p.validate().is_ok()));
        assert!(all.iter().all(|p| p.mode == ShingleMode::Char && p.seed == 7));
        assert!(space.get(24).is_none());
    }

    #[test]
    fn test_sample_without_replacement() {
        let space = small_space();
        let sample = space.sample(10, 42);
        assert_eq!(sample.len(), 10);
        let unique: HashSet<LshParams> = sample.iter().cloned().collect();
        assert_eq!(unique.len(), 10);
        assert_eq!(sample, space.sample(10, 42));
        assert_eq!(space.sample(100, 42).len(), 24);
    }

    #[test]
    fn test_validate_rejects_bad_spaces() {
        let space = SearchSpace {
            n_hash: vec![50, 75],
            n_bands: vec![10, 25],
            ..small_space()
        };
        assert!(matches!(space.validate(), Err(Error::InvalidSpace(_))));

        let space = SearchSpace {
            buckets: vec![],
            ..small_space()
        };
        assert!(matches!(
            space.validate(),
            Err(Error::EmptySearchSpace("buckets"))
        ));
    }

    #[test]
    fn test_save_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space.json");
        let space = small_space();
        space.save(&path).unwrap();
        assert_eq!(SearchSpace::load(&path).unwrap(), space);
    }
}
