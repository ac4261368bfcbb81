//! Search results: one record per evaluated configuration.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use plagio_lsh::{LshParams, ScoreResult};

use crate::error::{Error, Result};

/// A configuration and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Position in the sampled configuration list
    pub index: usize,
    pub params: LshParams,
    pub score: ScoreResult,
}

impl Trial {
    /// Ranking: higher F1 first, then lower sample index.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .f1
            .total_cmp(&self.score.f1)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// A configuration that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub index: usize,
    pub params: LshParams,
    pub error: String,
}

/// Result of a full search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: Trial,
    /// Successful trials, in sample order
    pub trials: Vec<Trial>,
    pub failures: Vec<TrialFailure>,
}

impl SearchOutcome {
    /// The `n` best trials, best first.
    pub fn top(&self, n: usize) -> Vec<&Trial> {
        let mut ranked: Vec<&Trial> = self.trials.iter().collect();
        ranked.sort_by(|a, b| a.rank_cmp(b));
        ranked.truncate(n);
        ranked
    }

    /// Save the outcome to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an outcome from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(index: usize, tp: u64, fp: u64) -> Trial {
        Trial {
            index,
            params: LshParams {
                n_hash: 10 * (index + 1),
                n_bands: 5,
                ..Default::default()
            },
            score: ScoreResult::from_counts(tp, fp, 0, 10),
        }
    }

    fn outcome() -> SearchOutcome {
        let trials = vec![trial(0, 1, 3), trial(1, 2, 0), trial(2, 1, 1), trial(3, 2, 0)];
        SearchOutcome {
            best: trials[1].clone(),
            trials,
            failures: vec![TrialFailure {
                index: 4,
                params: LshParams::default(),
                error: "boom".into(),
            }],
        }
    }

    #[test]
    fn test_top_orders_by_f1_then_index() {
        let outcome = outcome();
        let top: Vec<usize> = outcome.top(3).iter().map(|t| t.index).collect();
        assert_eq!(top, vec![1, 3, 2]);
        assert_eq!(outcome.top(10).len(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation.json");
        let outcome = outcome();
        outcome.save_json(&path).unwrap();
        assert_eq!(SearchOutcome::load_json(&path).unwrap(), outcome);
    }

    #[test]
    fn test_json_keeps_scores_bit_exact() {
        // 0.40000000024000004 is read back as 0.40000000024 by the fast parser.
        let score = ScoreResult::from_counts(1, 3, 0, 10);
        let json = serde_json::to_string(&score).unwrap();
        let loaded: ScoreResult = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.f1.to_bits(), score.f1.to_bits());
        assert_eq!(loaded.precision.to_bits(), score.precision.to_bits());
        assert_eq!(loaded.recall.to_bits(), score.recall.to_bits());
    }
}
