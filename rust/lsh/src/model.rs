//! End-to-end near-duplicate estimator.
//!
//! Pipeline: shingle → MinHash signatures → LSH banding → pair filter,
//! optionally followed by scoring against ground truth.

use tracing::debug;

use crate::config::LshParams;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::filter::PairFilter;
use crate::hashing::HashFamily;
use crate::lsh::{find_candidates, PairSet};
use crate::minhash::SignatureMatrix;
use crate::score::{score, ScoreResult};
use crate::shingle::Shingler;

/// Predict duplicate pairs and score predictions.
pub trait Estimator {
    /// Filtered candidate pairs for `corpus`.
    fn predict(&self, corpus: &Corpus) -> Result<PairSet>;

    /// Predict, then score against `ground_truth` (already in corpus index space).
    fn score(&self, corpus: &Corpus, ground_truth: &PairSet) -> Result<ScoreResult>;
}

/// MinHash + banded LSH model for one hyperparameter configuration.
#[derive(Debug, Clone)]
pub struct LshModel {
    params: LshParams,
    shingler: Shingler,
    hashing: HashFamily,
}

impl LshModel {
    /// Validate `params` and derive the hash family.
    pub fn new(params: LshParams) -> Result<Self> {
        params.validate()?;
        let shingler = Shingler::from_params(&params)?;
        let hashing = HashFamily::from_params(&params)?;
        Ok(Self {
            params,
            shingler,
            hashing,
        })
    }

    pub fn params(&self) -> &LshParams {
        &self.params
    }

    pub fn hashing(&self) -> &HashFamily {
        &self.hashing
    }

    /// Signature matrix for `corpus`.
    pub fn signatures(&self, corpus: &Corpus) -> SignatureMatrix {
        let shingles = self.shingler.build(corpus.documents());
        SignatureMatrix::build(shingles, &self.hashing)
    }

    /// LSH candidates before family filtering.
    pub fn raw_candidates(&self, corpus: &Corpus) -> PairSet {
        find_candidates(&self.signatures(corpus), &self.hashing)
    }

    /// Predicted pairs as document names, for display.
    pub fn predict_names(&self, corpus: &Corpus) -> Result<Vec<(String, String)>> {
        Ok(corpus.display_pairs(&self.predict(corpus)?))
    }
}

impl Estimator for LshModel {
    fn predict(&self, corpus: &Corpus) -> Result<PairSet> {
        let raw = self.raw_candidates(corpus);
        let raw_len = raw.len();
        let filtered = PairFilter::new(&corpus.provenance()).filter(raw);
        debug!(
            documents = corpus.len(),
            raw = raw_len,
            filtered = filtered.len(),
            "prediction complete"
        );
        Ok(filtered)
    }

    fn score(&self, corpus: &Corpus, ground_truth: &PairSet) -> Result<ScoreResult> {
        let predicted = self.predict(corpus)?;
        Ok(score(&predicted, ground_truth, corpus.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShingleMode;
    use crate::document::{Document, DocumentProvenance, Family};
    use crate::lsh::{pair_set, CandidatePair};

    fn params() -> LshParams {
        LshParams {
            shingle_size: 3,
            window_step: 1,
            n_hash: 100,
            n_bands: 20,
            buckets: 10_000,
            seed: 42,
            mode: ShingleMode::Word,
        }
    }

    fn corpus() -> Corpus {
        let text = "students copied the entire essay about photosynthesis word for word";
        Corpus::new(vec![
            Document::new("1-ORIG", text, DocumentProvenance::new(1, Family::Original)),
            Document::new("1-SPUN", text, DocumentProvenance::new(1, Family::Suspicious)),
            Document::new(
                "2-ORIG",
                "an unrelated report on the migration patterns of arctic terns",
                DocumentProvenance::new(2, Family::Original),
            ),
        ])
    }

    #[test]
    fn test_rejects_bad_params() {
        let bad = LshParams {
            n_hash: 100,
            n_bands: 30,
            ..params()
        };
        assert!(LshModel::new(bad).is_err());
    }

    #[test]
    fn test_identical_pair_found_unrelated_ignored() {
        let model = LshModel::new(params()).unwrap();
        let corpus = corpus();
        assert!(model
            .raw_candidates(&corpus)
            .contains(&CandidatePair::new(0, 1).unwrap()));

        let predicted = model.predict(&corpus).unwrap();
        assert!(predicted.contains(&CandidatePair::new(0, 1).unwrap()));
        assert!(predicted.iter().all(|p| p.first() != 2 && p.second() != 2));
    }

    #[test]
    fn test_score_against_ground_truth() {
        let model = LshModel::new(params()).unwrap();
        let result = model.score(&corpus(), &pair_set([(0, 1)])).unwrap();
        assert_eq!(result.true_positives, 1);
        assert_eq!(result.false_negatives, 0);
        assert_eq!(result.true_negatives, 2);
        assert!((result.f1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_names() {
        let model = LshModel::new(params()).unwrap();
        let names = model.predict_names(&corpus()).unwrap();
        assert_eq!(names, vec![("1-ORIG".to_string(), "1-SPUN".to_string())]);
    }

    #[test]
    fn test_char_mode_end_to_end() {
        let model = LshModel::new(LshParams {
            shingle_size: 5,
            mode: ShingleMode::Char,
            buckets: 1 << 40,
            ..params()
        })
        .unwrap();
        let corpus = corpus();

        let predicted = model.predict(&corpus).unwrap();
        assert_eq!(predicted, pair_set([(0, 1)]));

        let result = model.score(&corpus, &pair_set([(0, 1)])).unwrap();
        assert_eq!(result.true_positives, 1);
        assert_eq!(result.false_positives, 0);
        assert_eq!(result.true_negatives, 2);
        assert!((result.f1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predictions_reproducible() {
        let corpus = corpus();
        let a = LshModel::new(params()).unwrap().predict(&corpus).unwrap();
        let b = LshModel::new(params()).unwrap().predict(&corpus).unwrap();
        assert_eq!(a, b);
    }
}
