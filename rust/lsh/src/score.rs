//! Confusion-matrix scoring of predicted pairs against ground truth.

use serde::{Deserialize, Serialize};

use crate::lsh::PairSet;

/// Smoothing constant keeping precision and recall defined when TP, FP and FN are all zero.
pub const EPSILON: f64 = 1e-9;

/// Confusion counts and derived metrics for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_positives: u64,
    pub true_negatives: u64,
}

impl ScoreResult {
    /// Derive metrics from confusion counts.
    pub fn from_counts(tp: u64, fp: u64, fn_: u64, tn: u64) -> Self {
        let (tp_f, fp_f, fn_f) = (tp as f64, fp as f64, fn_ as f64);
        let precision = (tp_f + EPSILON) / (tp_f + fp_f + EPSILON);
        let recall = (tp_f + EPSILON) / (tp_f + fn_f + EPSILON);
        let f1 = 2.0 * precision * recall / (precision + recall);
        Self {
            f1,
            precision,
            recall,
            false_positives: fp,
            false_negatives: fn_,
            true_positives: tp,
            true_negatives: tn,
        }
    }

    /// `(f1, precision, recall, fp, fn, tp, tn)`
    pub fn as_tuple(&self) -> (f64, f64, f64, u64, u64, u64, u64) {
        (
            self.f1,
            self.precision,
            self.recall,
            self.false_positives,
            self.false_negatives,
            self.true_positives,
            self.true_negatives,
        )
    }
}

/// Number of unordered pairs among `n` documents.
pub fn total_pairs(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// Score `predicted` against `ground_truth` over `total_documents` documents.
///
/// TN is `C(n, 2) - (TP + FP + FN)`, saturating at zero if the pair sets
/// reference more pairs than `n` documents can form.
pub fn score(predicted: &PairSet, ground_truth: &PairSet, total_documents: usize) -> ScoreResult {
    let tp = predicted.intersection(ground_truth).count() as u64;
    let fp = predicted.len() as u64 - tp;
    let fn_ = ground_truth.len() as u64 - tp;
    let tn = total_pairs(total_documents).saturating_sub(tp + fp + fn_);
    ScoreResult::from_counts(tp, fp, fn_, tn)
}
