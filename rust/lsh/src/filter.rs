//! Family-aware filtering of candidate pairs.
//!
//! A document matching itself, or one of its own paraphrases, is a trivial
//! hit. Such pairs are dropped: both sides resolve to the same source id and
//! family. Paraphrases are reported through the document they were derived
//! from, so a hit on a paraphrase is remapped to its original's index.

use std::collections::HashMap;
use tracing::debug;

use crate::document::{DocumentProvenance, Family};
use crate::lsh::{CandidatePair, PairSet};

/// Removes same-source pairs and folds paraphrases onto their originals.
#[derive(Debug, Clone)]
pub struct PairFilter {
    provenance: Vec<DocumentProvenance>,
    /// Document index → index reported in output pairs
    canonical: Vec<usize>,
}

impl PairFilter {
    /// Build a filter for documents whose provenance is `provenance[i]`.
    ///
    /// A paraphrase maps to the non-paraphrased document with the same source
    /// id and family. A paraphrase with no such document in the set maps to
    /// itself.
    pub fn new(provenance: &[DocumentProvenance]) -> Self {
        let mut originals: HashMap<(u64, Family), usize> = HashMap::new();
        for (idx, p) in provenance.iter().enumerate() {
            if !p.is_paraphrase() {
                originals.entry((p.source_id, p.family)).or_insert(idx);
            }
        }

        let canonical = provenance
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                if p.is_paraphrase() {
                    originals.get(&(p.source_id, p.family)).copied().unwrap_or(idx)
                } else {
                    idx
                }
            })
            .collect();

        Self {
            provenance: provenance.to_vec(),
            canonical,
        }
    }

    /// Index reported for document `idx`.
    pub fn canonical_index(&self, idx: usize) -> usize {
        self.canonical[idx]
    }

    /// Filter one pair; `None` if it is a same-source comparison.
    pub fn filter_pair(&self, pair: CandidatePair) -> Option<CandidatePair> {
        let (a, b) = pair.as_tuple();
        if self.provenance[a].same_source(&self.provenance[b]) {
            return None;
        }
        CandidatePair::new(self.canonical[a], self.canonical[b])
    }

    /// Filter a candidate set.
    ///
    /// # Panics
    /// If a pair references a document index outside the provenance list.
    pub fn filter(&self, pairs: PairSet) -> PairSet {
        let before = pairs.len();
        let filtered: PairSet = pairs
            .into_iter()
            .filter_map(|pair| self.filter_pair(pair))
            .collect();
        debug!(before, after = filtered.len(), "filtered candidate pairs");
        filtered
    }
}

/// Filter `pairs` using `provenance` in one call.
pub fn filter_pairs(pairs: PairSet, provenance: &[DocumentProvenance]) -> PairSet {
    PairFilter::new(provenance).filter(pairs)
}
