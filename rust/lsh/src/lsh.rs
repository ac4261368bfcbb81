//! Banded LSH over a MinHash signature matrix.
//!
//! The signature is cut into `n_bands` bands of `r` rows. Within one band,
//! every document's slice is hashed to a bucket in `[0, K)`; all documents
//! landing in the same bucket become candidate pairs. A pair found in any
//! band is a candidate.
//!
//! Grouping by bucket produces exactly the pairs an all-pairs comparison of
//! bucket values would, without the quadratic scan over non-colliding
//! documents. Bands share no state and are processed in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

use crate::hashing::HashFamily;
use crate::minhash::SignatureMatrix;

/// Unordered document pair, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidatePair(usize, usize);

impl CandidatePair {
    /// Normalised pair of two distinct indices; `None` for a self-pair.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller index.
    pub fn first(&self) -> usize {
        self.0
    }

    /// Larger index.
    pub fn second(&self) -> usize {
        self.1
    }

    pub fn as_tuple(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}

impl fmt::Display for CandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Set of candidate pairs.
pub type PairSet = HashSet<CandidatePair>;

/// Collect `(a, b)` tuples into a [`PairSet`], dropping self-pairs.
pub fn pair_set<I>(pairs: I) -> PairSet
where
    I: IntoIterator<Item = (usize, usize)>,
{
    pairs
        .into_iter()
        .filter_map(|(a, b)| CandidatePair::new(a, b))
        .collect()
}

/// Bucket of every document in band `band`.
pub(crate) fn band_buckets(sig: &SignatureMatrix, hashing: &HashFamily, band: usize) -> Vec<u64> {
    let r = hashing.rows_per_band();
    let start = band * r;
    let mut slice = vec![0u32; r];
    (0..sig.num_documents())
        .map(|d| {
            sig.column_slice_into(d, start, &mut slice);
            hashing.band_bucket(band, &slice)
        })
        .collect()
}

/// All pairs of documents that share a bucket within one band.
fn band_pairs(buckets: &[u64]) -> Vec<CandidatePair> {
    let mut groups: HashMap<u64, Vec<usize>> = HashMap::new();
    for (doc, &bucket) in buckets.iter().enumerate() {
        groups.entry(bucket).or_default().push(doc);
    }

    let mut pairs = Vec::new();
    for docs in groups.values().filter(|docs| docs.len() > 1) {
        for (i, &a) in docs.iter().enumerate() {
            // Documents were pushed in ascending order, so a < b.
            pairs.extend(docs[i + 1..].iter().map(|&b| CandidatePair(a, b)));
        }
    }
    pairs
}

/// Every document pair sharing a bucket in at least one band.
///
/// # Panics
/// If `sig` has fewer rows than `hashing` has hash functions.
pub fn find_candidates(sig: &SignatureMatrix, hashing: &HashFamily) -> PairSet {
    assert!(
        sig.n_hash() >= hashing.n_hash(),
        "signature has {} rows but the hash family expects {}",
        sig.n_hash(),
        hashing.n_hash()
    );
    if sig.num_documents() < 2 {
        return PairSet::new();
    }

    let per_band: Vec<Vec<CandidatePair>> = (0..hashing.n_bands())
        .into_par_iter()
        .map(|band| band_pairs(&band_buckets(sig, hashing, band)))
        .collect();

    let candidates: PairSet = per_band.into_iter().flatten().collect();
    debug!(
        bands = hashing.n_bands(),
        rows_per_band = hashing.rows_per_band(),
        candidates = candidates.len(),
        "lsh banding complete"
    );
    candidates
}
