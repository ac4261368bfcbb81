//! MinHash signature matrix.
//!
//! For each hash function `h` and document `d`:
//! `signature[h][d] = min over shingles s in d of hash_h(s)`,
//! with [`MAX_HASH`] for a document that has no shingles.
//!
//! The one-pass update visits every (shingle, hash function) pair once and
//! every nonzero of the shingle matrix once per hash function. Rows of the
//! signature matrix are independent, so they are filled in parallel.

use rayon::prelude::*;
use tracing::debug;

use crate::hashing::{HashFamily, MAX_HASH};
use crate::shingle::ShingleMatrix;

/// Dense `n_hash × n_documents` matrix of 32-bit MinHash values, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMatrix {
    n_hash: usize,
    num_documents: usize,
    values: Vec<u32>,
}

impl SignatureMatrix {
    /// A matrix with every entry set to [`MAX_HASH`].
    pub fn new(n_hash: usize, num_documents: usize) -> Self {
        Self {
            n_hash,
            num_documents,
            values: vec![MAX_HASH; n_hash * num_documents],
        }
    }

    /// Compute signatures for `shingles`, consuming the shingle matrix.
    pub fn build(shingles: ShingleMatrix, hashing: &HashFamily) -> Self {
        let num_documents = shingles.num_documents();
        let mut sig = Self::new(hashing.n_hash(), num_documents);
        if num_documents == 0 {
            return sig;
        }

        sig.values
            .par_chunks_mut(num_documents)
            .enumerate()
            .for_each(|(h, row)| {
                for (s, docs) in shingles.rows() {
                    if docs.is_empty() {
                        continue;
                    }
                    let v = hashing.hash_one(h, s as u64);
                    for &d in docs {
                        let cell = &mut row[d as usize];
                        if v < *cell {
                            *cell = v;
                        }
                    }
                }
            });

        debug!(
            n_hash = sig.n_hash,
            documents = num_documents,
            shingles = shingles.num_shingles(),
            "built signature matrix"
        );
        sig
    }

    pub fn n_hash(&self) -> usize {
        self.n_hash
    }

    pub fn num_documents(&self) -> usize {
        self.num_documents
    }

    /// Entry for hash function `h`, document `d`.
    pub fn get(&self, h: usize, d: usize) -> u32 {
        self.values[h * self.num_documents + d]
    }

    /// All documents' values for hash function `h`.
    pub fn row(&self, h: usize) -> &[u32] {
        let start = h * self.num_documents;
        &self.values[start..start + self.num_documents]
    }

    /// Signature column of document `d`.
    pub fn column(&self, d: usize) -> Vec<u32> {
        (0..self.n_hash).map(|h| self.get(h, d)).collect()
    }

    /// Fill `out` with rows `start..start + out.len()` of document `d`.
    pub(crate) fn column_slice_into(&self, d: usize, start: usize, out: &mut [u32]) {
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.get(start + k, d);
        }
    }

    /// Estimated Jaccard similarity: fraction of equal signature positions.
    pub fn estimate_similarity(&self, a: usize, b: usize) -> f64 {
        if self.n_hash == 0 {
            return 0.0;
        }
        let matches = (0..self.n_hash)
            .filter(|&h| self.get(h, a) == self.get(h, b))
            .count();
        matches as f64 / self.n_hash as f64
    }
}

/// Compute the signature matrix for `shingles`.
pub fn compute_signature_matrix(shingles: ShingleMatrix, hashing: &HashFamily) -> SignatureMatrix {
    SignatureMatrix::build(shingles, hashing)
}
