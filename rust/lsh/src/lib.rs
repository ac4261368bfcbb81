//! Plagio LSH: approximate near-duplicate detection.
//!
//! Finds candidate duplicate pairs in a document corpus without comparing
//! all O(n²) pairs exactly:
//!
//! - **Shingling** (`shingle`): word n-grams or character k-grams, stored as
//!   a sparse document × shingle matrix
//! - **MinHash** (`minhash`): dense signatures whose agreement rate estimates
//!   Jaccard similarity
//! - **Banded LSH** (`lsh`): documents sharing a bucket in any band become
//!   candidates
//! - **Family filtering** (`filter`): drops a document matching itself or its
//!   own paraphrases, and reports paraphrases through their originals
//! - **Scoring** (`score`): precision / recall / F1 against ground truth
//!
//! Every run is reproducible from the documents, the hyperparameters and one
//! seed. Signature rows and LSH bands are computed in parallel with rayon.
//!
//! ## Usage
//!
//! ```rust
//! use plagio_lsh::{Corpus, Document, DocumentProvenance, Estimator, Family, LshModel, LshParams};
//!
//! let text = "the quick brown fox jumps over the lazy dog";
//! let corpus = Corpus::new(vec![
//!     Document::new("1-ORIG", text, DocumentProvenance::new(1, Family::Original)),
//!     Document::new("1-SPUN", text, DocumentProvenance::new(1, Family::Suspicious)),
//! ]);
//!
//! let model = LshModel::new(LshParams::default()).unwrap();
//! let pairs = model.predict(&corpus).unwrap();
//! assert_eq!(pairs.len(), 1);
//! ```

pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod filter;
pub mod hashing;
pub mod lsh;
pub mod minhash;
pub mod model;
pub mod score;
pub mod shingle;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn plagio_lsh(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<python::PyLshModel>()?;
    Ok(())
}

// Re-export main types
pub use config::{LshParams, ShingleMode};
pub use corpus::{Corpus, GroundTruth, SkippedDocument};
pub use document::{Document, DocumentProvenance, Family};
pub use error::{Error, Result};
pub use filter::{filter_pairs, PairFilter};
pub use hashing::HashFamily;
pub use lsh::{find_candidates, pair_set, CandidatePair, PairSet};
pub use minhash::{compute_signature_matrix, SignatureMatrix};
pub use model::{Estimator, LshModel};
pub use score::{score, ScoreResult};
pub use shingle::{shingle, ShingleMatrix, Shingler};
