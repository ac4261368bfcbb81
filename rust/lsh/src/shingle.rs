//! Shingling: documents → sparse document × shingle membership matrix.
//!
//! Each document is cut into overlapping word n-grams or character k-grams.
//! Shingles are interned through 64-bit xxh3 fingerprints, so the global
//! index map holds 8-byte keys rather than the shingle text itself.
//!
//! Construction is chunked: fingerprints for a block of documents are
//! extracted in parallel (rayon), then interned sequentially in document
//! order. Index assignment is therefore deterministic for a given input
//! order, and peak memory is bounded by one chunk of fingerprint vectors
//! plus the matrix itself.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{LshParams, ShingleMode};
use crate::error::{Error, Result};

/// Documents fingerprinted in parallel per interning round
const DOC_CHUNK: usize = 512;

/// Sparse boolean matrix: rows are unique shingles, columns are documents.
///
/// Stored twice: row-major (shingle → documents containing it) for the
/// MinHash pass, and column-major (document → its shingles) for exact
/// similarity queries. Both index lists are sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct ShingleMatrix {
    num_documents: usize,
    /// Row → shingle fingerprint
    fingerprints: Vec<u64>,
    row_offsets: Vec<usize>,
    row_docs: Vec<u32>,
    doc_offsets: Vec<usize>,
    doc_rows: Vec<u32>,
}

impl ShingleMatrix {
    /// Number of unique shingles (rows).
    pub fn num_shingles(&self) -> usize {
        self.fingerprints.len()
    }

    /// Number of documents (columns).
    pub fn num_documents(&self) -> usize {
        self.num_documents
    }

    /// Number of set entries.
    pub fn nnz(&self) -> usize {
        self.doc_rows.len()
    }

    /// Documents containing shingle `row`, ascending.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.row_docs[self.row_offsets[row]..self.row_offsets[row + 1]]
    }

    /// Iterate `(shingle_index, documents)` over all rows.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[u32])> + '_ {
        (0..self.num_shingles()).map(move |s| (s, self.row(s)))
    }

    /// Shingle indices present in document `doc`, ascending.
    pub fn document(&self, doc: usize) -> &[u32] {
        self.doc_offsets
            .get(doc..doc + 2)
            .map_or(&[][..], |w| &self.doc_rows[w[0]..w[1]])
    }

    /// Fingerprint of the shingle at `row`.
    pub fn fingerprint(&self, row: usize) -> u64 {
        self.fingerprints[row]
    }

    /// True if shingle `row` occurs in document `doc`.
    pub fn contains(&self, row: usize, doc: usize) -> bool {
        self.row(row).binary_search(&(doc as u32)).is_ok()
    }

    /// Exact Jaccard similarity of two documents' shingle sets.
    ///
    /// Two empty sets are treated as identical.
    pub fn jaccard(&self, a: usize, b: usize) -> f64 {
        let (sa, sb) = (self.document(a), self.document(b));
        if sa.is_empty() && sb.is_empty() {
            return 1.0;
        }
        let intersection = sorted_intersection_len(sa, sb);
        let union = sa.len() + sb.len() - intersection;
        intersection as f64 / union as f64
    }

    /// Assemble both orientations from per-document row lists.
    fn from_document_rows(
        num_rows: usize,
        mut per_doc: Vec<Vec<u32>>,
    ) -> (Vec<usize>, Vec<u32>, Vec<usize>, Vec<u32>) {
        let mut doc_offsets = Vec::with_capacity(per_doc.len() + 1);
        let mut doc_rows = Vec::with_capacity(per_doc.iter().map(Vec::len).sum());
        let mut row_counts = vec![0usize; num_rows];

        doc_offsets.push(0);
        for rows in per_doc.iter_mut() {
            rows.sort_unstable();
            for &r in rows.iter() {
                row_counts[r as usize] += 1;
            }
            doc_rows.extend_from_slice(rows);
            doc_offsets.push(doc_rows.len());
        }

        // Counting transpose; documents are visited in order so each row's
        // document list comes out sorted.
        let mut row_offsets = Vec::with_capacity(num_rows + 1);
        row_offsets.push(0);
        for count in &row_counts {
            let last = *row_offsets.last().unwrap_or(&0);
            row_offsets.push(last + count);
        }
        let mut cursor = row_offsets[..num_rows].to_vec();
        let mut row_docs = vec![0u32; doc_rows.len()];
        for (doc, rows) in per_doc.iter().enumerate() {
            for &r in rows {
                let slot = &mut cursor[r as usize];
                row_docs[*slot] = doc as u32;
                *slot += 1;
            }
        }

        (row_offsets, row_docs, doc_offsets, doc_rows)
    }
}

/// Keep the first occurrence of every fingerprint.
fn distinct(fps: impl Iterator<Item = u64>) -> Vec<u64> {
    let mut seen = HashSet::new();
    fps.filter(|fp| seen.insert(*fp)).collect()
}

fn sorted_intersection_len(a: &[u32], b: &[u32]) -> usize {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}

/// Cuts documents into shingles and builds a [`ShingleMatrix`].
#[derive(Debug, Clone, Copy)]
pub struct Shingler {
    shingle_size: usize,
    window_step: usize,
    mode: ShingleMode,
}

impl Shingler {
    /// Create a shingler. Both `shingle_size` and `window_step` must be >= 1.
    pub fn new(shingle_size: usize, window_step: usize, mode: ShingleMode) -> Result<Self> {
        if shingle_size == 0 {
            return Err(Error::InvalidConfig("shingle_size must be >= 1".into()));
        }
        if window_step == 0 {
            return Err(Error::InvalidConfig("window_step must be >= 1".into()));
        }
        Ok(Self {
            shingle_size,
            window_step,
            mode,
        })
    }

    pub fn from_params(params: &LshParams) -> Result<Self> {
        Self::new(params.shingle_size, params.window_step, params.mode)
    }

    /// Distinct shingle fingerprints of one document, in first-occurrence order.
    ///
    /// A document shorter than `shingle_size` units yields no shingles.
    pub fn fingerprints(&self, text: &str) -> Vec<u64> {
        match self.mode {
            ShingleMode::Word => {
                let words: Vec<&str> = text.split_whitespace().collect();
                if words.len() < self.shingle_size {
                    return Vec::new();
                }
                let mut buf = String::new();
                let starts = (0..=words.len() - self.shingle_size).step_by(self.window_step);
                distinct(starts.map(|start| {
                    buf.clear();
                    for (k, word) in words[start..start + self.shingle_size].iter().enumerate() {
                        if k > 0 {
                            buf.push(' ');
                        }
                        buf.push_str(word);
                    }
                    xxh3_64(buf.as_bytes())
                }))
            }
            ShingleMode::Char => {
                // Byte offset of every char boundary, including the end.
                let bounds: Vec<usize> = text
                    .char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(text.len()))
                    .collect();
                let num_chars = bounds.len() - 1;
                if num_chars < self.shingle_size {
                    return Vec::new();
                }
                let starts = (0..=num_chars - self.shingle_size).step_by(self.window_step);
                distinct(starts.map(|start| {
                    xxh3_64(text[bounds[start]..bounds[start + self.shingle_size]].as_bytes())
                }))
            }
        }
    }

    /// Build the membership matrix for `documents` (column `d` = `documents[d]`).
    pub fn build<S>(&self, documents: &[S]) -> ShingleMatrix
    where
        S: AsRef<str> + Sync,
    {
        let mut index: HashMap<u64, u32> = HashMap::new();
        let mut fingerprints: Vec<u64> = Vec::new();
        let mut per_doc: Vec<Vec<u32>> = Vec::with_capacity(documents.len());

        for chunk in documents.chunks(DOC_CHUNK) {
            let extracted: Vec<Vec<u64>> = chunk
                .par_iter()
                .map(|doc| self.fingerprints(doc.as_ref()))
                .collect();

            for fps in extracted {
                let rows = fps
                    .into_iter()
                    .map(|fp| {
                        *index.entry(fp).or_insert_with(|| {
                            fingerprints.push(fp);
                            (fingerprints.len() - 1) as u32
                        })
                    })
                    .collect();
                per_doc.push(rows);
            }
        }

        let num_rows = fingerprints.len();
        let (row_offsets, row_docs, doc_offsets, doc_rows) =
            ShingleMatrix::from_document_rows(num_rows, per_doc);

        let matrix = ShingleMatrix {
            num_documents: documents.len(),
            fingerprints,
            row_offsets,
            row_docs,
            doc_offsets,
            doc_rows,
        };

        debug!(
            documents = matrix.num_documents(),
            shingles = matrix.num_shingles(),
            nnz = matrix.nnz(),
            mode = ?self.mode,
            shingle_size = self.shingle_size,
            window_step = self.window_step,
            "built shingle matrix"
        );
        matrix
    }
}

/// Shingle `documents` in one call.
pub fn shingle<S>(
    documents: &[S],
    shingle_size: usize,
    window_step: usize,
    mode: ShingleMode,
) -> Result<ShingleMatrix>
where
    S: AsRef<str> + Sync,
{
    Ok(Shingler::new(shingle_size, window_step, mode)?.build(documents))
}
