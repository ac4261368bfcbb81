//! Corpus ingestion and ground-truth handling.
//!
//! - **Loading**: read preprocessed documents from disk in parallel, derive
//!   their provenance, and report failures as skipped documents. A skipped
//!   document never occupies an index, so the corpus stays contiguous.
//! - **Ground truth**: plain text, one pair per line, two whitespace-separated
//!   document names. Names are resolved to corpus indices before scoring.

use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::document::{base_name, Document, DocumentProvenance};
use crate::error::{Error, Result};
use crate::lsh::{CandidatePair, PairSet};

/// A document that could not be ingested.
#[derive(Debug)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: Error,
}

/// Ordered, contiguous collection of preprocessed documents.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Assemble a corpus from parallel sequences of names, contents and provenance.
    pub fn from_parts(
        names: Vec<String>,
        contents: Vec<String>,
        provenance: Vec<DocumentProvenance>,
    ) -> Result<Self> {
        if contents.len() != provenance.len() || names.len() != contents.len() {
            return Err(Error::LengthMismatch {
                documents: contents.len(),
                names: names.len(),
                provenance: provenance.len(),
            });
        }
        let documents = names
            .into_iter()
            .zip(contents)
            .zip(provenance)
            .map(|((name, content), provenance)| Document::new(name, content, provenance))
            .collect();
        Ok(Self { documents })
    }

    /// Assemble a corpus from document names and contents, deriving
    /// provenance from each name.
    pub fn from_named(names: Vec<String>, contents: Vec<String>) -> Result<Self> {
        let provenance = names
            .iter()
            .map(DocumentProvenance::from_path)
            .collect::<Result<Vec<_>>>()?;
        Self::from_parts(names, contents, provenance)
    }

    /// Read every path in parallel, keeping input order for the documents
    /// that load.
    pub fn load<P>(paths: &[P]) -> (Self, Vec<SkippedDocument>)
    where
        P: AsRef<Path> + Sync,
    {
        let results: Vec<std::result::Result<Document, SkippedDocument>> = paths
            .par_iter()
            .map(|p| load_document(p.as_ref()))
            .collect();

        let mut documents = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(doc) => documents.push(doc),
                Err(skip) => {
                    warn!(path = %skip.path.display(), reason = %skip.reason, "skipping document");
                    skipped.push(skip);
                }
            }
        }
        info!(loaded = documents.len(), skipped = skipped.len(), "corpus loaded");
        (Self { documents }, skipped)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, idx: usize) -> Option<&Document> {
        self.documents.get(idx)
    }

    /// Provenance of every document, in corpus order.
    pub fn provenance(&self) -> Vec<DocumentProvenance> {
        self.documents.iter().map(|d| d.provenance).collect()
    }

    /// Map index pairs to document names, sorted for stable display.
    pub fn display_pairs(&self, pairs: &PairSet) -> Vec<(String, String)> {
        let mut sorted: Vec<CandidatePair> = pairs.iter().copied().collect();
        sorted.sort_unstable();
        sorted
            .into_iter()
            .filter_map(|p| {
                let a = self.documents.get(p.first())?;
                let b = self.documents.get(p.second())?;
                Some((a.name.clone(), b.name.clone()))
            })
            .collect()
    }
}

fn load_document(path: &Path) -> std::result::Result<Document, SkippedDocument> {
    let skip = |reason| SkippedDocument {
        path: path.to_path_buf(),
        reason,
    };
    let provenance = DocumentProvenance::from_path(path).map_err(skip)?;
    let content = fs::read_to_string(path).map_err(|source| {
        skip(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    let content = content
        .strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(content);
    Ok(Document::new(path.display().to_string(), content, provenance))
}

/// Known duplicate pairs, by document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruth {
    pairs: Vec<(String, String)>,
}

impl GroundTruth {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Parse the text format: one pair per line, blank lines ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut pairs = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                [a, b] => pairs.push((a.to_string(), b.to_string())),
                _ => {
                    return Err(Error::MalformedGroundTruth {
                        line: lineno + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Ok(Self { pairs })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Write the text format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text: String = self.pairs.iter().map(|(a, b)| format!("{a} {b}\n")).collect();
        fs::write(path, text).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Resolve names to index pairs in `corpus`.
    ///
    /// A name matches every non-paraphrased document whose base name equals
    /// it (a `.txt` suffix on either side is ignored). Pairs naming a document
    /// that is not in the corpus are skipped.
    pub fn resolve(&self, corpus: &Corpus) -> PairSet {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, doc) in corpus.documents().iter().enumerate() {
            if doc.provenance.is_paraphrase() {
                continue;
            }
            if let Some(name) = base_name(&doc.name) {
                by_name.entry(name).or_default().push(idx);
            }
        }

        let lookup = |name: &str| {
            let key = name.strip_suffix(".txt").unwrap_or(name);
            by_name.get(key).map(Vec::as_slice).unwrap_or(&[])
        };

        let mut resolved = PairSet::new();
        let mut unresolved = 0usize;
        for (a, b) in &self.pairs {
            let (left, right) = (lookup(a), lookup(b));
            if left.is_empty() || right.is_empty() {
                unresolved += 1;
                continue;
            }
            for &i in left {
                resolved.extend(right.iter().filter_map(|&j| CandidatePair::new(i, j)));
            }
        }
        if unresolved > 0 {
            warn!(unresolved, "ground-truth pairs reference documents outside the corpus");
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Family;
    use std::io::Write;

    fn corpus() -> Corpus {
        Corpus::from_named(
            vec![
                "pre/1-ORIG.txt".into(),
                "pre/1-SPUN.txt".into(),
                "pre/2-ORIG.txt".into(),
                "para/1-ORIG/1-ORIG_paraphrased_0.txt".into(),
            ],
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_ground_truth() {
        let gt = GroundTruth::parse("\u{feff}1-ORIG.txt 1-SPUN.txt\n\n2-ORIG.txt   2-SPUN.txt\n")
            .unwrap();
        assert_eq!(gt.len(), 2);
        assert_eq!(gt.pairs()[1], ("2-ORIG.txt".to_string(), "2-SPUN.txt".to_string()));
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        let err = GroundTruth::parse("a b\nonly-one\n").unwrap_err();
        assert!(matches!(err, Error::MalformedGroundTruth { line: 2, .. }));
    }

    #[test]
    fn test_resolve_ignores_paraphrases_and_missing() {
        let gt = GroundTruth::new(vec![
            ("1-ORIG.txt".into(), "1-SPUN.txt".into()),
            ("2-ORIG".into(), "2-SPUN".into()),
        ]);
        let resolved = gt.resolve(&corpus());
        assert_eq!(resolved.len(), 1);
        assert!(resolved.contains(&CandidatePair::new(0, 1).unwrap()));
    }

    #[test]
    fn test_ground_truth_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraud_pairs.txt");
        let gt = GroundTruth::new(vec![("339-ORIG.txt".into(), "339-SPUN.txt".into())]);
        gt.save(&path).unwrap();
        assert_eq!(GroundTruth::load(&path).unwrap(), gt);
        assert!(matches!(
            GroundTruth::load(dir.path().join("missing.txt")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_load_skips_bad_documents() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("7-ORIG.txt");
        let mut f = fs::File::create(&good).unwrap();
        write!(f, "\u{feff}hello world").unwrap();
        let unnamed = dir.path().join("notes.txt");
        fs::write(&unnamed, "whatever").unwrap();
        let missing = dir.path().join("8-SPUN.txt");
        let other = dir.path().join("9-SPUN.txt");
        fs::write(&other, "spun text").unwrap();

        let (corpus, skipped) = Corpus::load(&[good, unnamed, missing, other]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(skipped.len(), 2);
        assert_eq!(corpus.get(0).unwrap().content, "hello world");
        assert_eq!(
            corpus.get(1).unwrap().provenance,
            DocumentProvenance::new(9, Family::Suspicious)
        );
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let err = Corpus::from_parts(
            vec!["a".into()],
            vec!["x".into(), "y".into()],
            vec![DocumentProvenance::new(1, Family::Original)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn test_from_parts_reports_each_length() {
        let err = Corpus::from_parts(
            vec!["1-ORIG".into()],
            vec!["x".into(), "y".into()],
            vec![
                DocumentProvenance::new(1, Family::Original),
                DocumentProvenance::new(2, Family::Original),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                documents: 2,
                names: 1,
                provenance: 2
            }
        ));
        assert_eq!(err.to_string(), "2 documents, 1 names and 2 provenance records");
    }

    #[test]
    fn test_display_pairs_sorted() {
        let pairs = crate::lsh::pair_set([(2, 1), (0, 1)]);
        let shown = corpus().display_pairs(&pairs);
        assert_eq!(shown[0], ("pre/1-ORIG.txt".to_string(), "pre/1-SPUN.txt".to_string()));
        assert_eq!(shown[1].0, "pre/1-SPUN.txt");
    }
}
