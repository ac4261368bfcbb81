//! Documents and their provenance.
//!
//! Provenance is derived once, at ingestion, and carried next to each
//! document so that pair filtering never has to look at paths again.
//!
//! Two dataset naming schemes are recognised:
//! - `339-ORIG.txt` / `339-SPUN.txt` (spun Wikipedia articles)
//! - `source-document00001.txt` / `suspicious-document00001.txt` (PAN corpus)
//!
//! Paraphrased copies live in a directory named after their base document and
//! are called `<base>_paraphrased_<version>.txt`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const PARAPHRASE_MARKER: &str = "_paraphrased_";

/// Which side of a plagiarism relation a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    /// Source material (`ORIG`, `source-document`).
    Original,
    /// Possibly plagiarised material (`SPUN`, `suspicious-document`).
    Suspicious,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Original => f.write_str("original"),
            Family::Suspicious => f.write_str("suspicious"),
        }
    }
}

/// Identity of a document's underlying source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentProvenance {
    /// Numeric document id shared by an original and its spun/suspicious twin
    pub source_id: u64,
    /// Original or suspicious side
    pub family: Family,
    /// Paraphrase version, `None` for the document itself
    pub paraphrase: Option<u32>,
}

impl DocumentProvenance {
    /// Provenance of a non-paraphrased document.
    pub fn new(source_id: u64, family: Family) -> Self {
        Self {
            source_id,
            family,
            paraphrase: None,
        }
    }

    /// Provenance of paraphrase `version` of `(source_id, family)`.
    pub fn paraphrased(source_id: u64, family: Family, version: u32) -> Self {
        Self {
            source_id,
            family,
            paraphrase: Some(version),
        }
    }

    /// True if both documents stem from the same source and family,
    /// regardless of paraphrasing.
    pub fn same_source(&self, other: &Self) -> bool {
        self.source_id == other.source_id && self.family == other.family
    }

    pub fn is_paraphrase(&self) -> bool {
        self.paraphrase.is_some()
    }

    /// Derive provenance from a document path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.display().to_string()))?;
        Self::from_stem(stem)
    }

    /// Derive provenance from a file stem (name without extension).
    pub fn from_stem(stem: &str) -> Result<Self> {
        let invalid = || Error::InvalidFileName(stem.to_string());

        let (base, paraphrase) = match stem.rsplit_once(PARAPHRASE_MARKER) {
            Some((base, version)) => (base, Some(version.parse::<u32>().map_err(|_| invalid())?)),
            None => (stem, None),
        };

        let (source_id, family) = parse_base_name(base).ok_or_else(invalid)?;
        Ok(Self {
            source_id,
            family,
            paraphrase,
        })
    }
}

/// Base document name of a path: the file stem with any paraphrase suffix removed.
pub fn base_name(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let base = stem
        .rsplit_once(PARAPHRASE_MARKER)
        .map_or(stem, |(base, _)| base);
    Some(base.to_string())
}

fn parse_base_name(base: &str) -> Option<(u64, Family)> {
    if let Some(digits) = base.strip_prefix("source-document") {
        return Some((parse_digits(digits)?, Family::Original));
    }
    if let Some(digits) = base.strip_prefix("suspicious-document") {
        return Some((parse_digits(digits)?, Family::Suspicious));
    }

    let (digits, tag) = base.split_once('-')?;
    let family = match tag {
        "ORIG" => Family::Original,
        "SPUN" => Family::Suspicious,
        _ => return None,
    };
    Some((parse_digits(digits)?, family))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A preprocessed document ready for shingling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name (usually the source path)
    pub name: String,
    /// Preprocessed content: words separated by whitespace, or a character stream
    pub content: String,
    /// Source identity used for pair filtering
    pub provenance: DocumentProvenance,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        provenance: DocumentProvenance,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            provenance,
        }
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spun_wikipedia_names() {
        let orig = DocumentProvenance::from_path("assets/preprocessed/339-ORIG.txt").unwrap();
        assert_eq!(orig, DocumentProvenance::new(339, Family::Original));

        let spun = DocumentProvenance::from_path("assets/preprocessed/339-SPUN.txt").unwrap();
        assert_eq!(spun, DocumentProvenance::new(339, Family::Suspicious));
        assert!(!orig.same_source(&spun));
    }

    #[test]
    fn test_pan_corpus_names() {
        let src = DocumentProvenance::from_stem("source-document00017").unwrap();
        assert_eq!(src, DocumentProvenance::new(17, Family::Original));

        let sus = DocumentProvenance::from_stem("suspicious-document123456").unwrap();
        assert_eq!(sus, DocumentProvenance::new(123_456, Family::Suspicious));
    }

    #[test]
    fn test_paraphrased_names() {
        let p = DocumentProvenance::from_path(
            "assets/paraphrased/339-ORIG/339-ORIG_paraphrased_2.txt",
        )
        .unwrap();
        assert_eq!(p, DocumentProvenance::paraphrased(339, Family::Original, 2));
        assert!(p.is_paraphrase());
        assert!(p.same_source(&DocumentProvenance::new(339, Family::Original)));
    }

    #[test]
    fn test_rejects_unknown_names() {
        for stem in ["notes", "339-COPY", "x-ORIG", "source-document", "1-ORIG_paraphrased_x"] {
            let err = DocumentProvenance::from_stem(stem).unwrap_err();
            assert!(matches!(err, Error::InvalidFileName(_)), "{stem}");
        }
    }

    #[test]
    fn test_base_name_strips_paraphrase() {
        assert_eq!(
            base_name("a/339-ORIG/339-ORIG_paraphrased_0.txt").as_deref(),
            Some("339-ORIG")
        );
        assert_eq!(base_name("a/339-SPUN.txt").as_deref(), Some("339-SPUN"));
    }
}
