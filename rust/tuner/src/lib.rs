//! Plagio Tuner: hyperparameter search for the LSH engine.
//!
//! Samples configurations from a grid (`space`), scores each one against a
//! labelled corpus on a fixed worker pool (`tuner`) and keeps the results
//! (`report`). Sampling is seeded and the best trial is chosen by F1 with
//! ties going to the earlier sample, so a search is reproducible regardless
//! of how many workers run it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use plagio_lsh::{Corpus, GroundTruth};
//! use plagio_tuner::{SearchSpace, Tuner, TunerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (corpus, _skipped) = Corpus::load(&["data/1-ORIG.txt", "data/1-SPUN.txt"]);
//! let truth = GroundTruth::load("data/fraud_pairs.txt")?.resolve(&corpus);
//!
//! let tuner = Tuner::new(SearchSpace::default(), TunerConfig::default())?;
//! let outcome = tuner.run(&corpus, &truth)?;
//! println!("best F1 {:.3} with {:?}", outcome.best.score.f1, outcome.best.params);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod report;
pub mod space;
pub mod tuner;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn plagio_tuner(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::optimize, m)?)?;
    Ok(())
}

// Re-export main types
pub use error::{Error, Result};
pub use report::{SearchOutcome, Trial, TrialFailure};
pub use space::SearchSpace;
pub use tuner::{Tuner, TunerConfig};
