use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use plagio_lsh::{Corpus, GroundTruth};

use crate::space::SearchSpace;
use crate::tuner::{Tuner, TunerConfig};

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Random search over the default LSH grid.
/// Ground-truth pairs are file names. Returns (best_params_json, best_f1).
#[pyfunction]
#[pyo3(signature = (documents, file_names, ground_truth_pairs, n_iter=10, workers=None, seed=42))]
pub fn optimize(
    py: Python<'_>,
    documents: Vec<String>,
    file_names: Vec<String>,
    ground_truth_pairs: Vec<(String, String)>,
    n_iter: usize,
    workers: Option<usize>,
    seed: u64,
) -> PyResult<(String, f64)> {
    let corpus = Corpus::from_named(file_names, documents).map_err(to_py_err)?;
    let truth = GroundTruth::new(ground_truth_pairs).resolve(&corpus);

    let defaults = TunerConfig::default();
    let config = TunerConfig {
        workers: workers.unwrap_or(defaults.workers),
        n_iter,
        seed,
    };
    let tuner = Tuner::new(SearchSpace::default(), config).map_err(to_py_err)?;

    let outcome = py
        .allow_threads(|| tuner.run(&corpus, &truth))
        .map_err(to_py_err)?;
    let params = serde_json::to_string(&outcome.best.params).map_err(to_py_err)?;
    Ok((params, outcome.best.score.f1))
}
