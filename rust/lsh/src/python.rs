use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{LshParams, ShingleMode};
use crate::corpus::Corpus;
use crate::lsh::pair_set;
use crate::model::{Estimator, LshModel};

fn to_py_err(e: crate::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// MinHash + LSH near-duplicate model with rayon-parallel signature and banding passes
#[pyclass(name = "LshModel", module = "plagio_lsh")]
pub struct PyLshModel {
    inner: LshModel,
}

#[pymethods]
impl PyLshModel {
    #[new]
    #[pyo3(signature = (shingle_size=3, window_step=1, n_hash=100, n_bands=20, buckets=100_000, seed=42, char_based=false))]
    pub fn new(
        shingle_size: usize,
        window_step: usize,
        n_hash: usize,
        n_bands: usize,
        buckets: u64,
        seed: u64,
        char_based: bool,
    ) -> PyResult<Self> {
        let params = LshParams {
            shingle_size,
            window_step,
            n_hash,
            n_bands,
            buckets,
            seed,
            mode: if char_based {
                ShingleMode::Char
            } else {
                ShingleMode::Word
            },
        };
        let inner = LshModel::new(params).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Predict near-duplicate pairs.
    /// Returns a list of (file_name, file_name) tuples.
    pub fn predict(
        &self,
        documents: Vec<String>,
        file_names: Vec<String>,
    ) -> PyResult<Vec<(String, String)>> {
        let corpus = Corpus::from_named(file_names, documents).map_err(to_py_err)?;
        self.inner.predict_names(&corpus).map_err(to_py_err)
    }

    /// Score predictions against ground-truth index pairs.
    /// Returns (f1, precision, recall, fp, fn, tp, tn).
    pub fn score(
        &self,
        documents: Vec<String>,
        file_names: Vec<String>,
        ground_truth: Vec<(usize, usize)>,
    ) -> PyResult<(f64, f64, f64, u64, u64, u64, u64)> {
        let corpus = Corpus::from_named(file_names, documents).map_err(to_py_err)?;
        let truth = pair_set(ground_truth);
        let result = self.inner.score(&corpus, &truth).map_err(to_py_err)?;
        Ok(result.as_tuple())
    }
}
