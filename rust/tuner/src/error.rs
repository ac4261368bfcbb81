//! Errors raised by the hyperparameter search.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Building or validating a model failed.
    #[error(transparent)]
    Lsh(#[from] plagio_lsh::Error),

    /// A parameter list in the search space has no values.
    #[error("search space has no values for {0}")]
    EmptySearchSpace(&'static str),

    /// The search space contains a combination no model can be built from.
    #[error("invalid search space: {0}")]
    InvalidSpace(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Every sampled configuration failed.
    #[error("all {failures} configurations failed")]
    NoSuccessfulTrial { failures: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
