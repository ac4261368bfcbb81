//! Parallel random search over LSH hyperparameters.
//!
//! A fixed rayon pool evaluates sampled configurations against one shared,
//! read-only corpus. Each task builds its own model, scores it and sends the
//! result back over a channel; the calling thread reduces the stream into a
//! running best while tasks are still in flight.

use rayon::ThreadPoolBuilder;
use std::sync::mpsc;
use std::thread;
use tracing::{info, warn};

use plagio_lsh::{Corpus, Estimator, LshModel, LshParams, PairSet, ScoreResult};

use crate::error::{Error, Result};
use crate::report::{SearchOutcome, Trial, TrialFailure};
use crate::space::SearchSpace;

/// Configuration for a search run.
#[derive(Debug, Clone)]
pub struct TunerConfig {
    /// Worker threads in the evaluation pool
    pub workers: usize,
    /// Configurations to sample from the space
    pub n_iter: usize,
    /// Seed for sampling configurations
    pub seed: u64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| (n.get() / 2).max(1))
            .unwrap_or(1);
        Self {
            workers,
            n_iter: 10,
            seed: 42,
        }
    }
}

type Message = (usize, LshParams, plagio_lsh::Result<ScoreResult>);

/// Random-search tuner.
pub struct Tuner {
    space: SearchSpace,
    config: TunerConfig,
}

impl Tuner {
    pub fn new(space: SearchSpace, config: TunerConfig) -> Result<Self> {
        space.validate()?;
        if config.n_iter == 0 {
            return Err(Error::InvalidSpace("n_iter must be >= 1".into()));
        }
        Ok(Self { space, config })
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Evaluate sampled configurations and return the best one.
    ///
    /// The best trial has the highest F1; ties go to the lower sample index.
    pub fn run(&self, corpus: &Corpus, ground_truth: &PairSet) -> Result<SearchOutcome> {
        let candidates = self.space.sample(self.config.n_iter, self.config.seed);
        let workers = self.config.workers.max(1);
        info!(
            configurations = candidates.len(),
            grid = self.space.len(),
            workers,
            documents = corpus.len(),
            "starting hyperparameter search"
        );

        let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
        let (tx, rx) = mpsc::channel::<Message>();

        let (best, mut trials, mut failures) = thread::scope(|s| {
            // Dispatcher: blocks on the pool so the caller can drain the channel.
            s.spawn(move || {
                pool.scope(|ps| {
                    for (index, params) in candidates.into_iter().enumerate() {
                        let tx = tx.clone();
                        ps.spawn(move |_| {
                            let result = evaluate(&params, corpus, ground_truth);
                            // The receiver outlives every sender.
                            let _ = tx.send((index, params, result));
                        });
                    }
                });
            });

            let mut best: Option<Trial> = None;
            let mut trials = Vec::new();
            let mut failures = Vec::new();
            for (index, params, result) in rx {
                match result {
                    Ok(score) => {
                        let trial = Trial {
                            index,
                            params,
                            score,
                        };
                        let improved = best
                            .as_ref()
                            .map_or(true, |b| trial.rank_cmp(b).is_lt());
                        if improved {
                            info!(
                                index,
                                f1 = trial.score.f1,
                                precision = trial.score.precision,
                                recall = trial.score.recall,
                                params = ?trial.params,
                                "new best configuration"
                            );
                            best = Some(trial.clone());
                        }
                        trials.push(trial);
                    }
                    Err(e) => {
                        warn!(index, params = ?params, error = %e, "configuration failed");
                        failures.push(TrialFailure {
                            index,
                            params,
                            error: e.to_string(),
                        });
                    }
                }
            }
            (best, trials, failures)
        });

        trials.sort_by_key(|t| t.index);
        failures.sort_by_key(|f| f.index);

        let best = best.ok_or(Error::NoSuccessfulTrial {
            failures: failures.len(),
        })?;
        info!(
            f1 = best.score.f1,
            trials = trials.len(),
            failures = failures.len(),
            "search complete"
        );
        Ok(SearchOutcome {
            best,
            trials,
            failures,
        })
    }
}

fn evaluate(
    params: &LshParams,
    corpus: &Corpus,
    ground_truth: &PairSet,
) -> plagio_lsh::Result<ScoreResult> {
    let model = LshModel::new(params.clone())?;
    model.score(corpus, ground_truth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plagio_lsh::{pair_set, Document, DocumentProvenance, Family, ShingleMode};

    fn corpus() -> Corpus {
        let essay = "the treaty of westphalia ended decades of war in central europe \
                     and established the principle of state sovereignty for the continent";
        let spun = "the treaty of westphalia concluded decades of war in central europe \
                    and established the principle of state sovereignty for the continent";
        let other = "photosynthesis converts light energy into chemical energy stored \
                     in glucose molecules inside the chloroplasts of plant cells";
        Corpus::new(vec![
            Document::new("1-ORIG", essay, DocumentProvenance::new(1, Family::Original)),
            Document::new("1-SPUN", spun, DocumentProvenance::new(1, Family::Suspicious)),
            Document::new("2-ORIG", other, DocumentProvenance::new(2, Family::Original)),
        ])
    }

    fn space() -> SearchSpace {
        SearchSpace {
            shingle_size: vec![1, 2, 3],
            window_step: vec![1, 2],
            n_hash: vec![40, 80],
            n_bands: vec![10, 20],
            buckets: vec![1 << 30],
            mode: ShingleMode::Word,
            seed: 11,
        }
    }

    fn config(workers: usize) -> TunerConfig {
        TunerConfig {
            workers,
            n_iter: 8,
            seed: 3,
        }
    }

    #[test]
    fn test_run_finds_best_trial() {
        let truth = pair_set([(0, 1)]);
        let tuner = Tuner::new(space(), config(2)).unwrap();
        let outcome = tuner.run(&corpus(), &truth).unwrap();

        assert_eq!(outcome.trials.len(), 8);
        assert!(outcome.failures.is_empty());
        let indices: Vec<usize> = outcome.trials.iter().map(|t| t.index).collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());

        let max_f1 = outcome
            .trials
            .iter()
            .map(|t| t.score.f1)
            .fold(f64::MIN, f64::max);
        assert_eq!(outcome.best.score.f1, max_f1);
        assert_eq!(outcome.top(1)[0], &outcome.best);
    }

    #[test]
    fn test_result_independent_of_worker_count() {
        let truth = pair_set([(0, 1)]);
        let corpus = corpus();
        let single = Tuner::new(space(), config(1))
            .unwrap()
            .run(&corpus, &truth)
            .unwrap();
        let many = Tuner::new(space(), config(4))
            .unwrap()
            .run(&corpus, &truth)
            .unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn test_all_failures_is_an_error() {
        // Bypasses validation: 30 hashes cannot be split into 20 bands.
        let tuner = Tuner {
            space: SearchSpace {
                n_hash: vec![30],
                n_bands: vec![20],
                ..space()
            },
            config: config(2),
        };
        let err = tuner.run(&corpus(), &pair_set([(0, 1)])).unwrap_err();
        assert!(matches!(err, Error::NoSuccessfulTrial { failures: 6 }));
    }

    #[test]
    fn test_new_rejects_invalid_space() {
        let bad = SearchSpace {
            n_hash: vec![30],
            ..space()
        };
        assert!(Tuner::new(bad, TunerConfig::default()).is_err());
        let zero = TunerConfig {
            n_iter: 0,
            ..TunerConfig::default()
        };
        assert!(Tuner::new(space(), zero).is_err());
    }
}
