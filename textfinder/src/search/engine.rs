use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::aggregate::Aggregation;
use super::partition::Partition;
use super::scanner::validate_target;
use super::sink::{MatchSink, NullSink, TracingSink};
use super::worker::{CancellationToken, Worker};
use crate::config::SearchConfig;
use crate::corpus::{Corpus, CorpusLoader};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::{SearchResult as SearchOutput, WorkerReport};

/// Lifecycle of a single search call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Partitioning,
    Running { workers: usize },
    Joining,
    Aggregating,
    Complete,
    Failed,
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    fn can_advance_to(&self, next: &SearchState) -> bool {
        use SearchState::*;
        match (self, next) {
            (current, Failed) => !current.is_terminal(),
            (Idle, Partitioning) => true,
            (Partitioning, Running { .. }) => true,
            (Running { .. }, Joining) => true,
            (Joining, Aggregating) => true,
            (Aggregating, Complete) => true,
            _ => false,
        }
    }
}

/// Records and checks state transitions for one search
#[derive(Debug)]
pub struct Lifecycle {
    state: SearchState,
    history: Vec<SearchState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            history: vec![SearchState::Idle],
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn history(&self) -> &[SearchState] {
        &self.history
    }

    pub fn advance(&mut self, next: SearchState) -> SearchResult<()> {
        if !self.state.can_advance_to(&next) {
            return Err(SearchError::internal(format!(
                "illegal search transition {:?} -> {:?}",
                self.state, next
            )));
        }
        debug!("Search state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Moves to `Failed` and hands the error back for propagation
    pub fn fail(&mut self, err: SearchError) -> SearchError {
        if !self.state.is_terminal() {
            warn!("Search failed in state {:?}: {}", self.state, err);
            self.state = SearchState::Failed;
            self.history.push(SearchState::Failed);
        }
        err
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates one parallel search: validates, partitions, runs the workers on a
/// dedicated pool, waits for all of them, then aggregates.
pub struct Searcher<'a> {
    worker_count: usize,
    sink: &'a dyn MatchSink,
    cancel: Option<&'a CancellationToken>,
    metrics: SearchMetrics,
}

impl<'a> Searcher<'a> {
    pub fn new(worker_count: usize) -> Self {
        Self {
            worker_count,
            sink: &NullSink,
            cancel: None,
            metrics: SearchMetrics::new(),
        }
    }

    /// Sends a [`MatchEvent`](crate::results::MatchEvent) to `sink` for every match
    pub fn with_sink(mut self, sink: &'a dyn MatchSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_metrics(mut self, metrics: SearchMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Counts non-overlapping occurrences of `target` across the corpus
    pub fn search(&self, corpus: &Corpus, target: &str) -> SearchResult<SearchOutput> {
        let mut lifecycle = Lifecycle::new();
        self.search_tracked(corpus, target, &mut lifecycle)
    }

    /// Like [`Searcher::search`], recording every state it passes through
    pub fn search_tracked(
        &self,
        corpus: &Corpus,
        target: &str,
        lifecycle: &mut Lifecycle,
    ) -> SearchResult<SearchOutput> {
        match self.drive(corpus, target, lifecycle) {
            Ok(output) => Ok(output),
            Err(err) => Err(lifecycle.fail(err)),
        }
    }

    fn drive(
        &self,
        corpus: &Corpus,
        target: &str,
        lifecycle: &mut Lifecycle,
    ) -> SearchResult<SearchOutput> {
        debug!(
            "Searching for '{}' in {} lines using {} workers",
            target,
            corpus.len(),
            self.worker_count
        );

        validate_target(target)?;
        let partition = Partition::new(corpus.len(), self.worker_count)?;
        lifecycle.advance(SearchState::Partitioning)?;

        let workers = (0..self.worker_count)
            .map(|id| {
                let worker = Worker::new(id, partition, corpus, target)?;
                Ok(match self.cancel {
                    Some(token) => worker.with_cancellation(token),
                    None => worker,
                })
            })
            .collect::<SearchResult<Vec<_>>>()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .thread_name(|i| format!("textfinder-worker-{}", i))
            .build()
            .map_err(|e| {
                SearchError::invalid_argument(format!(
                    "cannot start {} workers: {}",
                    self.worker_count, e
                ))
            })?;

        // One slot per worker; each is written only by its owner and read after the join
        let mut slots: Vec<Option<SearchResult<WorkerReport>>> =
            (0..self.worker_count).map(|_| None).collect();

        lifecycle.advance(SearchState::Running {
            workers: self.worker_count,
        })?;
        let start = Instant::now();
        let sink = self.sink;

        let joined = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.scope(|s| {
                for (worker, slot) in workers.iter().zip(slots.iter_mut()) {
                    s.spawn(move |_| {
                        *slot = Some(worker.run(sink));
                    });
                }
            })
        }));
        let elapsed = start.elapsed();
        lifecycle.advance(SearchState::Joining)?;

        if let Err(payload) = joined {
            return Err(SearchError::internal(format!(
                "worker panicked: {}",
                panic_message(payload.as_ref())
            )));
        }

        // A failed search publishes nothing, so every slot is checked before any metric
        let reports = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| {
                slot.unwrap_or_else(|| {
                    Err(SearchError::internal(format!("worker {} never reported", id)))
                })
            })
            .collect::<SearchResult<Vec<_>>>()?;
        for report in &reports {
            debug!(
                "Worker {} has finished running. Found {} instances in {} lines.",
                report.worker_id, report.local_count, report.lines_scanned
            );
            self.metrics.record_worker(
                report.lines_scanned as u64,
                report.bytes_scanned as u64,
                report.local_count as u64,
            );
        }

        lifecycle.advance(SearchState::Aggregating)?;
        let aggregation = Aggregation::collect(self.worker_count, reports)?;

        let output = SearchOutput {
            total_matches: aggregation.total,
            per_worker_counts: aggregation.per_worker_counts,
            lines_searched: corpus.len(),
            worker_count: self.worker_count,
            elapsed,
        };
        lifecycle.advance(SearchState::Complete)?;
        self.metrics.record_search();

        info!(
            "Search complete. Found {} matches in {} lines in {:?}",
            output.total_matches, output.lines_searched, output.elapsed
        );
        Ok(output)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Searches `corpus` for `target` with `worker_count` workers and no event sink
pub fn search(corpus: &Corpus, target: &str, worker_count: usize) -> SearchResult<SearchOutput> {
    Searcher::new(worker_count).search(corpus, target)
}

/// Loads the corpus named by `config` and searches it.
///
/// Corpus loading happens before any worker exists; a load failure is returned
/// as [`SearchError::CorpusUnavailable`].
pub fn search_with_config(config: &SearchConfig) -> SearchResult<SearchOutput> {
    validate_target(&config.target)?;
    let path = config
        .corpus_path
        .as_deref()
        .ok_or_else(|| SearchError::invalid_argument("no corpus path given"))?;

    info!(
        "Searching for '{}' in file '{}' using {} workers...",
        config.target,
        path.display(),
        config.worker_count
    );

    let metrics = SearchMetrics::new();
    let corpus = CorpusLoader::with_metrics(config.encoding_mode, metrics.clone()).load(path)?;

    let tracing_sink = TracingSink::new(config.target.as_str());
    let sink: &dyn MatchSink = if config.log_matches {
        &tracing_sink
    } else {
        &NullSink
    };

    let output = Searcher::new(config.worker_count)
        .with_sink(sink)
        .with_metrics(metrics.clone())
        .search(&corpus, &config.target)?;

    metrics.log_stats();
    Ok(output)
}
