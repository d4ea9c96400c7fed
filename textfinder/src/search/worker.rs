use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

use super::partition::Partition;
use super::scanner::{line_matches, validate_target};
use super::sink::MatchSink;
use crate::corpus::Corpus;
use crate::errors::{SearchError, SearchResult};
use crate::results::{MatchEvent, WorkerReport};

/// Cooperative cancellation flag, checked by workers between lines
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Scans the lines one worker owns.
///
/// A worker only reads the corpus and only writes its own counter, so workers
/// never wait on each other.
#[derive(Debug, Clone, Copy)]
pub struct Worker<'a> {
    id: usize,
    partition: Partition,
    corpus: &'a Corpus,
    target: &'a str,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        partition: Partition,
        corpus: &'a Corpus,
        target: &'a str,
    ) -> SearchResult<Self> {
        validate_target(target)?;
        if id >= partition.worker_count() {
            return Err(SearchError::invalid_argument(format!(
                "worker id {} out of range for {} workers",
                id,
                partition.worker_count()
            )));
        }
        Ok(Self {
            id,
            partition,
            corpus,
            target,
            cancel: None,
        })
    }

    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs the strided scan and returns the worker's local totals
    pub fn run(&self, sink: &dyn MatchSink) -> SearchResult<WorkerReport> {
        let emit = sink.is_enabled();
        let mut report = WorkerReport {
            worker_id: self.id,
            ..Default::default()
        };

        for line_index in self.partition.lines_for(self.id) {
            if self.cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!("Worker {} cancelled at line {}", self.id, line_index + 1);
                return Err(SearchError::Cancelled);
            }

            let line = self.corpus.line(line_index).ok_or_else(|| {
                SearchError::internal(format!(
                    "line {} outside corpus of {} lines",
                    line_index,
                    self.corpus.len()
                ))
            })?;

            for column in line_matches(line, self.target)? {
                report.local_count += 1;
                if emit {
                    sink.on_match(MatchEvent {
                        worker_id: self.id,
                        line_number: line_index + 1,
                        column,
                        timestamp: SystemTime::now(),
                    });
                }
            }

            report.lines_scanned += 1;
            report.bytes_scanned += line.len();
        }

        trace!(
            "Worker {} scanned {} lines ({} bytes)",
            self.id,
            report.lines_scanned,
            report.bytes_scanned
        );
        Ok(report)
    }
}
