/// Result types produced by a search.
///
/// [`WorkerReport`] is what a single worker hands back when it finishes; it is
/// owned by that worker until the join. [`SearchResult`] is assembled once, after
/// every worker has reported, and is never mutated afterwards.
use serde::{Serialize, Serializer};
use std::time::{Duration, SystemTime};

/// A single located occurrence of the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Worker that found the match
    pub worker_id: usize,
    /// 1-indexed line number within the corpus
    pub line_number: usize,
    /// 1-indexed byte column within the line
    pub column: usize,
    /// Capture time
    pub timestamp: SystemTime,
}

/// What one worker publishes when it finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    /// Matches found in the worker's lines
    pub local_count: usize,
    /// Lines the worker owned and scanned
    pub lines_scanned: usize,
    /// Bytes of line content scanned
    pub bytes_scanned: usize,
}

/// The complete, immutable outcome of a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Total number of matches across all workers
    pub total_matches: usize,
    /// Match counts indexed by worker id
    pub per_worker_counts: Vec<usize>,
    /// Number of lines in the corpus
    pub lines_searched: usize,
    /// Number of workers that ran
    pub worker_count: usize,
    /// Wall-clock time from spawning the workers to the join
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl SearchResult {
    /// Count reported by a given worker
    pub fn worker_count_of(&self, worker_id: usize) -> Option<usize> {
        self.per_worker_counts.get(worker_id).copied()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
