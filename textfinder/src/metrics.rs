use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::corpus::{LARGE_CORPUS_THRESHOLD, SMALL_CORPUS_THRESHOLD};

/// Tracks throughput counters for corpus loading and searching.
///
/// Workers publish to these once, when they finish, never per match.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Scan metrics
    lines_scanned: Arc<AtomicU64>,
    bytes_scanned: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,
    workers_completed: Arc<AtomicU64>,
    searches_completed: Arc<AtomicU64>,

    // Corpus loading metrics
    small_corpora_loaded: Arc<AtomicU64>,
    buffered_corpora_loaded: Arc<AtomicU64>,
    mmap_corpora_loaded: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            lines_scanned: Arc::new(AtomicU64::new(0)),
            bytes_scanned: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
            workers_completed: Arc::new(AtomicU64::new(0)),
            searches_completed: Arc::new(AtomicU64::new(0)),
            small_corpora_loaded: Arc::new(AtomicU64::new(0)),
            buffered_corpora_loaded: Arc::new(AtomicU64::new(0)),
            mmap_corpora_loaded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a finished worker
    pub fn record_worker(&self, lines: u64, bytes: u64, matches: u64) {
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
        self.bytes_scanned.fetch_add(bytes, Ordering::Relaxed);
        self.matches_found.fetch_add(matches, Ordering::Relaxed);
        let done = self.workers_completed.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Worker finished: {} lines, {} bytes, {} matches ({} workers done)",
            lines, bytes, matches, done
        );
    }

    /// Records a completed search
    pub fn record_search(&self) {
        self.searches_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records which loading strategy a corpus of the given size used
    pub fn record_corpus_load(&self, size: u64) {
        if size < SMALL_CORPUS_THRESHOLD {
            self.small_corpora_loaded.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_CORPUS_THRESHOLD {
            self.mmap_corpora_loaded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_corpora_loaded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            workers_completed: self.workers_completed.load(Ordering::Relaxed),
            searches_completed: self.searches_completed.load(Ordering::Relaxed),
            small_corpora: self.small_corpora_loaded.load(Ordering::Relaxed),
            buffered_corpora: self.buffered_corpora_loaded.load(Ordering::Relaxed),
            mmap_corpora: self.mmap_corpora_loaded.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Lines scanned: {}\n\
             Bytes scanned: {}\n\
             Matches found: {}\n\
             Workers completed: {}\n\
             Searches completed: {}\n\
             Corpora loaded (small/buffered/mmap): {}/{}/{}",
            stats.lines_scanned,
            stats.bytes_scanned,
            stats.matches_found,
            stats.workers_completed,
            stats.searches_completed,
            stats.small_corpora,
            stats.buffered_corpora,
            stats.mmap_corpora
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub lines_scanned: u64,
    pub bytes_scanned: u64,
    pub matches_found: u64,
    pub workers_completed: u64,
    pub searches_completed: u64,
    pub small_corpora: u64,
    pub buffered_corpora: u64,
    pub mmap_corpora: u64,
}
