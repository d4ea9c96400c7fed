use std::iter::StepBy;
use std::ops::Range;

use crate::errors::{SearchError, SearchResult};

/// Round-robin assignment of line indices to workers.
///
/// Line `i` belongs to worker `i % worker_count`. The split depends only on the
/// corpus size and the worker count, never on scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    line_count: usize,
    worker_count: usize,
}

/// Materialized form of a [`Partition`]: owned line indices per worker id
pub type WorkerAssignment = Vec<Vec<usize>>;

impl Partition {
    pub fn new(line_count: usize, worker_count: usize) -> SearchResult<Self> {
        if worker_count == 0 {
            return Err(SearchError::invalid_argument(
                "worker count must be at least 1",
            ));
        }
        Ok(Self {
            line_count,
            worker_count,
        })
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Worker that owns a 0-based line index
    pub fn owner_of(&self, line_index: usize) -> usize {
        line_index % self.worker_count
    }

    /// Strided iterator over the line indices a worker owns.
    ///
    /// Yields nothing for workers beyond the line count.
    pub fn lines_for(&self, worker_id: usize) -> StepBy<Range<usize>> {
        let start = worker_id.min(self.line_count);
        (start..self.line_count).step_by(self.worker_count)
    }

    /// Number of lines a worker owns, without iterating
    pub fn len_for(&self, worker_id: usize) -> usize {
        if worker_id >= self.line_count {
            0
        } else {
            (self.line_count - worker_id).div_ceil(self.worker_count)
        }
    }

    /// Builds the full per-worker index lists
    pub fn assignment(&self) -> WorkerAssignment {
        let mut assignment: WorkerAssignment = (0..self.worker_count)
            .map(|w| Vec::with_capacity(self.len_for(w)))
            .collect();
        for line_index in 0..self.line_count {
            assignment[self.owner_of(line_index)].push(line_index);
        }
        assignment
    }
}
