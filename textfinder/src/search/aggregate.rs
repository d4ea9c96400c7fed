use crate::errors::{SearchError, SearchResult};
use crate::results::WorkerReport;

/// Sums per-worker counts. Addition is order-independent, so the total does not
/// depend on which worker finished first.
pub fn aggregate(local_counts: &[usize]) -> usize {
    local_counts.iter().sum()
}

/// Per-worker counts gathered after the join, indexed by worker id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub per_worker_counts: Vec<usize>,
    pub total: usize,
}

impl Aggregation {
    /// Places each report at its worker id and sums the counts.
    ///
    /// Fails if a worker reported twice, never reported, or has an unknown id;
    /// an incomplete set of reports is never turned into a total.
    pub fn collect<I>(worker_count: usize, reports: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = WorkerReport>,
    {
        let mut slots: Vec<Option<usize>> = vec![None; worker_count];
        for report in reports {
            let slot = slots.get_mut(report.worker_id).ok_or_else(|| {
                SearchError::internal(format!("unknown worker id {}", report.worker_id))
            })?;
            if slot.replace(report.local_count).is_some() {
                return Err(SearchError::internal(format!(
                    "worker {} reported twice",
                    report.worker_id
                )));
            }
        }

        let per_worker_counts = slots
            .into_iter()
            .enumerate()
            .map(|(id, count)| {
                count.ok_or_else(|| SearchError::internal(format!("worker {} never reported", id)))
            })
            .collect::<SearchResult<Vec<_>>>()?;

        Ok(Self {
            total: aggregate(&per_worker_counts),
            per_worker_counts,
        })
    }
}
