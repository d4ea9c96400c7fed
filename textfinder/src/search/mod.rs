/// Parallel substring search over an in-memory corpus.
///
/// The pieces, leaves first:
///
/// 1. **Scanner** (`scanner`): finds the non-overlapping occurrences of a literal
///    target in one line. Pure, no shared state.
/// 2. **Partition** (`partition`): line `i` belongs to worker `i % workers`. The
///    split is a function of the corpus size and worker count only.
/// 3. **Worker** (`worker`): walks its lines with a strided loop and keeps a
///    private count. Optionally forwards each match to a [`MatchSink`].
/// 4. **Aggregation** (`aggregate`): sums the per-worker counts after the join.
/// 5. **Engine** (`engine`): builds a dedicated rayon pool of exactly `workers`
///    threads, spawns one task per worker inside a scope, and aggregates once the
///    scope has returned.
///
/// ```rust,ignore
/// let corpus = Corpus::from_lines(["abcabc", "xyz", "abc", "", "abcabcabc"]);
/// let output = textfinder::search(&corpus, "abc", 2)?;
/// assert_eq!(output.total_matches, 6);
/// assert_eq!(output.per_worker_counts, vec![6, 0]);
/// ```
///
/// No worker touches a shared counter. Each task writes its report into a slot
/// it borrows exclusively, and the slots are only read after the scope ends:
/// ```rust,ignore
/// pool.scope(|s| {
///     for (worker, slot) in workers.iter().zip(slots.iter_mut()) {
///         s.spawn(move |_| *slot = Some(worker.run(sink)));
///     }
/// });
/// ```
pub mod aggregate;
pub mod engine;
pub mod partition;
pub mod scanner;
pub mod sink;
pub mod worker;

pub use aggregate::{aggregate, Aggregation};
pub use engine::{search, search_with_config, Lifecycle, SearchState, Searcher};
pub use partition::{Partition, WorkerAssignment};
pub use scanner::{count_line, line_matches, scan_line, LineMatches};
pub use sink::{CollectingSink, MatchSink, NullSink, TracingSink};
pub use worker::{CancellationToken, Worker};
