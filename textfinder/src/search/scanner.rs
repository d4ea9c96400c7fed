use std::str::MatchIndices;

use crate::errors::{SearchError, SearchResult};

/// Lazy iterator over the 1-indexed columns of non-overlapping matches in a line.
///
/// After a match at byte `p` the scan resumes at `p + target.len()`, so
/// `"aaaa"` searched for `"aa"` yields columns 1 and 3, never 2.
#[derive(Debug, Clone)]
pub struct LineMatches<'a> {
    inner: MatchIndices<'a, &'a str>,
}

impl Iterator for LineMatches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.inner.next().map(|(pos, _)| pos + 1)
    }
}

/// Ensures a target can be scanned for. An empty target would match everywhere.
pub fn validate_target(target: &str) -> SearchResult<()> {
    if target.is_empty() {
        return Err(SearchError::invalid_argument("target must not be empty"));
    }
    Ok(())
}

/// Returns a lazy iterator over match columns of `target` in `line`
pub fn line_matches<'a>(line: &'a str, target: &'a str) -> SearchResult<LineMatches<'a>> {
    validate_target(target)?;
    Ok(LineMatches {
        inner: line.match_indices(target),
    })
}

/// Scans one line and collects the 1-indexed columns of every non-overlapping match
pub fn scan_line(line: &str, target: &str) -> SearchResult<Vec<usize>> {
    Ok(line_matches(line, target)?.collect())
}

/// Counts non-overlapping matches without allocating
pub fn count_line(line: &str, target: &str) -> SearchResult<usize> {
    Ok(line_matches(line, target)?.count())
}
