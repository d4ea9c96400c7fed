use std::sync::Mutex;
use tracing::info;

use crate::results::MatchEvent;

/// Receives match events from workers.
///
/// Several workers call `on_match` concurrently; implementations serialize
/// their own writes. Events are for observation only and never feed back into
/// the counts.
pub trait MatchSink: Send + Sync {
    fn on_match(&self, event: MatchEvent);

    /// Whether events should be built at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MatchSink for NullSink {
    fn on_match(&self, _event: MatchEvent) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Logs one `info` event per match, stamped with its capture time.
///
/// The stamp is the event's `SystemTime` as RFC 3339 in UTC with millisecond
/// precision, e.g. `2024-05-01T09:30:12.045Z`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    target: String,
}

impl TracingSink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

pub(crate) fn format_event(target: &str, event: &MatchEvent) -> String {
    format!(
        "{} Worker {} has found '{}' at line {} position {}",
        humantime::format_rfc3339_millis(event.timestamp),
        event.worker_id,
        target,
        event.line_number,
        event.column
    )
}

impl MatchSink for TracingSink {
    fn on_match(&self, event: MatchEvent) {
        info!("{}", format_event(&self.target, &event));
    }
}

/// Buffers events in memory, in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<MatchEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the collected events, sorted by line then column
    pub fn into_sorted(self) -> Vec<MatchEvent> {
        let mut events = self
            .events
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        events.sort_by_key(|e| (e.line_number, e.column));
        events
    }
}

impl MatchSink for CollectingSink {
    fn on_match(&self, event: MatchEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
