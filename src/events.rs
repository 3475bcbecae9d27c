use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// One arrival attempt, served or turned away. Timestamps are offsets from
/// simulation start; rendering them is the caller's concern.
#[derive(Debug, Clone, Copy)]
pub struct VisitEvent {
    pub client_id: u32,
    pub arrived_at: Duration,
    pub left_at: Duration,
    pub served: bool,
}

/// Shared append-only log of visit events, written by client agents and read
/// in full once the run is over.
#[derive(Clone)]
pub struct EventLog {
    entries: Arc<RwLock<Vec<VisitEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn record(&self, event: VisitEvent) {
        self.entries.write().push(event);
    }

    pub fn read_all(&self) -> Vec<VisitEvent> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
