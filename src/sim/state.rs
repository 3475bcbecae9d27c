use crossbeam::channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::sim::signals;

/// One occupied chair: the client id, how long its service takes, and the
/// send halves of the two one-shot signals tied to this seating.
pub struct SeatedClient {
    pub client_id: u32,
    pub service_minutes: u64,
    pub seat_released_tx: Sender<()>,
    pub service_complete_tx: Sender<()>,
}

/// What a client gets back from a successful `try_enter`: the receive halves
/// of its one-shot signals, consumed exactly once, plus whether this seating
/// turned an empty area non-empty (the cue to wake the provider).
pub struct SeatHandles {
    pub seat_released: Receiver<()>,
    pub service_complete: Receiver<()>,
    pub was_first_occupant: bool,
}

struct StateInner {
    waiting: VecDeque<SeatedClient>,
    chair_count: usize,
    total_wait: Duration,
    total_arrival_attempts: u64,
    total_no_chair_retries: u64,
    seating_order: Vec<u32>,
    service_order: Vec<u32>,
    max_occupancy: usize,
}

/// All mutable shared memory of the simulation behind one mutex. Cheap to
/// clone; every agent and the provider hold a handle.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<StateInner>>,
}

impl SharedState {
    pub fn new(chair_count: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StateInner {
                waiting: VecDeque::with_capacity(chair_count),
                chair_count,
                total_wait: Duration::ZERO,
                total_arrival_attempts: 0,
                total_no_chair_retries: 0,
                seating_order: Vec::new(),
                service_order: Vec::new(),
                max_occupancy: 0,
            })),
        }
    }

    /// Attempt to take a chair. Rejection (area full) returns `None`; the
    /// check, the seating, and the signal-pair creation happen as one
    /// atomic step under the lock.
    pub fn try_enter(&self, client_id: u32, service_minutes: u64) -> Option<SeatHandles> {
        let mut inner = self.inner.lock();
        if inner.waiting.len() >= inner.chair_count {
            return None;
        }
        debug_assert!(
            !inner.waiting.iter().any(|e| e.client_id == client_id),
            "client {} already seated",
            client_id
        );

        let (seat_released_tx, seat_released) = signals::one_shot();
        let (service_complete_tx, service_complete) = signals::one_shot();
        inner.waiting.push_back(SeatedClient {
            client_id,
            service_minutes,
            seat_released_tx,
            service_complete_tx,
        });
        inner.seating_order.push(client_id);

        let occupancy = inner.waiting.len();
        inner.max_occupancy = inner.max_occupancy.max(occupancy);

        Some(SeatHandles {
            seat_released,
            service_complete,
            was_first_occupant: occupancy == 1,
        })
    }

    /// Remove the FIFO head of the waiting area. Provider-only; the dequeue
    /// sequence is the service order.
    pub fn dequeue_next(&self) -> Option<SeatedClient> {
        let mut inner = self.inner.lock();
        let entry = inner.waiting.pop_front()?;
        inner.service_order.push(entry.client_id);
        Some(entry)
    }

    pub fn occupancy(&self) -> usize {
        self.inner.lock().waiting.len()
    }

    /// Fold one client's measured wait into the aggregate.
    pub fn add_wait(&self, wait: Duration) {
        self.inner.lock().total_wait += wait;
    }

    /// Fold one terminating client's attempt and retry counts into the
    /// aggregate.
    pub fn fold_client_totals(&self, attempts: u64, retries: u64) {
        let mut inner = self.inner.lock();
        inner.total_arrival_attempts += attempts;
        inner.total_no_chair_retries += retries;
    }

    /// Final read of the accumulators, taken after every thread has joined.
    pub fn snapshot(&self) -> StateSnapshot {
        let inner = self.inner.lock();
        StateSnapshot {
            total_wait: inner.total_wait,
            total_arrival_attempts: inner.total_arrival_attempts,
            total_no_chair_retries: inner.total_no_chair_retries,
            seating_order: inner.seating_order.clone(),
            service_order: inner.service_order.clone(),
            max_occupancy: inner.max_occupancy,
        }
    }
}

/// Immutable copy of the aggregate counters and order traces.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub total_wait: Duration,
    pub total_arrival_attempts: u64,
    pub total_no_chair_retries: u64,
    pub seating_order: Vec<u32>,
    pub service_order: Vec<u32>,
    pub max_occupancy: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_when_full() {
        let state = SharedState::new(2);
        assert!(state.try_enter(1, 5).is_some());
        assert!(state.try_enter(2, 5).is_some());
        assert!(state.try_enter(3, 5).is_none());
        assert_eq!(state.occupancy(), 2);
    }

    #[test]
    fn first_occupant_flag_tracks_empty_to_nonempty() {
        let state = SharedState::new(3);
        let h1 = state.try_enter(1, 5).unwrap();
        let h2 = state.try_enter(2, 5).unwrap();
        assert!(h1.was_first_occupant);
        assert!(!h2.was_first_occupant);

        // Drain completely; the next seating is a first occupant again
        state.dequeue_next().unwrap();
        state.dequeue_next().unwrap();
        let h3 = state.try_enter(3, 5).unwrap();
        assert!(h3.was_first_occupant);
    }

    #[test]
    fn dequeue_preserves_seating_order() {
        let state = SharedState::new(3);
        for id in [4, 9, 2] {
            state.try_enter(id, 1).unwrap();
        }
        let drained: Vec<u32> = std::iter::from_fn(|| state.dequeue_next())
            .map(|e| e.client_id)
            .collect();
        assert_eq!(drained, vec![4, 9, 2]);

        let snap = state.snapshot();
        assert_eq!(snap.seating_order, snap.service_order);
    }

    #[test]
    fn max_occupancy_is_a_high_water_mark() {
        let state = SharedState::new(3);
        state.try_enter(1, 1).unwrap();
        state.try_enter(2, 1).unwrap();
        state.dequeue_next().unwrap();
        state.dequeue_next().unwrap();
        state.try_enter(3, 1).unwrap();
        assert_eq!(state.snapshot().max_occupancy, 2);
    }

    #[test]
    fn counters_accumulate() {
        let state = SharedState::new(3);
        state.add_wait(Duration::from_millis(30));
        state.add_wait(Duration::from_millis(70));
        state.fold_client_totals(2, 1);
        state.fold_client_totals(1, 0);

        let snap = state.snapshot();
        assert_eq!(snap.total_wait, Duration::from_millis(100));
        assert_eq!(snap.total_arrival_attempts, 3);
        assert_eq!(snap.total_no_chair_retries, 1);
    }
}
