use crossbeam::channel::Receiver;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SimulationConfig;
use crate::sim::state::SharedState;

/// Provider-side accounting. Written only by the provider thread and read
/// after it has joined.
pub struct ProviderStats {
    pub served: AtomicU64,
    pub idle_nanos: AtomicU64,
    pub active_nanos: AtomicU64,
}

impl ProviderStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            served: AtomicU64::new(0),
            idle_nanos: AtomicU64::new(0),
            active_nanos: AtomicU64::new(0),
        })
    }

    pub fn idle(&self) -> Duration {
        Duration::from_nanos(self.idle_nanos.load(Ordering::Relaxed))
    }

    pub fn active(&self) -> Duration {
        Duration::from_nanos(self.active_nanos.load(Ordering::Relaxed))
    }
}

/// Spawn the provider coordinator thread.
///
/// The provider blocks on the wake channel while the waiting area is empty
/// (that blocked time is the idle time, and nothing else is), then drains
/// the area in FIFO order: release the head client, sleep its service
/// duration, signal completion.  It exits once `total_clients` have been
/// served.
pub fn spawn_provider_thread(
    state: SharedState,
    wake_rx: Receiver<()>,
    cfg: SimulationConfig,
    total_clients: u64,
) -> io::Result<(thread::JoinHandle<()>, Arc<ProviderStats>)> {
    let stats = ProviderStats::new();
    let stats_clone = stats.clone();

    let handle = thread::Builder::new().name("provider".into()).spawn(move || {
        let start = Instant::now();
        let mut served = 0u64;
        let mut idle = Duration::ZERO;
        log::info!("provider is now available");

        while served < total_clients {
            let idle_start = Instant::now();
            if wake_rx.recv().is_err() {
                // Every client agent has exited; nothing left to serve.
                log::warn!(
                    "wake channel closed with {}/{} clients served",
                    served,
                    total_clients
                );
                break;
            }
            idle += idle_start.elapsed();

            while let Some(entry) = state.dequeue_next() {
                if entry.seat_released_tx.send(()).is_err() {
                    log::warn!("client {} gone before release", entry.client_id);
                }
                thread::sleep(cfg.minutes(entry.service_minutes));
                served += 1;
                if entry.service_complete_tx.send(()).is_err() {
                    log::warn!("client {} gone before completion", entry.client_id);
                }
                log::debug!(
                    "finished serving client {} ({} min), {} served total",
                    entry.client_id,
                    entry.service_minutes,
                    served
                );
            }
        }

        stats_clone.served.store(served, Ordering::Relaxed);
        stats_clone
            .idle_nanos
            .store(idle.as_nanos() as u64, Ordering::Relaxed);
        stats_clone
            .active_nanos
            .store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
        log::info!("provider is done, {} clients served", served);
    })?;

    Ok((handle, stats))
}
