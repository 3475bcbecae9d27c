//! Final-report computation over the simulation's terminal state.

use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SimulationConfig;
use crate::sim::provider::ProviderStats;
use crate::sim::state::StateSnapshot;

/// Thread-safe histogram of individual client wait samples.
#[derive(Clone)]
pub struct WaitMetrics {
    hist: Arc<Mutex<Histogram<u64>>>,
}

impl WaitMetrics {
    pub fn new() -> Self {
        Self {
            hist: Arc::new(Mutex::new(Histogram::new(3).unwrap())),
        }
    }

    pub fn record(&self, wait: Duration) {
        self.hist.lock().record(wait.as_nanos() as u64).ok();
    }

    pub fn sample_count(&self) -> u64 {
        self.hist.lock().len()
    }

    pub fn p50(&self) -> Duration {
        Duration::from_nanos(self.hist.lock().value_at_quantile(0.5))
    }

    pub fn p99(&self) -> Duration {
        Duration::from_nanos(self.hist.lock().value_at_quantile(0.99))
    }
}

impl Default for WaitMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// The run's derived statistics. Averages are in simulated minutes.
#[derive(Debug, Clone)]
pub struct FinalReport {
    pub busy_percent: f64,
    pub avg_wait_minutes: f64,
    pub avg_retries: f64,
    pub clients_served: u64,
    pub total_arrival_attempts: u64,
    pub total_no_chair_retries: u64,
    pub idle_time: Duration,
    pub active_time: Duration,
    pub wait_p50: Duration,
    pub wait_p99: Duration,
}

/// Pure computation over the final counters; every writer has joined by the
/// time this runs, so no locking discipline applies.
pub fn compute_report(
    snapshot: &StateSnapshot,
    provider: &ProviderStats,
    total_clients: u64,
    cfg: &SimulationConfig,
    waits: &WaitMetrics,
) -> FinalReport {
    let idle = provider.idle();
    let active = provider.active();

    let busy_percent = if active.is_zero() {
        0.0
    } else {
        ((1.0 - idle.as_secs_f64() / active.as_secs_f64()) * 100.0).clamp(0.0, 100.0)
    };

    let minute_secs = cfg.minute().as_secs_f64();
    let avg_wait_minutes = if total_clients == 0 || minute_secs == 0.0 {
        0.0
    } else {
        snapshot.total_wait.as_secs_f64() / minute_secs / total_clients as f64
    };

    let avg_retries = if snapshot.total_arrival_attempts == 0 {
        0.0
    } else {
        snapshot.total_no_chair_retries as f64 / snapshot.total_arrival_attempts as f64
    };

    FinalReport {
        busy_percent,
        avg_wait_minutes,
        avg_retries,
        clients_served: provider.served.load(std::sync::atomic::Ordering::Relaxed),
        total_arrival_attempts: snapshot.total_arrival_attempts,
        total_no_chair_retries: snapshot.total_no_chair_retries,
        idle_time: idle,
        active_time: active,
        wait_p50: waits.p50(),
        wait_p99: waits.p99(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn snapshot(
        total_wait: Duration,
        attempts: u64,
        retries: u64,
    ) -> StateSnapshot {
        StateSnapshot {
            total_wait,
            total_arrival_attempts: attempts,
            total_no_chair_retries: retries,
            seating_order: Vec::new(),
            service_order: Vec::new(),
            max_occupancy: 0,
        }
    }

    #[test]
    fn averages_match_hand_computation() {
        let cfg = SimulationConfig::default(); // 1000 ms per minute
        let provider = ProviderStats::new();
        provider.served.store(2, Ordering::Relaxed);
        provider
            .active_nanos
            .store(Duration::from_secs(10).as_nanos() as u64, Ordering::Relaxed);
        provider
            .idle_nanos
            .store(Duration::from_secs(4).as_nanos() as u64, Ordering::Relaxed);

        // Two clients waited 2 s and 4 s; one minute is 1 s
        let snap = snapshot(Duration::from_secs(6), 5, 1);
        let report = compute_report(&snap, &provider, 2, &cfg, &WaitMetrics::new());

        assert!((report.avg_wait_minutes - 3.0).abs() < 1e-9);
        assert!((report.avg_retries - 0.2).abs() < 1e-9);
        assert!((report.busy_percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn no_idle_means_fully_busy() {
        let cfg = SimulationConfig::default();
        let provider = ProviderStats::new();
        provider
            .active_nanos
            .store(Duration::from_secs(5).as_nanos() as u64, Ordering::Relaxed);

        let report = compute_report(
            &snapshot(Duration::ZERO, 4, 0),
            &provider,
            4,
            &cfg,
            &WaitMetrics::new(),
        );
        assert_eq!(report.busy_percent, 100.0);
    }

    #[test]
    fn zero_clients_yield_zeroed_report() {
        let cfg = SimulationConfig::default();
        let provider = ProviderStats::new();
        let report = compute_report(
            &snapshot(Duration::ZERO, 0, 0),
            &provider,
            0,
            &cfg,
            &WaitMetrics::new(),
        );
        assert_eq!(report.busy_percent, 0.0);
        assert_eq!(report.avg_wait_minutes, 0.0);
        assert_eq!(report.avg_retries, 0.0);
    }

    #[test]
    fn wait_metrics_quantiles_cover_samples() {
        let waits = WaitMetrics::new();
        for ms in [10u64, 20, 30, 40] {
            waits.record(Duration::from_millis(ms));
        }
        assert_eq!(waits.sample_count(), 4);
        assert!(waits.p50() <= waits.p99());
        assert!(waits.p99() >= Duration::from_millis(30));
    }
}
