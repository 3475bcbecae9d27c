//! The concurrent core: one thread per client, one provider thread, all
//! coordination through [`state::SharedState`] and the channels in
//! [`signals`].

pub mod client;
pub mod provider;
pub mod signals;
pub mod state;

use std::time::Instant;
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::events::{EventLog, VisitEvent};
use crate::input::Client;
use crate::stats::{compute_report, FinalReport, WaitMetrics};
use state::{SharedState, StateSnapshot};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to start simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Everything a run produces: the per-attempt event trace, the derived
/// report, and the raw terminal state.
pub struct SimulationOutcome {
    pub events: Vec<VisitEvent>,
    pub report: FinalReport,
    pub snapshot: StateSnapshot,
}

/// Run the whole simulation to completion: spawn the provider and one agent
/// per client, wait for every thread to finish, then aggregate. Returns only
/// once each client has been served exactly once.
pub fn run_simulation(
    clients: &[Client],
    cfg: &SimulationConfig,
) -> Result<SimulationOutcome, SimError> {
    let state = SharedState::new(cfg.chair_count);
    let events = EventLog::new();
    let waits = WaitMetrics::new();
    let (wake_tx, wake_rx) = signals::wake_channel();
    let sim_start = Instant::now();

    let (provider_handle, provider_stats) = provider::spawn_provider_thread(
        state.clone(),
        wake_rx,
        cfg.clone(),
        clients.len() as u64,
    )?;

    let mut client_handles = Vec::with_capacity(clients.len());
    for &c in clients {
        client_handles.push(client::spawn_client_thread(
            c,
            state.clone(),
            wake_tx.clone(),
            events.clone(),
            waits.clone(),
            cfg.clone(),
            sim_start,
        )?);
    }
    // The provider must see the channel close once the last agent exits
    drop(wake_tx);

    for handle in client_handles {
        if handle.join().is_err() {
            log::error!("a client thread panicked");
        }
    }
    if provider_handle.join().is_err() {
        log::error!("the provider thread panicked");
    }

    let snapshot = state.snapshot();
    let report = compute_report(
        &snapshot,
        &provider_stats,
        clients.len() as u64,
        cfg,
        &waits,
    );
    Ok(SimulationOutcome {
        events: events.read_all(),
        report,
        snapshot,
    })
}
