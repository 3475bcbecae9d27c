use crossbeam::channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::thread;
use std::time::Instant;

use crate::config::SimulationConfig;
use crate::events::{EventLog, VisitEvent};
use crate::input::Client;
use crate::sim::state::SharedState;
use crate::stats::WaitMetrics;

/// Spawn one client agent thread.
///
/// The agent sleeps until its arrival time, then loops: attempt to take a
/// chair; on rejection back off for a random number of simulated minutes and
/// try again; on seating, wake the provider if the area was empty, wait to
/// be released into service, wait for service to complete, and terminate.
/// Attempt/retry totals are folded into the shared state exactly once, when
/// the agent exits.
pub fn spawn_client_thread(
    client: Client,
    state: SharedState,
    wake_tx: Sender<()>,
    events: EventLog,
    waits: WaitMetrics,
    cfg: SimulationConfig,
    sim_start: Instant,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("client-{}", client.id))
        .spawn(move || {
            let mut rng = StdRng::seed_from_u64(cfg.rng_seed ^ u64::from(client.id));
            let mut sleep_minutes = client.arrival_minutes;
            let mut attempts = 0u64;
            let mut retries = 0u64;

            loop {
                thread::sleep(cfg.minutes(sleep_minutes));
                let arrived_at = sim_start.elapsed();
                attempts += 1;

                match state.try_enter(client.id, client.service_minutes) {
                    Some(handles) => {
                        if handles.was_first_occupant {
                            let _ = wake_tx.send(());
                        }
                        let seated_at = Instant::now();
                        if handles.seat_released.recv().is_err() {
                            log::error!(
                                "client {}: provider went away before release",
                                client.id
                            );
                            break;
                        }
                        let wait = seated_at.elapsed();
                        state.add_wait(wait);
                        waits.record(wait);

                        if handles.service_complete.recv().is_err() {
                            log::error!(
                                "client {}: provider went away mid-service",
                                client.id
                            );
                            break;
                        }
                        let left_at = sim_start.elapsed();
                        events.record(VisitEvent {
                            client_id: client.id,
                            arrived_at,
                            left_at,
                            served: true,
                        });
                        log::info!(
                            "client {} served after waiting {:?}",
                            client.id,
                            wait
                        );
                        break;
                    }
                    None => {
                        retries += 1;
                        events.record(VisitEvent {
                            client_id: client.id,
                            arrived_at,
                            left_at: sim_start.elapsed(),
                            served: false,
                        });
                        sleep_minutes = rng
                            .gen_range(cfg.backoff_min_minutes..=cfg.backoff_max_minutes);
                        log::info!(
                            "client {} found no free chair, retrying in {} min",
                            client.id,
                            sleep_minutes
                        );
                    }
                }
            }

            state.fold_client_totals(attempts, retries);
        })
}
