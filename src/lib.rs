pub mod config;
pub mod events;
pub mod input;
pub mod sim;
pub mod stats;

pub use config::{load_config, SimulationConfig};
pub use events::{EventLog, VisitEvent};
pub use input::{parse_clients, Client, InputError};
pub use sim::provider::ProviderStats;
pub use sim::state::{SeatHandles, SeatedClient, SharedState, StateSnapshot};
pub use sim::{run_simulation, SimError, SimulationOutcome};
pub use stats::{compute_report, FinalReport, WaitMetrics};
