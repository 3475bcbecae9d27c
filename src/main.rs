use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use ta_office_sim::{load_config, parse_clients, run_simulation, SimulationConfig, VisitEvent};

#[derive(Parser)]
#[command(name = "ta-office-sim")]
#[command(about = "Sleeping-TA office hours simulation")]
struct Cli {
    /// Input file with one `id arrival_minutes service_minutes` record per line
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let Some(path) = cli.input else {
        eprintln!("usage: ta-office-sim <input-file>");
        return ExitCode::from(1);
    };

    let cfg = load_config("config/simulation.toml");

    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("ERROR: {} could not be opened: {}", path.display(), e);
            return ExitCode::from(2);
        }
    };
    let clients = match parse_clients(BufReader::new(file)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: invalid input {}: {}", path.display(), e);
            return ExitCode::from(2);
        }
    };

    log::info!(
        "loaded {} clients, waiting area has {} chairs, 1 min = {} ms",
        clients.len(),
        cfg.chair_count,
        cfg.minute_ms
    );

    let outcome = match run_simulation(&clients, &cfg) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::from(1);
        }
    };

    for event in &outcome.events {
        print_event(event, &cfg);
    }

    let report = &outcome.report;
    println!("Statistics:");
    println!("% time the provider was busy: {:.2}%", report.busy_percent);
    println!(
        "Average wait for service: {:.2} minutes",
        report.avg_wait_minutes
    );
    println!(
        "Average retries per arrival (no free chair): {:.2}",
        report.avg_retries
    );
    println!(
        "Arrival attempts: {} ({} turned away), clients served: {}",
        report.total_arrival_attempts,
        report.total_no_chair_retries,
        report.clients_served
    );
    println!(
        "Wait p50/p99: {:.2} / {:.2} minutes",
        as_minutes(report.wait_p50, &cfg),
        as_minutes(report.wait_p99, &cfg)
    );

    ExitCode::SUCCESS
}

fn print_event(event: &VisitEvent, cfg: &SimulationConfig) {
    println!(
        "Client ID: {} | Arrived: {:.1} min | Left: {:.1} min | Provided Service: {}",
        event.client_id,
        as_minutes(event.arrived_at, cfg),
        as_minutes(event.left_at, cfg),
        if event.served { "Yes" } else { "No" }
    );
}

fn as_minutes(wall: Duration, cfg: &SimulationConfig) -> f64 {
    let minute = cfg.minute().as_secs_f64();
    if minute == 0.0 {
        0.0
    } else {
        wall.as_secs_f64() / minute
    }
}
