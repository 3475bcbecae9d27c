use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Runtime parameters of a simulation run. Loaded from an optional TOML
/// file, otherwise compiled defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of chairs in the waiting area.
    pub chair_count: usize,
    /// Wall-clock milliseconds per simulated minute.
    pub minute_ms: u64,
    /// Lower bound of the retry backoff, in simulated minutes.
    pub backoff_min_minutes: u64,
    /// Upper bound of the retry backoff, in simulated minutes (inclusive).
    pub backoff_max_minutes: u64,
    /// Base seed; each client agent derives its own stream from this.
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            chair_count: 3,
            minute_ms: 1000,
            backoff_min_minutes: 10,
            backoff_max_minutes: 20,
            rng_seed: 42,
        }
    }
}

impl SimulationConfig {
    /// One simulated minute of wall time.
    pub fn minute(&self) -> Duration {
        Duration::from_millis(self.minute_ms)
    }

    /// Convert a simulated-minute count to wall time.
    pub fn minutes(&self, n: u64) -> Duration {
        Duration::from_millis(self.minute_ms.saturating_mul(n))
    }
}

/// Load config from a TOML file, falling back to defaults when the file is
/// missing or unparsable.
pub fn load_config<P: AsRef<Path>>(path: P) -> SimulationConfig {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(text) => match toml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!(
                    "ignoring malformed config {}: {}",
                    path.as_ref().display(),
                    e
                );
                SimulationConfig::default()
            }
        },
        Err(_) => SimulationConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.chair_count, 3);
        assert!(cfg.backoff_min_minutes <= cfg.backoff_max_minutes);
    }

    #[test]
    fn toml_overrides_defaults() {
        let cfg: SimulationConfig =
            toml::from_str("chair_count = 5\nminute_ms = 10").unwrap();
        assert_eq!(cfg.chair_count, 5);
        assert_eq!(cfg.minute(), Duration::from_millis(10));
        // Unspecified fields keep their defaults
        assert_eq!(cfg.backoff_min_minutes, 10);
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = load_config("definitely/not/a/file.toml");
        assert_eq!(cfg.chair_count, SimulationConfig::default().chair_count);
    }
}
