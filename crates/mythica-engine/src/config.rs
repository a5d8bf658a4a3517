//! Engine configuration.
//!
//! Controls the fixed-step loop, the RNG seed and where data files live.
//! Configuration can be loaded from and saved to a TOML file.

use mythica_gameplay::SimTuning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "mythica.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Loop Settings ===
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Number of ticks to run
    pub ticks: u64,
    /// Sleep between ticks so the run follows the wall clock
    pub realtime: bool,

    // === Simulation Settings ===
    /// Seed for the spell jitter RNG
    pub seed: u64,
    /// Catalog file (None = built-in catalog)
    pub catalog: Option<PathBuf>,
    /// Map directory holding the CSV layers (None = built-in arena)
    pub map: Option<PathBuf>,
    /// Input script file (None = built-in demo script)
    pub script: Option<PathBuf>,

    // === Output Settings ===
    /// Write every game event as a JSON line to this file
    pub event_log: Option<PathBuf>,

    // === Balance ===
    /// Timing and balance overrides
    pub tuning: SimTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            ticks: 1_200,
            realtime: false,

            seed: 0x5eed,
            catalog: None,
            map: None,
            script: None,

            event_log: None,

            tuning: SimTuning::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut config) => {
                    info!("Loaded config from {}", path.display());
                    config.validate();
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp loop settings to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_ms = self.tick_ms.clamp(1, 1_000);
    }

    /// Simulated length of the whole run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.tick_ms.saturating_mul(self.ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert!(!config.realtime);
        assert!(config.catalog.is_none());
        assert_eq!(config.tuning, SimTuning::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig {
            tick_ms: 0,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.tick_ms, 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = EngineConfig::default();
        config.ticks = 90;
        config.seed = 12345;
        config.event_log = Some(PathBuf::from("events.jsonl"));
        config.tuning.enemy_attack_cooldown_ms = 750;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/mythica.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "ticks = \"many\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            ticks = 10

            [tuning]
            attack_cooldown_ms = 250
            "#,
        )
        .expect("Failed to parse");
        assert_eq!(config.ticks, 10);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.tuning.attack_cooldown_ms, 250);
        assert_eq!(config.tuning.switch_cooldown_ms, 200);
        assert_eq!(config.duration_ms(), 160);
    }
}
