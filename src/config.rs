use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::services::latency::{LatencyProfile, PlaybackTiming};

const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Main configuration for the assistant
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// HTTP server port
    #[validate(range(min = 1024, max = 65535))]
    pub server_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,

    /// User id attached to live queries that don't name one
    #[validate(length(min = 1))]
    pub default_user_id: String,

    /// Invoices above this amount count as high value
    #[validate(range(exclusive_min = 0.0))]
    pub high_value_threshold: f64,

    /// Simulated thinking time before a live answer lands
    #[validate(range(max = MAX_DELAY_MS))]
    pub live_base_delay_ms: u64,
    #[validate(range(max = MAX_DELAY_MS))]
    pub live_jitter_ms: u64,

    /// Demo playback pacing
    #[validate(range(max = MAX_DELAY_MS))]
    pub reveal_base_delay_ms: u64,
    #[validate(range(max = MAX_DELAY_MS))]
    pub reveal_jitter_ms: u64,
    #[validate(range(max = MAX_DELAY_MS))]
    pub advance_delay_ms: u64,

    /// Start sessions with the canned chat history
    pub seed_history: bool,

    pub cors_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            log_level: "info".to_string(),
            default_user_id: "2".to_string(),
            high_value_threshold: 50_000.0,
            live_base_delay_ms: 1000,
            live_jitter_ms: 2000,
            reveal_base_delay_ms: 1500,
            reveal_jitter_ms: 1000,
            advance_delay_ms: 1000,
            seed_history: false,
            cors_enabled: true,
        }
    }
}

impl Config {
    /// Defaults, then `~/.finassist/config.*` if present, then
    /// `FINASSIST__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().unwrap_or_else(|| ".".into());
        let file = home.join(".finassist").join("config");
        Self::build(
            config::File::with_name(&file.to_string_lossy()).required(false),
        )
    }

    /// Defaults, then the given file (which must exist), then the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("server_port", i64::from(defaults.server_port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("default_user_id", defaults.default_user_id)?
            .set_default("high_value_threshold", defaults.high_value_threshold)?
            .set_default("live_base_delay_ms", defaults.live_base_delay_ms as i64)?
            .set_default("live_jitter_ms", defaults.live_jitter_ms as i64)?
            .set_default("reveal_base_delay_ms", defaults.reveal_base_delay_ms as i64)?
            .set_default("reveal_jitter_ms", defaults.reveal_jitter_ms as i64)?
            .set_default("advance_delay_ms", defaults.advance_delay_ms as i64)?
            .set_default("seed_history", defaults.seed_history)?
            .set_default("cors_enabled", defaults.cors_enabled)?
            .add_source(file)
            // Environment overrides: FINASSIST__SERVER_PORT, FINASSIST__LOG_LEVEL, etc.
            .add_source(config::Environment::with_prefix("FINASSIST").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn live_latency(&self) -> LatencyProfile {
        LatencyProfile::from_millis(self.live_base_delay_ms, self.live_jitter_ms)
    }

    pub fn playback_timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            reveal: LatencyProfile::from_millis(self.reveal_base_delay_ms, self.reveal_jitter_ms),
            advance: Duration::from_millis(self.advance_delay_ms),
        }
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("log_level")),
    }
}
