//! Layered TOML configuration.

use config::{Config, File, FileFormat};
use scrivano_engine::EngineConfig;
use scrivano_error::{ConfigError, ScrivanoResult};
use scrivano_gateway::PacingGate;
use scrivano_gemini::GeminiProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Pacing section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PacingSettings {
    /// Minimum seconds between any two outbound provider calls
    pub min_call_interval_secs: u64,
}

/// Engine section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Seconds between finishing one job and starting the next
    pub job_cooldown_secs: u64,
    /// Chapters requested per batch call
    pub chapter_batch_size: usize,
}

/// Gemini section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeminiSettings {
    /// Model for text generation calls
    pub text_model: String,
    /// Model for image generation calls
    pub image_model: String,
}

/// Storage section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding the JSON snapshots
    pub data_dir: String,
}

/// Top-level Scrivano configuration.
///
/// Loads with precedence: bundled defaults, then
/// `~/.config/scrivano/scrivano.toml`, then `./scrivano.toml`; later
/// sources override earlier ones key by key.
///
/// # Example
///
/// ```no_run
/// use scrivano::ScrivanoSettings;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ScrivanoSettings::load()?;
/// println!("pacing: {}s", settings.pacing.min_call_interval_secs);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrivanoSettings {
    /// Outbound call pacing
    pub pacing: PacingSettings,
    /// Scheduler tunables
    pub engine: EngineSettings,
    /// Model selection
    pub gemini: GeminiSettings,
    /// Snapshot persistence
    pub storage: StorageSettings,
}

impl ScrivanoSettings {
    /// Load configuration with precedence: user override > bundled default.
    #[instrument]
    pub fn load() -> ScrivanoResult<Self> {
        debug!("Loading configuration: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../scrivano.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/scrivano/scrivano.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("scrivano").required(false));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }

    /// Load configuration from a specific file over the bundled defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ScrivanoResult<Self> {
        const DEFAULT_CONFIG: &str = include_str!("../../../scrivano.toml");

        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }

    /// Pacing gate configured from the pacing section.
    pub fn pacing_gate(&self) -> PacingGate {
        PacingGate::new(Duration::from_secs(self.pacing.min_call_interval_secs))
    }

    /// Scheduler config from the engine section.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_job_cooldown(Duration::from_secs(self.engine.job_cooldown_secs))
            .with_batch_size(self.engine.chapter_batch_size)
    }

    /// Gemini driver configured from the gemini section.
    pub fn gemini_provider(&self) -> GeminiProvider {
        GeminiProvider::with_models(&self.gemini.text_model, &self.gemini.image_model)
    }
}
