use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Shadow Drill
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShadowDrillConfig {
    /// Workout defaults and limits
    pub workout: WorkoutConfig,
    /// Spoken move announcements
    pub announcer: AnnouncerConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkoutConfig {
    /// Workout length a new session starts with
    pub default_minutes: u32,
    /// Playback speed a new session starts with (0.5 - 2.0)
    pub default_speed: f64,
    /// Shortest workout accepted
    pub min_minutes: u32,
    /// Longest workout accepted
    pub max_minutes: u32,
    /// Fixed seed for reproducible move rotation
    pub rng_seed: Option<u64>,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            default_minutes: 5,
            default_speed: 1.0,
            min_minutes: 1,
            max_minutes: 60,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    /// Speak each move as it comes up
    pub enabled: bool,
    /// Text-to-speech program; the move name is appended as the last argument
    pub program: String,
    /// Extra arguments placed before the move name
    pub args: Vec<String>,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: "espeak".to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
        }
    }
}

impl ShadowDrillConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (shadow-drill.toml in the working directory)
    /// 3. Environment variables (SHADOW_DRILL_WORKOUT__DEFAULT_MINUTES=10)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("shadow-drill.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SHADOW_DRILL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let shadow_drill_config: ShadowDrillConfig = config.try_deserialize()?;
        Ok(shadow_drill_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShadowDrillConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.workout.default_minutes, 5);
        assert_eq!(config.workout.max_minutes, 60);
        assert_eq!(config.announcer.program, "espeak");
        assert!(!config.announcer.enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow-drill.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[workout]\ndefault_minutes = 12\nrng_seed = 9\n\n[announcer]\nenabled = true\nprogram = \"say\""
        )
        .unwrap();

        let config = ShadowDrillConfig::load_from(&path).unwrap();
        assert_eq!(config.workout.default_minutes, 12);
        assert_eq!(config.workout.rng_seed, Some(9));
        assert_eq!(config.workout.default_speed, 1.0);
        assert!(config.announcer.enabled);
        assert_eq!(config.announcer.program, "say");
    }

    #[test]
    fn test_empty_announcer_args_survive_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow-drill.toml");
        std::fs::write(&path, "[announcer]\nenabled = true\n").unwrap();

        let config = ShadowDrillConfig::load_from(&path).unwrap();
        assert!(config.announcer.enabled);
        assert!(config.announcer.args.is_empty());
        assert_eq!(config.observability.log_level, "warn");
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut original = ShadowDrillConfig::default();
        original.workout.default_minutes = 20;
        original.observability.json = true;
        original.save_to_file(&path).unwrap();

        let loaded = ShadowDrillConfig::load_from(&path).unwrap();
        assert_eq!(loaded.workout.default_minutes, 20);
        assert!(loaded.observability.json);
    }
}
