//! Runtime configuration (not gameplay tuning).
//!
//! Values resolve in order: explicit overrides (CLI), environment, defaults.
//! Gameplay tuning comes from an optional TOML file on top of `Tuning::default()`.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::entities::{EnemyKind, Field};
use crate::error::ConfigError;
use crate::tuning::{enemy_stats, Tuning};

pub const DEFAULT_FPS: u32 = 60;
pub const DEFAULT_FIELD_WIDTH: f32 = 1280.0;
pub const DEFAULT_FIELD_HEIGHT: f32 = 720.0;
pub const DEFAULT_LOG_FILE: &str = "cyber_stage.log";

pub const FPS_ENV: &str = "CYBER_STAGE_FPS";
pub const FIELD_WIDTH_ENV: &str = "CYBER_STAGE_FIELD_WIDTH";
pub const FIELD_HEIGHT_ENV: &str = "CYBER_STAGE_FIELD_HEIGHT";
pub const SEED_ENV: &str = "CYBER_STAGE_SEED";
pub const TUNING_ENV: &str = "CYBER_STAGE_TUNING";
pub const LOG_ENV: &str = "CYBER_STAGE_LOG";

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub fn fps() -> u32 {
    env_parse(FPS_ENV).unwrap_or(DEFAULT_FPS)
}

pub fn field_width() -> f32 {
    env_parse(FIELD_WIDTH_ENV).unwrap_or(DEFAULT_FIELD_WIDTH)
}

pub fn field_height() -> f32 {
    env_parse(FIELD_HEIGHT_ENV).unwrap_or(DEFAULT_FIELD_HEIGHT)
}

pub fn seed() -> Option<u64> {
    env_parse(SEED_ENV)
}

pub fn tuning_path() -> Option<PathBuf> {
    env::var_os(TUNING_ENV).map(PathBuf::from)
}

pub fn log_path() -> PathBuf {
    env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

// ── Tuning file ───────────────────────────────────────────────────────────────

/// Parse a TOML tuning document.  Missing keys keep their defaults.
pub fn parse_tuning(text: &str, path: &Path) -> Result<Tuning, ConfigError> {
    let tuning: Tuning = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tuning.validate()?;
    Ok(tuning)
}

pub fn load_tuning(path: &Path) -> Result<Tuning, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tuning = parse_tuning(&text, path)?;
    info!(path = %path.display(), "loaded tuning overrides");
    Ok(tuning)
}

// ── Session config ────────────────────────────────────────────────────────────

/// Values supplied explicitly by the caller; each wins over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub tuning: Option<PathBuf>,
    pub fps: Option<u32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub fps: u32,
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl SessionConfig {
    pub fn resolve(overrides: Overrides) -> Result<Self, ConfigError> {
        let tuning = match overrides.tuning.or_else(tuning_path) {
            Some(path) => load_tuning(&path)?,
            None => Tuning::default(),
        };
        let config = SessionConfig {
            field_width: overrides.width.unwrap_or_else(field_width),
            field_height: overrides.height.unwrap_or_else(field_height),
            fps: overrides.fps.unwrap_or_else(fps),
            seed: overrides.seed.or_else(seed),
            tuning,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be at least 1".to_string()));
        }
        // The boss is the largest actor; the field must hold it above the ground.
        let boss = enemy_stats(&EnemyKind::Boss);
        let min_width = boss.width.max(self.tuning.player_width);
        if !self.field_width.is_finite() || self.field_width < min_width {
            return Err(ConfigError::Invalid(format!(
                "field width {} is narrower than the largest actor ({min_width})",
                self.field_width
            )));
        }
        let min_height = self.tuning.ground_thickness + boss.height.max(self.tuning.player_height);
        if !self.field_height.is_finite() || self.field_height < min_height {
            return Err(ConfigError::Invalid(format!(
                "field height {} leaves no room above the ground (need {min_height})",
                self.field_height
            )));
        }
        Ok(())
    }

    pub fn field(&self) -> Field {
        Field {
            width: self.field_width,
            height: self.field_height,
            ground_thickness: self.tuning.ground_thickness,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}
