//! Session configuration: RNG seed plus the level definition
//!
//! Levels are plain JSON mirroring [`LevelSchedule`]. A missing `level` key
//! means the built-in level; inside a level, missing keys take per-field
//! defaults (no side quest, no props, start at x 100). World geometry stays
//! compile-time in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_WIDTH;
use crate::error::{ConfigError, ConfigResult};
use crate::sim::LevelSchedule;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub seed: u64,
    pub level: LevelSchedule,
}

impl SessionConfig {
    pub fn new(seed: u64, level: LevelSchedule) -> Self {
        Self { seed, level }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        log::info!(
            "loaded level '{}' from {} ({} waves, seed {})",
            config.level.name,
            path.display(),
            config.level.waves.len(),
            config.seed
        );
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject levels the simulation cannot play through
    pub fn validate(&self) -> ConfigResult<()> {
        let level = &self.level;
        let in_level = |x: f32| (0.0..=LEVEL_WIDTH).contains(&x);

        if level.waves.is_empty() {
            return Err(ConfigError::invalid("waves", "at least one wave is required"));
        }

        let mut previous: Option<f32> = None;
        for (i, wave) in level.waves.iter().enumerate() {
            if !in_level(wave.trigger_x) {
                return Err(ConfigError::invalid(
                    format!("waves[{}].trigger_x", i),
                    format!("{} is outside 0..={}", wave.trigger_x, LEVEL_WIDTH),
                ));
            }
            if previous.is_some_and(|p| wave.trigger_x <= p) {
                return Err(ConfigError::invalid(
                    format!("waves[{}].trigger_x", i),
                    "wave triggers must be strictly ascending",
                ));
            }
            previous = Some(wave.trigger_x);

            for (j, spawn) in wave.enemies.iter().enumerate() {
                if !in_level(spawn.x) {
                    return Err(ConfigError::invalid(
                        format!("waves[{}].enemies[{}].x", i, j),
                        format!("{} is outside 0..={}", spawn.x, LEVEL_WIDTH),
                    ));
                }
            }
        }

        if !in_level(level.finish_x) {
            return Err(ConfigError::invalid(
                "finish_x",
                format!("{} is outside 0..={}", level.finish_x, LEVEL_WIDTH),
            ));
        }
        if !in_level(level.player_start_x) {
            return Err(ConfigError::invalid(
                "player_start_x",
                format!("{} is outside 0..={}", level.player_start_x, LEVEL_WIDTH),
            ));
        }

        if let Some(quest) = &level.side_quest {
            if !in_level(quest.trigger_x) {
                return Err(ConfigError::invalid(
                    "side_quest.trigger_x",
                    format!("{} is outside 0..={}", quest.trigger_x, LEVEL_WIDTH),
                ));
            }
            if quest.dialogue.options.is_empty() {
                return Err(ConfigError::invalid(
                    "side_quest.dialogue.options",
                    "a dialogue needs at least one option",
                ));
            }
        }

        Ok(())
    }
}
