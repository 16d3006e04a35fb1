//! Session settings loaded from an optional TOML file.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use pizza_brawl_system_bot as bot;
use pizza_brawl_system_sabotage as sabotage;
use pizza_brawl_system_spawning as spawning;
use pizza_brawl_system_visibility as visibility;
use pizza_brawl_world::ArenaConfig;
use serde::{Deserialize, Serialize};

const SABOTAGE_STREAM: u64 = 0x5ab0_7a9e;

/// Everything required to run one headless round.
///
/// Every table and field is optional in the file; missing values fall back
/// to the stock arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SessionSettings {
    /// Seed shared by every random stream of the round.
    pub(crate) seed: u64,
    /// Simulated length of a single frame in milliseconds.
    pub(crate) frame_ms: u64,
    /// Upper bound on simulated frames before the driver gives up.
    pub(crate) max_frames: u64,
    /// Delay between the end of the round and the result hand-off.
    pub(crate) fade_ms: u64,
    pub(crate) arena: ArenaConfig,
    pub(crate) spawning: SpawningSettings,
    pub(crate) bot: BotSettings,
    pub(crate) sabotage: SabotageSettings,
    pub(crate) visibility: VisibilitySettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            frame_ms: 16,
            max_frames: 100_000,
            fade_ms: 800,
            arena: ArenaConfig::default(),
            spawning: SpawningSettings::default(),
            bot: BotSettings::default(),
            sabotage: SabotageSettings::default(),
            visibility: VisibilitySettings::default(),
        }
    }
}

impl SessionSettings {
    /// Reads settings from the provided file, or returns the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub(crate) fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub(crate) fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub(crate) fn spawning_config(&self) -> spawning::Config {
        let settings = &self.spawning;
        spawning::Config::new(self.seed)
            .with_opening_batch(settings.opening_batch)
            .with_respawn(
                Duration::from_millis(settings.respawn_interval_ms),
                settings.active_floor,
                settings.respawn_batch,
            )
            .with_placement(settings.margin, settings.max_attempts)
    }

    pub(crate) fn bot_config(&self) -> bot::Config {
        let settings = &self.bot;
        bot::Config::new(
            Duration::from_millis(settings.think_interval_ms),
            settings.reach_tiles * self.arena.tile_length,
        )
        .with_craft_threshold(settings.craft_threshold)
    }

    pub(crate) fn sabotage_config(&self) -> sabotage::Config {
        sabotage::Config::new(
            Duration::from_millis(self.sabotage.min_interval_ms),
            Duration::from_millis(self.sabotage.max_interval_ms),
            self.seed ^ SABOTAGE_STREAM,
        )
    }

    pub(crate) fn visibility_config(&self) -> visibility::Config {
        visibility::Config::new(self.visibility.visible_radius, self.visibility.dim_band)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SpawningSettings {
    pub(crate) opening_batch: usize,
    pub(crate) respawn_interval_ms: u64,
    pub(crate) active_floor: usize,
    pub(crate) respawn_batch: usize,
    pub(crate) margin: u32,
    pub(crate) max_attempts: u32,
}

impl Default for SpawningSettings {
    fn default() -> Self {
        Self {
            opening_batch: 12,
            respawn_interval_ms: 5_000,
            active_floor: 8,
            respawn_batch: 3,
            margin: 2,
            max_attempts: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BotSettings {
    pub(crate) think_interval_ms: u64,
    pub(crate) reach_tiles: f32,
    pub(crate) craft_threshold: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            think_interval_ms: 300,
            reach_tiles: 1.0,
            craft_threshold: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SabotageSettings {
    pub(crate) min_interval_ms: u64,
    pub(crate) max_interval_ms: u64,
}

impl Default for SabotageSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: 15_000,
            max_interval_ms: 25_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct VisibilitySettings {
    pub(crate) visible_radius: u32,
    pub(crate) dim_band: u32,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            visible_radius: 4,
            dim_band: 2,
        }
    }
}
