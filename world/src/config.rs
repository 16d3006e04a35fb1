//! Arena configuration and validation.

use std::time::Duration;

use pizza_brawl_core::{
    Actor, CellCoord, IngredientCatalog, IngredientType, Recipe, RecipeBook, RuleSet, TileCoord,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::TileMap;

/// Tunable description of an arena round.
///
/// Every field has a default matching the stock arena, so partial
/// configuration files only need to name what they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Whether the outermost ring of tiles is wall.
    pub border_walls: bool,
    /// Additional wall tiles inside the arena.
    pub interior_walls: Vec<CellCoord>,
    /// Tile the player starts on.
    pub player_spawn: CellCoord,
    /// Tile the bot starts on.
    pub bot_spawn: CellCoord,
    /// Tiles holding delivery points.
    pub delivery_points: Vec<CellCoord>,
    /// Length of the countdown in whole seconds.
    pub round_seconds: u32,
    /// Remaining seconds at which the countdown is flagged urgent.
    pub urgent_seconds: u32,
    /// Player speed in world units per second.
    pub player_speed: f32,
    /// Bot speed in world units per second.
    pub bot_speed: f32,
    /// Distance probed ahead of an actor along each axis.
    pub look_ahead: f32,
    /// Player pickup reach measured in tiles.
    pub collect_radius_tiles: f32,
    /// Player delivery reach measured in tiles.
    pub deliver_radius_tiles: f32,
    /// Sabotage zone radius measured in tiles.
    pub sabotage_radius_tiles: f32,
    /// Lifetime of a sabotage zone in milliseconds.
    pub sabotage_lifetime_ms: u64,
    /// Velocity multiplier applied inside a sabotage zone.
    pub sabotage_damping: f32,
    /// Variant rules.
    pub rules: RuleSet,
    /// Spawnable ingredient kinds and their weights.
    pub ingredients: Vec<IngredientType>,
    /// Recipe catalog.
    pub recipes: Vec<Recipe>,
}

impl ArenaConfig {
    /// Length of the countdown.
    #[must_use]
    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.round_seconds))
    }

    /// Lifetime of a sabotage zone.
    #[must_use]
    pub fn sabotage_lifetime(&self) -> Duration {
        Duration::from_millis(self.sabotage_lifetime_ms)
    }

    /// Builds the walkability map described by the configuration.
    #[must_use]
    pub fn tile_map(&self) -> TileMap {
        let columns = TileCoord::new(self.columns);
        let rows = TileCoord::new(self.rows);
        let mut map = if self.border_walls {
            TileMap::bordered(columns, rows, self.tile_length)
        } else {
            TileMap::open(columns, rows, self.tile_length)
        };
        for wall in &self.interior_walls {
            map.block(*wall);
        }
        map
    }

    /// Ingredient catalog described by the configuration.
    #[must_use]
    pub fn ingredient_catalog(&self) -> IngredientCatalog {
        IngredientCatalog::new(self.ingredients.clone())
    }

    /// Recipe book described by the configuration.
    #[must_use]
    pub fn recipe_book(&self) -> RecipeBook {
        RecipeBook::new(self.recipes.clone())
    }

    /// Checks that the configuration describes a playable arena.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(self.tile_length > 0.0) {
            return Err(ConfigError::InvalidTileLength(self.tile_length));
        }
        if self.round_seconds == 0 {
            return Err(ConfigError::InvalidRoundLength);
        }
        if !(0.0..=1.0).contains(&self.sabotage_damping) {
            return Err(ConfigError::InvalidDamping(self.sabotage_damping));
        }
        if self.rules.crafted_capacity == Some(0) {
            return Err(ConfigError::InvalidCapacity);
        }

        let map = self.tile_map();
        for (actor, cell) in [(Actor::Player, self.player_spawn), (Actor::Bot, self.bot_spawn)] {
            if !map.is_walkable(cell) {
                return Err(ConfigError::SpawnNotWalkable { actor, cell });
            }
        }
        for cell in &self.delivery_points {
            if cell.column() >= self.columns || cell.row() >= self.rows {
                return Err(ConfigError::DeliveryPointOutOfBounds { cell: *cell });
            }
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            tile_length: 40.0,
            border_walls: true,
            interior_walls: default_interior_walls(),
            player_spawn: CellCoord::new(10, 13),
            bot_spawn: CellCoord::new(10, 1),
            delivery_points: vec![
                CellCoord::new(3, 3),
                CellCoord::new(16, 3),
                CellCoord::new(3, 11),
                CellCoord::new(16, 11),
            ],
            round_seconds: 120,
            urgent_seconds: 10,
            player_speed: 160.0,
            bot_speed: 120.0,
            look_ahead: 16.0,
            collect_radius_tiles: 1.2,
            deliver_radius_tiles: 1.5,
            sabotage_radius_tiles: 1.5,
            sabotage_lifetime_ms: 8_000,
            sabotage_damping: 0.4,
            rules: RuleSet::kitchen(),
            ingredients: IngredientCatalog::default().types().to_vec(),
            recipes: RecipeBook::default().recipes().to_vec(),
        }
    }
}

fn default_interior_walls() -> Vec<CellCoord> {
    let mut walls = Vec::new();
    for column in [5, 14] {
        for row in (3..=5).chain(9..=11) {
            walls.push(CellCoord::new(column, row));
        }
    }
    for column in 8..=11 {
        walls.push(CellCoord::new(column, 7));
    }
    walls
}

/// Reasons an arena configuration is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The grid has no tiles.
    #[error("arena grid must contain tiles (received {columns}x{rows})")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// Tiles must have a positive size.
    #[error("tile length must be positive (received {0})")]
    InvalidTileLength(f32),
    /// The countdown must last at least one second.
    #[error("round must last at least one second")]
    InvalidRoundLength,
    /// Damping must keep velocities within their original magnitude.
    #[error("sabotage damping must lie in 0.0..=1.0 (received {0})")]
    InvalidDamping(f32),
    /// A bounded crafted queue must hold at least one item.
    #[error("crafted item capacity must be positive")]
    InvalidCapacity,
    /// An actor would start inside a wall.
    #[error("{actor:?} spawn {cell:?} is not walkable")]
    SpawnNotWalkable {
        /// Actor with the invalid spawn.
        actor: Actor,
        /// Offending tile.
        cell: CellCoord,
    },
    /// A delivery point lies outside the grid.
    #[error("delivery point {cell:?} lies outside the arena")]
    DeliveryPointOutOfBounds {
        /// Offending tile.
        cell: CellCoord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_layout_matches_arena_walls() {
        let map = ArenaConfig::default().tile_map();
        assert!(!map.is_walkable(CellCoord::new(5, 4)));
        assert!(!map.is_walkable(CellCoord::new(14, 10)));
        assert!(!map.is_walkable(CellCoord::new(9, 7)));
        assert!(map.is_walkable(CellCoord::new(7, 7)));
        assert!(map.is_walkable(CellCoord::new(10, 13)));
    }

    #[test]
    fn spawn_inside_wall_is_rejected() {
        let config = ArenaConfig {
            player_spawn: CellCoord::new(0, 0),
            ..ArenaConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnNotWalkable {
                actor: Actor::Player,
                cell: CellCoord::new(0, 0),
            })
        );
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let config = ArenaConfig {
            columns: 0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyGrid { columns: 0, .. })
        ));
    }

    #[test]
    fn delivery_point_outside_grid_is_rejected() {
        let config = ArenaConfig {
            delivery_points: vec![CellCoord::new(20, 3)],
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeliveryPointOutOfBounds { .. })
        ));
    }
}
