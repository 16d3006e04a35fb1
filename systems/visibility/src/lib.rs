#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fog-of-war recompute centred on the player's tile.

use pizza_brawl_core::{CellCoord, FogLevel, TileCoord, VisibilityField};

const VISIBLE_RADIUS: u32 = 4;
const DIM_BAND: u32 = 2;

/// Configuration parameters required to construct the visibility system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    visible_radius: u32,
    dim_band: u32,
}

impl Config {
    /// Creates a configuration with the provided tier widths in tiles.
    ///
    /// Tiles within `visible_radius` Manhattan steps are revealed, the next
    /// `dim_band` steps are dimmed and everything beyond is hidden.
    #[must_use]
    pub const fn new(visible_radius: u32, dim_band: u32) -> Self {
        Self {
            visible_radius,
            dim_band,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(VISIBLE_RADIUS, DIM_BAND)
    }
}

/// Pure system that maintains the visibility field shown to the player.
#[derive(Debug, Default)]
pub struct Visibility {
    config: Config,
    field: VisibilityField,
}

impl Visibility {
    /// Creates a new visibility system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            field: VisibilityField::default(),
        }
    }

    /// Recomputes the whole field from the player's tile.
    ///
    /// With fog disabled every tile is visible. A player outside the grid
    /// leaves every tile hidden.
    pub fn update(
        &mut self,
        fog_of_war: bool,
        player: Option<CellCoord>,
        columns: TileCoord,
        rows: TileCoord,
    ) -> &VisibilityField {
        self.field = if fog_of_war {
            compute(self.config, player, columns, rows)
        } else {
            uniform(FogLevel::Visible, columns, rows)
        };
        &self.field
    }

    /// Field produced by the most recent update.
    #[must_use]
    pub fn field(&self) -> &VisibilityField {
        &self.field
    }
}

/// Computes the tier of every tile from Manhattan distance to the player.
#[must_use]
pub fn compute(
    config: Config,
    player: Option<CellCoord>,
    columns: TileCoord,
    rows: TileCoord,
) -> VisibilityField {
    let Some(player) = player else {
        return uniform(FogLevel::Hidden, columns, rows);
    };

    let dim_limit = config.visible_radius.saturating_add(config.dim_band);
    let mut levels = Vec::new();
    for row in 0..rows.get() {
        for column in 0..columns.get() {
            let distance = player.manhattan_distance(CellCoord::new(column, row));
            levels.push(if distance <= config.visible_radius {
                FogLevel::Visible
            } else if distance <= dim_limit {
                FogLevel::Dim
            } else {
                FogLevel::Hidden
            });
        }
    }
    VisibilityField::from_levels(columns.get(), rows.get(), levels).unwrap_or_default()
}

fn uniform(level: FogLevel, columns: TileCoord, rows: TileCoord) -> VisibilityField {
    let count = u64::from(columns.get()) * u64::from(rows.get());
    let levels = vec![level; usize::try_from(count).unwrap_or(0)];
    VisibilityField::from_levels(columns.get(), rows.get(), levels).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_manhattan_distance() {
        let field = compute(
            Config::default(),
            Some(CellCoord::new(10, 7)),
            TileCoord::new(20),
            TileCoord::new(15),
        );
        assert_eq!(field.level(CellCoord::new(10, 7)), FogLevel::Visible);
        assert_eq!(field.level(CellCoord::new(12, 9)), FogLevel::Visible);
        assert_eq!(field.level(CellCoord::new(15, 7)), FogLevel::Dim);
        assert_eq!(field.level(CellCoord::new(13, 10)), FogLevel::Dim);
        assert_eq!(field.level(CellCoord::new(17, 7)), FogLevel::Hidden);
        assert_eq!(field.level(CellCoord::new(0, 0)), FogLevel::Hidden);
    }

    #[test]
    fn disabled_fog_reveals_everything() {
        let mut visibility = Visibility::new(Config::default());
        let field = visibility.update(
            false,
            Some(CellCoord::new(1, 1)),
            TileCoord::new(4),
            TileCoord::new(3),
        );
        assert_eq!(field.dimensions(), (4, 3));
        assert!(field.levels().iter().all(|level| *level == FogLevel::Visible));
    }

    #[test]
    fn missing_player_hides_everything() {
        let field = compute(Config::default(), None, TileCoord::new(3), TileCoord::new(3));
        assert_eq!(field.levels().len(), 9);
        assert!(field.levels().iter().all(|level| *level == FogLevel::Hidden));
    }
}
