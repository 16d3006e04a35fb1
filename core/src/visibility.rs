//! Fog-of-war tiers and the dense per-tile visibility field.

use crate::CellCoord;

/// Visibility tier of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FogLevel {
    /// Fully revealed.
    Visible,
    /// Partially obscured.
    Dim,
    /// Opaque.
    Hidden,
}

impl FogLevel {
    /// Opacity of the fog overlay drawn above a tile of this tier.
    #[must_use]
    pub const fn opacity(self) -> f32 {
        match self {
            Self::Visible => 0.0,
            Self::Dim => 0.5,
            Self::Hidden => 0.85,
        }
    }
}

/// Row-major visibility tiers for every tile of the arena.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityField {
    columns: u32,
    rows: u32,
    levels: Vec<FogLevel>,
}

impl VisibilityField {
    /// Creates a field from row-major levels.
    ///
    /// Returns `None` when the level count does not match the dimensions.
    #[must_use]
    pub fn from_levels(columns: u32, rows: u32, levels: Vec<FogLevel>) -> Option<Self> {
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
        if levels.len() != expected {
            return None;
        }
        Some(Self {
            columns,
            rows,
            levels,
        })
    }

    /// Tier of the provided tile; tiles outside the field are hidden.
    #[must_use]
    pub fn level(&self, cell: CellCoord) -> FogLevel {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return FogLevel::Hidden;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.levels.get(index).copied().unwrap_or(FogLevel::Hidden)
    }

    /// Row-major tiers.
    #[must_use]
    pub fn levels(&self) -> &[FogLevel] {
        &self.levels
    }

    /// Dimensions of the field as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}
