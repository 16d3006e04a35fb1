//! Static walkability grid used for collision and spawn placement.

use pizza_brawl_core::{CellCoord, TileCoord, Vec2, WalkabilityView};

/// Rectangular tile map recording which tiles actors may stand on.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    columns: TileCoord,
    rows: TileCoord,
    tile_length: f32,
    walkable: Vec<bool>,
}

impl TileMap {
    /// Creates a fully walkable map.
    #[must_use]
    pub fn open(columns: TileCoord, rows: TileCoord, tile_length: f32) -> Self {
        let capacity_u64 = u64::from(columns.get()) * u64::from(rows.get());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tile_length,
            walkable: vec![true; capacity],
        }
    }

    /// Creates a map whose outermost ring of tiles is wall.
    #[must_use]
    pub fn bordered(columns: TileCoord, rows: TileCoord, tile_length: f32) -> Self {
        let mut map = Self::open(columns, rows, tile_length);
        let (column_count, row_count) = (columns.get(), rows.get());
        for row in 0..row_count {
            for column in 0..column_count {
                let on_border = column == 0
                    || row == 0
                    || column + 1 == column_count
                    || row + 1 == row_count;
                if on_border {
                    map.block(CellCoord::new(column, row));
                }
            }
        }
        map
    }

    /// Marks the provided tile as wall. Tiles outside the map are ignored.
    pub fn block(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.walkable.get_mut(index) {
                *slot = false;
            }
        }
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn rows(&self) -> TileCoord {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the map measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns.get() as f32 * self.tile_length
    }

    /// Total height of the map measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows.get() as f32 * self.tile_length
    }

    /// Reports whether the tile exists and is not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether the tile under a world position is walkable.
    ///
    /// Positions left of or above the map are never walkable.
    #[must_use]
    pub fn is_walkable_at(&self, position: Vec2) -> bool {
        CellCoord::containing(position, self.tile_length)
            .map_or(false, |cell| self.is_walkable(cell))
    }

    /// Tile containing the provided world position, if any.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        CellCoord::containing(position, self.tile_length)
            .filter(|cell| self.index(*cell).is_some())
    }

    /// Read-only view of the walkability flags for systems.
    #[must_use]
    pub fn view(&self) -> WalkabilityView<'_> {
        WalkabilityView::new(&self.walkable, self.columns.get(), self.rows.get())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns.get() && cell.row() < self.rows.get() {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns.get()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
