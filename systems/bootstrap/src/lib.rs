#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Pizza Brawl arena for presentation.

use pizza_brawl_core::{CellCoord, RecipeBook, RuleSet};
use pizza_brawl_world::{query, TileMap, World};

/// Produces data required to greet the player and lay out the arena.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the walkability map required for rendering walls and floor.
    #[must_use]
    pub fn tile_map<'world>(&self, world: &'world World) -> &'world TileMap {
        query::tile_map(world)
    }

    /// Exposes the delivery point tiles drawn as drop-off markers.
    #[must_use]
    pub fn delivery_cells<'world>(&self, world: &'world World) -> &'world [CellCoord] {
        query::delivery_cells(world)
    }

    /// Exposes the recipe catalog listed on the HUD.
    #[must_use]
    pub fn recipe_book<'world>(&self, world: &'world World) -> &'world RecipeBook {
        query::recipe_book(world)
    }

    /// Exposes the variant rules so the presentation can toggle fog and stacks.
    #[must_use]
    pub fn rules<'world>(&self, world: &'world World) -> &'world RuleSet {
        query::rules(world)
    }
}
