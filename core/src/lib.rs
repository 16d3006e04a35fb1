#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pizza Brawl arena.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative arena world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and presentation sinks to react to. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

mod catalog;
mod log;
mod rules;
mod visibility;

pub use catalog::{
    CraftedItem, IngredientCatalog, IngredientKind, IngredientType, Recipe, RecipeBook, RecipeId,
};
pub use log::{ActionCode, MoveLog, MoveLogEntry, RoundSummary};
pub use rules::{PickupRule, RuleSet};
pub use visibility::{FogLevel, VisibilityField};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Pizza Brawl.";

/// Actors that move through the arena and carry ingredients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Actor {
    /// The input-driven participant.
    Player,
    /// The scripted opponent.
    Bot,
}

/// Behaviour states of the scripted opponent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotState {
    /// Walking toward the nearest ingredient and picking it up.
    Collecting,
    /// Converting the held ingredients into a scored recipe.
    Crafting,
    /// Walking to the nearest delivery point.
    Delivering,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens the round, starting the countdown.
    StartRound,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the movement intent of an actor.
    ///
    /// The intent is a direction whose magnitude is clamped to one; the world
    /// scales it by the actor's speed and resolves it against the tile map.
    Steer {
        /// Actor whose intent changes.
        actor: Actor,
        /// Desired direction of travel.
        intent: Vec2,
    },
    /// Player pressed the primary action: collect the nearest ingredient or craft.
    PrimaryAction,
    /// Player pressed the deliver action.
    DeliverAction,
    /// Requests that an ingredient of the provided kind appears on a tile.
    SpawnIngredient {
        /// Kind of ingredient to create.
        kind: IngredientKind,
        /// Tile that will hold the ingredient.
        cell: CellCoord,
    },
    /// Unconditional pickup performed by the bot.
    BotCollect {
        /// Ingredient targeted by the bot.
        ingredient: IngredientId,
    },
    /// Bot converts its held ingredients into the best recipe and scores it.
    BotCraft,
    /// Moves the bot into a new behaviour state.
    SetBotState {
        /// State the bot should adopt.
        state: BotState,
    },
    /// Creates a movement-damping zone centred on the provided position.
    DropSabotageZone {
        /// Centre of the zone in world units.
        at: Vec2,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the countdown started.
    RoundStarted {
        /// Total length of the round.
        duration: Duration,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Emitted once per elapsed whole second of the countdown.
    ClockTicked {
        /// Whole seconds left in the round.
        remaining: u32,
        /// Set once the countdown enters its final stretch.
        urgent: bool,
    },
    /// Confirms that an ingredient appeared in the arena.
    IngredientSpawned {
        /// Identifier allocated to the ingredient.
        ingredient: IngredientId,
        /// Kind of the ingredient.
        kind: IngredientKind,
        /// Tile holding the ingredient.
        cell: CellCoord,
    },
    /// Confirms that an actor picked up an ingredient.
    IngredientCollected {
        /// Actor that picked the ingredient up.
        actor: Actor,
        /// Identifier of the removed ingredient.
        ingredient: IngredientId,
        /// Kind of the removed ingredient.
        kind: IngredientKind,
    },
    /// Reports that a pickup was refused and the ingredient stayed in the world.
    CollectRejected {
        /// Actor whose pickup was refused.
        actor: Actor,
        /// Ingredient that remains in the arena.
        ingredient: IngredientId,
    },
    /// Confirms that an actor turned held ingredients into a recipe.
    RecipeCrafted {
        /// Actor that crafted the recipe.
        actor: Actor,
        /// Recipe that was crafted.
        recipe: RecipeId,
        /// Points the recipe is worth.
        points: u32,
    },
    /// Confirms that a crafted item was handed in and scored.
    ItemDelivered {
        /// Actor that scored.
        actor: Actor,
        /// Recipe behind the delivered item.
        recipe: RecipeId,
        /// Points added by the delivery.
        points: u32,
        /// Score of the actor after the delivery.
        score: u32,
    },
    /// Records a player action in the append-only move log.
    ActionLogged {
        /// Entry appended to the log.
        entry: MoveLogEntry,
    },
    /// Announces that the bot changed behaviour state.
    BotStateChanged {
        /// Previous state.
        from: BotState,
        /// New state.
        to: BotState,
    },
    /// Confirms that a sabotage zone was created.
    SabotageZoneCreated {
        /// Identifier allocated to the zone.
        zone: ZoneId,
        /// Centre of the zone in world units.
        at: Vec2,
        /// Radius of the zone in world units.
        radius: f32,
    },
    /// Confirms that a sabotage zone reached the end of its lifetime.
    SabotageZoneExpired {
        /// Identifier of the removed zone.
        zone: ZoneId,
    },
    /// Terminal event carrying the final summary. Emitted exactly once.
    RoundEnded {
        /// Scores, delivery counts and move log of the finished round.
        summary: RoundSummary,
    },
}

/// Unique identifier assigned to a spawned ingredient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientId(u32);

impl IngredientId {
    /// Creates a new ingredient identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a sabotage zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a new zone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Centre of the cell in world units for the provided tile length.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }

    /// Cell containing the provided world position, if it is not negative.
    #[must_use]
    pub fn containing(position: Vec2, tile_length: f32) -> Option<Self> {
        if tile_length <= 0.0 || position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let column = (position.x / tile_length).floor();
        let row = (position.y / tile_length).floor();
        Some(Self::new(column as u32, row as u32))
    }
}

/// Index within the tile grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord(u32);

impl TileCoord {
    /// Creates a new tile coordinate wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Read-only view into the arena's walkability grid, stored row-major.
#[derive(Clone, Copy, Debug)]
pub struct WalkabilityView<'a> {
    walkable: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> WalkabilityView<'a> {
    /// Captures a view backed by one flag per tile.
    #[must_use]
    pub const fn new(walkable: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            walkable,
            columns,
            rows,
        }
    }

    /// Reports whether the tile exists and is not a wall.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable representation of a spawned ingredient used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngredientSnapshot {
    /// Identifier allocated by the world.
    pub id: IngredientId,
    /// Kind of the ingredient.
    pub kind: IngredientKind,
    /// Tile holding the ingredient.
    pub cell: CellCoord,
    /// Centre of the tile in world units.
    pub position: Vec2,
}

/// Immutable representation of an actor used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Which actor the snapshot describes.
    pub actor: Actor,
    /// Continuous position in world units.
    pub position: Vec2,
    /// Velocity committed during the last tick, in world units per second.
    pub velocity: Vec2,
    /// Held ingredient kinds in pickup order.
    pub inventory: Vec<IngredientKind>,
    /// Completed recipes awaiting delivery, oldest first.
    pub crafted: Vec<CraftedItem>,
    /// Accumulated points.
    pub score: u32,
    /// Number of scored recipes.
    pub deliveries: u32,
    /// Behaviour state, present only for the bot.
    pub bot_state: Option<BotState>,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, IngredientId, TileCoord, Vec2, WalkabilityView};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn cell_center_and_containing_agree() {
        let cell = CellCoord::new(10, 13);
        let center = cell.center(40.0);
        assert_eq!(center, Vec2::new(420.0, 540.0));
        assert_eq!(CellCoord::containing(center, 40.0), Some(cell));
    }

    #[test]
    fn containing_rejects_negative_positions() {
        assert_eq!(CellCoord::containing(Vec2::new(-0.5, 10.0), 40.0), None);
        assert_eq!(CellCoord::containing(Vec2::new(10.0, 10.0), 0.0), None);
    }

    #[test]
    fn walkability_view_indexes_row_major_and_rejects_outside_cells() {
        let flags = [true, false, true, true, true, false];
        let view = WalkabilityView::new(&flags, 3, 2);
        assert_eq!(view.dimensions(), (3, 2));
        assert!(!view.is_walkable(CellCoord::new(1, 0)));
        assert!(view.is_walkable(CellCoord::new(0, 1)));
        assert!(!view.is_walkable(CellCoord::new(2, 1)));
        assert!(!view.is_walkable(CellCoord::new(3, 0)));
        assert!(!view.is_walkable(CellCoord::new(0, 2)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&IngredientId::new(42));
        assert_round_trip(&TileCoord::new(7));
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
