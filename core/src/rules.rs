//! Rule-set presets describing the two arena variants.

use serde::{Deserialize, Serialize};

/// What happens to an ingredient when an actor picks it up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PickupRule {
    /// The ingredient goes into the inventory and must be crafted.
    Ingredients,
    /// The pickup is a boxed pizza stacked straight onto the carrier's back.
    Pizzas {
        /// Points each stacked pizza scores when delivered.
        points: u32,
    },
}

/// Tunable rules that distinguish arena variants running on one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Whether the visibility field is computed around the player.
    pub fog_of_war: bool,
    /// Spawn/consume model for pickups.
    pub pickup: PickupRule,
    /// Maximum number of held ingredients.
    pub inventory_capacity: usize,
    /// Maximum number of queued crafted items, if bounded.
    pub crafted_capacity: Option<usize>,
}

impl RuleSet {
    /// Collect ingredients, craft recipes, deliver under fog of war.
    #[must_use]
    pub const fn kitchen() -> Self {
        Self {
            fog_of_war: true,
            pickup: PickupRule::Ingredients,
            inventory_capacity: 6,
            crafted_capacity: None,
        }
    }

    /// Stack pizzas on the carrier's back and deliver them one at a time.
    #[must_use]
    pub const fn stacking() -> Self {
        Self {
            fog_of_war: false,
            pickup: PickupRule::Pizzas { points: 100 },
            inventory_capacity: 0,
            crafted_capacity: Some(10),
        }
    }

    /// Reports whether another crafted item fits in a queue of length `queued`.
    #[must_use]
    pub fn has_crafted_room(&self, queued: usize) -> bool {
        self.crafted_capacity.map_or(true, |capacity| queued < capacity)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::kitchen()
    }
}
