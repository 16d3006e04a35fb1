//! Ingredient and recipe catalogs.
//!
//! Both catalogs are fixed for the lifetime of a round. Recipe matching is
//! multiset containment evaluated from the most valuable recipe downward.

use serde::{Deserialize, Serialize};

/// Ingredient kinds that can spawn in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IngredientKind {
    /// Pizza base.
    Dough,
    /// Sauce.
    Tomato,
    /// Topping shared by every recipe.
    Cheese,
    /// Meat topping.
    Pepperoni,
    /// Rarest topping.
    Mushroom,
}

impl IngredientKind {
    /// Every kind in catalog order.
    pub const ALL: [IngredientKind; 5] = [
        Self::Dough,
        Self::Tomato,
        Self::Cheese,
        Self::Pepperoni,
        Self::Mushroom,
    ];

    /// Small integer identifier of the kind.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Dough => 1,
            Self::Tomato => 2,
            Self::Cheese => 3,
            Self::Pepperoni => 4,
            Self::Mushroom => 5,
        }
    }

    /// Resolves a kind from its integer identifier.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Dough),
            2 => Some(Self::Tomato),
            3 => Some(Self::Cheese),
            4 => Some(Self::Pepperoni),
            5 => Some(Self::Mushroom),
            _ => None,
        }
    }

    /// Symbolic key used by presentation adapters to pick sprites.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dough => "dough",
            Self::Tomato => "tomato",
            Self::Cheese => "cheese",
            Self::Pepperoni => "pepperoni",
            Self::Mushroom => "mushroom",
        }
    }
}

/// Catalog entry pairing a kind with its relative spawn weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientType {
    /// Kind described by the entry.
    pub kind: IngredientKind,
    /// Relative draw probability. Zero removes the kind from spawning.
    pub spawn_weight: u32,
}

/// Fixed catalog of spawnable ingredient types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngredientCatalog {
    types: Vec<IngredientType>,
}

impl IngredientCatalog {
    /// Creates a catalog from explicit entries.
    #[must_use]
    pub fn new(types: Vec<IngredientType>) -> Self {
        Self { types }
    }

    /// Entries in catalog order.
    #[must_use]
    pub fn types(&self) -> &[IngredientType] {
        &self.types
    }

    /// Sum of all spawn weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.types
            .iter()
            .map(|entry| u64::from(entry.spawn_weight))
            .sum()
    }

    /// Maps a roll in `0..total_weight()` onto a kind.
    ///
    /// Each kind owns a contiguous band of rolls as wide as its weight, so
    /// zero-weight kinds can never be returned. Rolls outside the range yield
    /// `None`.
    #[must_use]
    pub fn pick(&self, roll: u64) -> Option<IngredientKind> {
        let mut remaining = roll;
        for entry in &self.types {
            let weight = u64::from(entry.spawn_weight);
            if remaining < weight {
                return Some(entry.kind);
            }
            remaining -= weight;
        }
        None
    }
}

impl Default for IngredientCatalog {
    fn default() -> Self {
        Self::new(vec![
            IngredientType {
                kind: IngredientKind::Dough,
                spawn_weight: 5,
            },
            IngredientType {
                kind: IngredientKind::Tomato,
                spawn_weight: 5,
            },
            IngredientType {
                kind: IngredientKind::Cheese,
                spawn_weight: 3,
            },
            IngredientType {
                kind: IngredientKind::Pepperoni,
                spawn_weight: 2,
            },
            IngredientType {
                kind: IngredientKind::Mushroom,
                spawn_weight: 1,
            },
        ])
    }
}

/// Identifier of a recipe within a [`RecipeBook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipeId(u16);

impl RecipeId {
    /// Creates a new recipe identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Multiset of required ingredients together with the points it is worth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Identifier of the recipe.
    pub id: RecipeId,
    /// Display name.
    pub name: String,
    /// Required ingredient kinds. Duplicates require multiple copies.
    pub needs: Vec<IngredientKind>,
    /// Points scored when the recipe is delivered.
    pub points: u32,
}

impl Recipe {
    /// Reports whether `inventory` contains every required kind, counting duplicates.
    #[must_use]
    pub fn satisfied_by(&self, inventory: &[IngredientKind]) -> bool {
        let mut working = inventory.to_vec();
        self.needs.iter().all(|needed| {
            match working.iter().position(|held| held == needed) {
                Some(index) => {
                    let _ = working.swap_remove(index);
                    true
                }
                None => false,
            }
        })
    }
}

/// A completed recipe waiting to be handed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CraftedItem {
    /// Recipe the item was made from.
    pub recipe: RecipeId,
    /// Points the item scores when delivered.
    pub points: u32,
}

/// Recipe catalog kept in descending point order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Creates a book from arbitrary recipes, ordering them by descending points.
    ///
    /// Ties keep their relative input order.
    #[must_use]
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        recipes.sort_by(|left, right| right.points.cmp(&left.points));
        Self { recipes }
    }

    /// Recipes from most to least valuable.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Looks a recipe up by identifier.
    #[must_use]
    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Returns the most valuable recipe fully satisfiable by `inventory`.
    #[must_use]
    pub fn best_match(&self, inventory: &[IngredientKind]) -> Option<&Recipe> {
        self.recipes
            .iter()
            .find(|recipe| recipe.satisfied_by(inventory))
    }

    /// Removes one occurrence of every required kind from `inventory`.
    ///
    /// Nothing is removed unless the whole multiset is present.
    pub fn consume(recipe: &Recipe, inventory: &mut Vec<IngredientKind>) -> bool {
        if !recipe.satisfied_by(inventory) {
            return false;
        }
        for needed in &recipe.needs {
            if let Some(index) = inventory.iter().position(|held| held == needed) {
                let _ = inventory.remove(index);
            }
        }
        true
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        use IngredientKind::{Cheese, Dough, Mushroom, Pepperoni, Tomato};
        Self::new(vec![
            Recipe {
                id: RecipeId::new(0),
                name: "Margherita".to_owned(),
                needs: vec![Dough, Tomato, Cheese],
                points: 100,
            },
            Recipe {
                id: RecipeId::new(1),
                name: "Pepperoni".to_owned(),
                needs: vec![Dough, Tomato, Cheese, Pepperoni],
                points: 200,
            },
            Recipe {
                id: RecipeId::new(2),
                name: "Suprema".to_owned(),
                needs: vec![Dough, Tomato, Cheese, Pepperoni, Mushroom],
                points: 350,
            },
        ])
    }
}
