//! Held ingredients, queued crafted items and score of a single actor.

use std::collections::VecDeque;

use pizza_brawl_core::{
    CraftedItem, IngredientKind, PickupRule, Recipe, RecipeBook, RecipeId, RuleSet,
};

/// Recipe identifier carried by pizzas picked up under the stacking rules.
pub const BOXED_PIZZA: RecipeId = RecipeId::new(u16::MAX);

/// Inventory, crafted queue and tallies owned by an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Carrier {
    pub(crate) inventory: Vec<IngredientKind>,
    pub(crate) crafted: VecDeque<CraftedItem>,
    pub(crate) score: u32,
    pub(crate) deliveries: u32,
}

impl Carrier {
    /// Takes an ingredient subject to the rule set's capacity limits.
    pub(crate) fn collect(&mut self, kind: IngredientKind, rules: &RuleSet) -> bool {
        match rules.pickup {
            PickupRule::Ingredients => {
                if self.inventory.len() >= rules.inventory_capacity {
                    return false;
                }
                self.inventory.push(kind);
                true
            }
            PickupRule::Pizzas { points } => self.stack(points, rules),
        }
    }

    /// Takes an ingredient ignoring the inventory capacity.
    ///
    /// Stacked pizzas still respect the stack limit.
    pub(crate) fn collect_unconditionally(
        &mut self,
        kind: IngredientKind,
        rules: &RuleSet,
    ) -> bool {
        match rules.pickup {
            PickupRule::Ingredients => {
                self.inventory.push(kind);
                true
            }
            PickupRule::Pizzas { points } => self.stack(points, rules),
        }
    }

    /// Crafts the most valuable satisfiable recipe into the crafted queue.
    pub(crate) fn craft(&mut self, book: &RecipeBook, rules: &RuleSet) -> Option<Recipe> {
        if !rules.has_crafted_room(self.crafted.len()) {
            return None;
        }
        let recipe = self.take_best_recipe(book)?;
        self.crafted.push_back(CraftedItem {
            recipe: recipe.id,
            points: recipe.points,
        });
        Some(recipe)
    }

    /// Removes the ingredients of the best recipe without queueing an item.
    pub(crate) fn take_best_recipe(&mut self, book: &RecipeBook) -> Option<Recipe> {
        let recipe = book.best_match(&self.inventory)?.clone();
        if RecipeBook::consume(&recipe, &mut self.inventory) {
            Some(recipe)
        } else {
            None
        }
    }

    /// Scores the oldest crafted item.
    pub(crate) fn deliver_one(&mut self) -> Option<CraftedItem> {
        let item = self.crafted.pop_front()?;
        self.score = self.score.saturating_add(item.points);
        self.deliveries = self.deliveries.saturating_add(1);
        Some(item)
    }

    /// Credits points for a recipe that was never queued.
    pub(crate) fn credit(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.deliveries = self.deliveries.saturating_add(1);
    }

    /// Reports whether a craft or stacked delivery is currently possible.
    pub(crate) fn can_craft(&self, book: &RecipeBook, rules: &RuleSet) -> bool {
        match rules.pickup {
            PickupRule::Ingredients => book.best_match(&self.inventory).is_some(),
            PickupRule::Pizzas { .. } => !self.crafted.is_empty(),
        }
    }

    fn stack(&mut self, points: u32, rules: &RuleSet) -> bool {
        if !rules.has_crafted_room(self.crafted.len()) {
            return false;
        }
        self.crafted.push_back(CraftedItem {
            recipe: BOXED_PIZZA,
            points,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use IngredientKind::{Cheese, Dough, Pepperoni, Tomato};

    #[test]
    fn collect_is_capacity_bounded() {
        let rules = RuleSet::kitchen();
        let mut carrier = Carrier::default();
        for _ in 0..rules.inventory_capacity {
            assert!(carrier.collect(Dough, &rules));
        }
        assert!(!carrier.collect(Tomato, &rules));
        assert_eq!(carrier.inventory.len(), 6);
    }

    #[test]
    fn unconditional_collect_ignores_capacity() {
        let rules = RuleSet::kitchen();
        let mut carrier = Carrier::default();
        for _ in 0..8 {
            assert!(carrier.collect_unconditionally(Dough, &rules));
        }
        assert_eq!(carrier.inventory.len(), 8);
    }

    #[test]
    fn craft_consumes_exact_multiset_and_queues_one_item() {
        let rules = RuleSet::kitchen();
        let book = RecipeBook::default();
        let mut carrier = Carrier {
            inventory: vec![Dough, Dough, Tomato, Cheese],
            ..Carrier::default()
        };
        let recipe = carrier.craft(&book, &rules).expect("margherita");
        assert_eq!(recipe.name, "Margherita");
        assert_eq!(carrier.inventory, vec![Dough]);
        assert_eq!(carrier.crafted.len(), 1);
    }

    #[test]
    fn craft_without_match_leaves_state_unchanged() {
        let rules = RuleSet::kitchen();
        let book = RecipeBook::default();
        let mut carrier = Carrier {
            inventory: vec![Dough, Pepperoni],
            ..Carrier::default()
        };
        let before = carrier.clone();
        assert!(carrier.craft(&book, &rules).is_none());
        assert_eq!(carrier, before);
    }

    #[test]
    fn deliver_scores_oldest_item() {
        let mut carrier = Carrier::default();
        carrier.crafted.push_back(CraftedItem {
            recipe: RecipeId::new(1),
            points: 200,
        });
        carrier.crafted.push_back(CraftedItem {
            recipe: RecipeId::new(0),
            points: 100,
        });
        let item = carrier.deliver_one().expect("queued item");
        assert_eq!(item.points, 200);
        assert_eq!(carrier.score, 200);
        assert_eq!(carrier.deliveries, 1);
        assert_eq!(carrier.crafted.len(), 1);
    }

    #[test]
    fn stacking_pickups_respect_stack_limit() {
        let rules = RuleSet::stacking();
        let mut carrier = Carrier::default();
        for _ in 0..10 {
            assert!(carrier.collect(Cheese, &rules));
        }
        assert!(!carrier.collect(Cheese, &rules));
        assert!(!carrier.collect_unconditionally(Cheese, &rules));
        assert!(carrier.inventory.is_empty());
        assert!(carrier.crafted.iter().all(|item| item.recipe == BOXED_PIZZA));
    }
}
