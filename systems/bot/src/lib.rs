#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted opponent that runs the collect, craft and deliver loop.
//!
//! The system polls on its own cadence, independent of how often the world
//! ticks. Each poll inspects an immutable snapshot of its surroundings and
//! emits at most one steering command plus any pickup, craft or state
//! transition commands for the bot.

use std::time::Duration;

use pizza_brawl_core::{
    Actor, ActorSnapshot, BotState, Command, Event, IngredientKind, IngredientSnapshot,
    PickupRule, RecipeBook, RuleSet, Vec2,
};

const THINK_INTERVAL: Duration = Duration::from_millis(300);
const CRAFT_THRESHOLD: usize = 5;

/// Configuration parameters required to construct the bot system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    think_interval: Duration,
    reach: f32,
    craft_threshold: usize,
}

impl Config {
    /// Creates a configuration using the provided polling cadence and reach.
    ///
    /// `reach` is the distance in world units at which the bot grabs an
    /// ingredient or considers a delivery point reached.
    #[must_use]
    pub const fn new(think_interval: Duration, reach: f32) -> Self {
        Self {
            think_interval,
            reach,
            craft_threshold: CRAFT_THRESHOLD,
        }
    }

    /// Overrides the inventory size that forces a craft attempt.
    #[must_use]
    pub const fn with_craft_threshold(mut self, craft_threshold: usize) -> Self {
        self.craft_threshold = craft_threshold;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(THINK_INTERVAL, 40.0)
    }
}

/// Immutable view of everything the bot reasons about.
#[derive(Clone, Copy, Debug)]
pub struct Surroundings<'a> {
    /// Snapshot of the bot itself.
    pub bot: &'a ActorSnapshot,
    /// Ingredients lying in the arena.
    pub ingredients: &'a [IngredientSnapshot],
    /// Delivery point centres in world units.
    pub delivery_points: &'a [Vec2],
    /// Recipe catalog, most valuable first.
    pub recipes: &'a RecipeBook,
    /// Variant rules in force.
    pub rules: &'a RuleSet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Waiting,
    Active,
    Finished,
}

/// Pure system that drives the bot through its state machine.
#[derive(Debug)]
pub struct Bot {
    config: Config,
    accumulator: Duration,
    phase: Phase,
}

impl Bot {
    /// Creates a new bot system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            phase: Phase::Waiting,
        }
    }

    /// Consumes world events and the bot's surroundings to emit bot commands.
    ///
    /// Several elapsed polling intervals within one call collapse into a
    /// single decision, since the snapshot cannot change between them.
    pub fn handle(
        &mut self,
        events: &[Event],
        surroundings: &Surroundings<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::RoundStarted { .. } if self.phase == Phase::Waiting => {
                    self.phase = Phase::Active;
                }
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::RoundEnded { .. } => {
                    self.phase = Phase::Finished;
                    self.accumulator = Duration::ZERO;
                    return;
                }
                _ => {}
            }
        }

        if self.phase != Phase::Active || accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        if self.config.think_interval.is_zero() {
            self.accumulator = Duration::ZERO;
        } else if self.accumulator >= self.config.think_interval {
            let interval = self.config.think_interval.as_nanos();
            let leftover = self.accumulator.as_nanos() % interval;
            self.accumulator = Duration::from_nanos(u64::try_from(leftover).unwrap_or(0));
        } else {
            return;
        }

        self.think(surroundings, out);
    }

    fn think(&self, surroundings: &Surroundings<'_>, out: &mut Vec<Command>) {
        let state = surroundings.bot.bot_state.unwrap_or(BotState::Collecting);
        match state {
            BotState::Collecting => self.collect(surroundings, out),
            BotState::Crafting => craft(surroundings, out),
            BotState::Delivering => self.deliver(surroundings, out),
        }
    }

    fn collect(&self, surroundings: &Surroundings<'_>, out: &mut Vec<Command>) {
        let position = surroundings.bot.position;
        let nearest = surroundings
            .ingredients
            .iter()
            .map(|ingredient| (ingredient, ingredient.position.distance(position)))
            .min_by(|left, right| left.1.total_cmp(&right.1));

        let Some((ingredient, distance)) = nearest else {
            out.push(steer(Vec2::ZERO));
            return;
        };

        if distance > self.config.reach {
            out.push(steer(ingredient.position - position));
            return;
        }

        out.push(steer(Vec2::ZERO));
        out.push(Command::BotCollect {
            ingredient: ingredient.id,
        });
        if self.ready_to_craft(surroundings, ingredient.kind) {
            out.push(Command::SetBotState {
                state: BotState::Crafting,
            });
        }
    }

    fn ready_to_craft(&self, surroundings: &Surroundings<'_>, picked: IngredientKind) -> bool {
        match surroundings.rules.pickup {
            PickupRule::Ingredients => {
                let mut held = surroundings.bot.inventory.clone();
                held.push(picked);
                held.len() >= self.config.craft_threshold
                    || surroundings.recipes.best_match(&held).is_some()
            }
            PickupRule::Pizzas { .. } => true,
        }
    }

    fn deliver(&self, surroundings: &Surroundings<'_>, out: &mut Vec<Command>) {
        let position = surroundings.bot.position;
        let nearest = surroundings
            .delivery_points
            .iter()
            .map(|point| (*point, point.distance(position)))
            .min_by(|left, right| left.1.total_cmp(&right.1));

        match nearest {
            Some((point, distance)) if distance > self.config.reach => {
                out.push(steer(point - position));
            }
            _ => {
                out.push(steer(Vec2::ZERO));
                out.push(Command::SetBotState {
                    state: BotState::Collecting,
                });
            }
        }
    }
}

impl Default for Bot {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn craft(surroundings: &Surroundings<'_>, out: &mut Vec<Command>) {
    let bot = surroundings.bot;
    let craftable = match surroundings.rules.pickup {
        PickupRule::Ingredients => surroundings.recipes.best_match(&bot.inventory).is_some(),
        PickupRule::Pizzas { .. } => !bot.crafted.is_empty(),
    };

    if craftable {
        out.push(Command::BotCraft);
        out.push(Command::SetBotState {
            state: BotState::Delivering,
        });
    } else {
        out.push(Command::SetBotState {
            state: BotState::Collecting,
        });
    }
}

fn steer(direction: Vec2) -> Command {
    Command::Steer {
        actor: Actor::Bot,
        intent: direction.normalize_or_zero(),
    }
}
