#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state management for Pizza Brawl.

use std::time::Duration;

use pizza_brawl_core::{
    ActionCode, Actor, BotState, CellCoord, Command, Event, IngredientCatalog, IngredientId,
    IngredientKind, MoveLog, MoveLogEntry, PickupRule, RecipeBook, RoundSummary, Vec2, ZoneId,
    WELCOME_BANNER,
};
use tracing::{debug, info, warn};

mod carrier;
mod config;
mod grid;
mod resolver;

use carrier::Carrier;
pub use carrier::BOXED_PIZZA;
pub use config::{ArenaConfig, ConfigError};
pub use grid::TileMap;
pub use resolver::{damp_velocity, resolve_velocity, SabotageZone};

const CLOCK_QUANTUM: Duration = Duration::from_secs(1);

/// Phases of a round. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Arena built, countdown not started.
    Waiting,
    /// Countdown running; commands mutate the arena.
    Running,
    /// Countdown reached zero; the arena is frozen.
    Ended,
}

/// Represents the authoritative arena world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: ArenaConfig,
    map: TileMap,
    catalog: IngredientCatalog,
    recipes: RecipeBook,
    ingredients: Vec<Ingredient>,
    next_ingredient: u32,
    delivery_points: Vec<CellCoord>,
    player: Body,
    bot: Body,
    bot_state: BotState,
    zones: Vec<SabotageZone>,
    next_zone: u32,
    clock: RoundClock,
    move_log: MoveLog,
}

impl World {
    /// Creates a new arena from a validated configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = config.tile_map();
        let tile_length = config.tile_length;
        Ok(Self {
            banner: WELCOME_BANNER,
            catalog: config.ingredient_catalog(),
            recipes: config.recipe_book(),
            ingredients: Vec::new(),
            next_ingredient: 0,
            delivery_points: config.delivery_points.clone(),
            player: Body::at(config.player_spawn.center(tile_length)),
            bot: Body::at(config.bot_spawn.center(tile_length)),
            bot_state: BotState::Collecting,
            zones: Vec::new(),
            next_zone: 0,
            clock: RoundClock::new(config.round_seconds),
            move_log: MoveLog::new(),
            map,
            config,
        })
    }

    fn body(&self, actor: Actor) -> &Body {
        match actor {
            Actor::Player => &self.player,
            Actor::Bot => &self.bot,
        }
    }

    fn body_mut(&mut self, actor: Actor) -> &mut Body {
        match actor {
            Actor::Player => &mut self.player,
            Actor::Bot => &mut self.bot,
        }
    }

    fn speed(&self, actor: Actor) -> f32 {
        match actor {
            Actor::Player => self.config.player_speed,
            Actor::Bot => self.config.bot_speed,
        }
    }

    fn tile_length(&self) -> f32 {
        self.config.tile_length
    }

    fn nearest_ingredient_within(&self, position: Vec2, radius: f32) -> Option<usize> {
        self.ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| (index, ingredient.position.distance(position)))
            .filter(|(_, distance)| *distance < radius)
            .min_by(|left, right| left.1.total_cmp(&right.1))
            .map(|(index, _)| index)
    }

    fn log_player_action(&mut self, action: ActionCode, out_events: &mut Vec<Event>) {
        let Some(cell) = self.map.cell_at(self.player.position) else {
            warn!(
                x = self.player.position.x,
                y = self.player.position.y,
                ?action,
                "player_action_off_grid"
            );
            return;
        };
        let entry = MoveLogEntry {
            column: cell.column(),
            row: cell.row(),
            action,
            timestamp_ms: u64::try_from(self.clock.elapsed.as_millis()).unwrap_or(u64::MAX),
        };
        self.move_log.record(entry);
        out_events.push(Event::ActionLogged { entry });
    }

    fn primary_action(&mut self, out_events: &mut Vec<Event>) {
        let radius = self.config.collect_radius_tiles * self.tile_length();
        if let Some(index) = self.nearest_ingredient_within(self.player.position, radius) {
            let ingredient = self.ingredients[index];
            if self.player.carrier.collect(ingredient.kind, &self.config.rules) {
                let _ = self.ingredients.remove(index);
                out_events.push(Event::IngredientCollected {
                    actor: Actor::Player,
                    ingredient: ingredient.id,
                    kind: ingredient.kind,
                });
                self.log_player_action(ActionCode::Collect, out_events);
                return;
            }
            out_events.push(Event::CollectRejected {
                actor: Actor::Player,
                ingredient: ingredient.id,
            });
        }

        let crafted = self
            .player
            .carrier
            .craft(&self.recipes, &self.config.rules);
        if let Some(recipe) = crafted {
            debug!(recipe = %recipe.name, points = recipe.points, "player_crafted");
            out_events.push(Event::RecipeCrafted {
                actor: Actor::Player,
                recipe: recipe.id,
                points: recipe.points,
            });
        }
    }

    fn deliver_action(&mut self, out_events: &mut Vec<Event>) {
        let radius = self.config.deliver_radius_tiles * self.tile_length();
        let tile_length = self.tile_length();
        let in_reach = self
            .delivery_points
            .iter()
            .filter(|point| point.center(tile_length).distance(self.player.position) < radius)
            .count();

        for _ in 0..in_reach {
            let Some(item) = self.player.carrier.deliver_one() else {
                break;
            };
            out_events.push(Event::ItemDelivered {
                actor: Actor::Player,
                recipe: item.recipe,
                points: item.points,
                score: self.player.carrier.score,
            });
            self.log_player_action(ActionCode::Deliver, out_events);
        }
    }

    fn bot_collect(&mut self, ingredient: IngredientId, out_events: &mut Vec<Event>) {
        let Some(index) = self.ingredients.iter().position(|item| item.id == ingredient) else {
            return;
        };
        let kind = self.ingredients[index].kind;
        if self
            .bot
            .carrier
            .collect_unconditionally(kind, &self.config.rules)
        {
            let _ = self.ingredients.remove(index);
            out_events.push(Event::IngredientCollected {
                actor: Actor::Bot,
                ingredient,
                kind,
            });
        } else {
            out_events.push(Event::CollectRejected {
                actor: Actor::Bot,
                ingredient,
            });
        }
    }

    fn bot_craft(&mut self, out_events: &mut Vec<Event>) {
        let scored = match self.config.rules.pickup {
            PickupRule::Ingredients => self
                .bot
                .carrier
                .take_best_recipe(&self.recipes)
                .map(|recipe| {
                    out_events.push(Event::RecipeCrafted {
                        actor: Actor::Bot,
                        recipe: recipe.id,
                        points: recipe.points,
                    });
                    self.bot.carrier.credit(recipe.points);
                    (recipe.id, recipe.points)
                }),
            PickupRule::Pizzas { .. } => self
                .bot
                .carrier
                .deliver_one()
                .map(|item| (item.recipe, item.points)),
        };

        if let Some((recipe, points)) = scored {
            out_events.push(Event::ItemDelivered {
                actor: Actor::Bot,
                recipe,
                points,
                score: self.bot.carrier.score,
            });
        }
    }

    fn spawn_ingredient(&mut self, kind: IngredientKind, cell: CellCoord, out: &mut Vec<Event>) {
        if !self.map.is_walkable(cell) {
            return;
        }
        let id = IngredientId::new(self.next_ingredient);
        self.next_ingredient = self.next_ingredient.saturating_add(1);
        self.ingredients.push(Ingredient {
            id,
            kind,
            cell,
            position: cell.center(self.tile_length()),
        });
        out.push(Event::IngredientSpawned {
            ingredient: id,
            kind,
            cell,
        });
    }

    fn drop_sabotage_zone(&mut self, at: Vec2, out_events: &mut Vec<Event>) {
        let zone = SabotageZone {
            id: ZoneId::new(self.next_zone),
            center: at,
            radius: self.config.sabotage_radius_tiles * self.tile_length(),
            created_at: self.clock.elapsed,
            lifetime: self.config.sabotage_lifetime(),
        };
        self.next_zone = self.next_zone.saturating_add(1);
        debug!(zone = zone.id.get(), x = at.x, y = at.y, "sabotage_zone_created");
        self.zones.push(zone);
        out_events.push(Event::SabotageZoneCreated {
            zone: zone.id,
            at,
            radius: zone.radius,
        });
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock.elapsed = self.clock.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if self.advance_countdown(dt, out_events) {
            return;
        }

        let now = self.clock.elapsed;
        self.zones.retain(|zone| {
            if zone.expired_at(now) {
                out_events.push(Event::SabotageZoneExpired { zone: zone.id });
                false
            } else {
                true
            }
        });

        for actor in [Actor::Player, Actor::Bot] {
            self.move_actor(actor, dt);
        }
    }

    /// Returns `true` when the round ended during this call.
    fn advance_countdown(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> bool {
        self.clock.pending = self.clock.pending.saturating_add(dt);
        while self.clock.pending >= CLOCK_QUANTUM && self.clock.remaining > 0 {
            self.clock.pending -= CLOCK_QUANTUM;
            self.clock.remaining -= 1;
            out_events.push(Event::ClockTicked {
                remaining: self.clock.remaining,
                urgent: self.clock.remaining <= self.config.urgent_seconds,
            });
        }

        if self.clock.remaining > 0 {
            return false;
        }

        self.end_round(out_events);
        true
    }

    fn end_round(&mut self, out_events: &mut Vec<Event>) {
        self.clock.phase = RoundPhase::Ended;
        for body in [&mut self.player, &mut self.bot] {
            body.intent = Vec2::ZERO;
            body.velocity = Vec2::ZERO;
        }
        let summary = self.summary();
        info!(
            player_score = summary.player_score,
            player_deliveries = summary.player_deliveries,
            bot_score = summary.bot_score,
            bot_deliveries = summary.bot_deliveries,
            actions = summary.move_log.len(),
            "round_ended"
        );
        out_events.push(Event::RoundEnded { summary });
    }

    fn summary(&self) -> RoundSummary {
        RoundSummary {
            player_score: self.player.carrier.score,
            player_deliveries: self.player.carrier.deliveries,
            bot_score: self.bot.carrier.score,
            bot_deliveries: self.bot.carrier.deliveries,
            move_log: self.move_log.clone(),
        }
    }

    fn move_actor(&mut self, actor: Actor, dt: Duration) {
        let speed = self.speed(actor);
        let look_ahead = self.config.look_ahead;
        let damping = self.config.sabotage_damping;
        let body = self.body(actor);
        let resolved = resolve_velocity(body.position, body.intent, &self.map, speed, look_ahead);
        let velocity = damp_velocity(body.position, resolved, &self.zones, damping);
        let position = resolver::integrate(body.position, velocity, dt, &self.map);

        let body = self.body_mut(actor);
        body.velocity = velocity;
        body.position = position;
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands issued before `StartRound` or after the round ended are ignored
/// and emit no events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Command::StartRound = command {
        if world.clock.phase == RoundPhase::Waiting {
            world.clock.phase = RoundPhase::Running;
            let duration = world.config.round_duration();
            info!(duration_secs = duration.as_secs(), "round_started");
            out_events.push(Event::RoundStarted { duration });
        }
        return;
    }

    if world.clock.phase != RoundPhase::Running {
        return;
    }

    match command {
        Command::StartRound => {}
        Command::Tick { dt } => world.advance(dt, out_events),
        Command::Steer { actor, intent } => {
            world.body_mut(actor).intent = if intent.is_finite() {
                intent.clamp_length_max(1.0)
            } else {
                Vec2::ZERO
            };
        }
        Command::PrimaryAction => world.primary_action(out_events),
        Command::DeliverAction => world.deliver_action(out_events),
        Command::SpawnIngredient { kind, cell } => world.spawn_ingredient(kind, cell, out_events),
        Command::BotCollect { ingredient } => world.bot_collect(ingredient, out_events),
        Command::BotCraft => world.bot_craft(out_events),
        Command::SetBotState { state } => {
            if world.bot_state != state {
                out_events.push(Event::BotStateChanged {
                    from: world.bot_state,
                    to: state,
                });
                world.bot_state = state;
            }
        }
        Command::DropSabotageZone { at } => world.drop_sabotage_zone(at, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{RoundPhase, TileMap, World};
    use pizza_brawl_core::{
        Actor, ActorSnapshot, CellCoord, IngredientCatalog, IngredientSnapshot, MoveLog, Recipe,
        RecipeBook, RuleSet, Vec2, WalkabilityView,
    };

    use crate::{ArenaConfig, SabotageZone};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the arena was built from.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Provides read-only access to the arena's walkability map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Captures a read-only view of which tiles are walkable.
    #[must_use]
    pub fn walkability_view(world: &World) -> WalkabilityView<'_> {
        world.map.view()
    }

    /// Variant rules in force.
    #[must_use]
    pub fn rules(world: &World) -> &RuleSet {
        &world.config.rules
    }

    /// Recipe catalog, most valuable first.
    #[must_use]
    pub fn recipe_book(world: &World) -> &RecipeBook {
        &world.recipes
    }

    /// Spawnable ingredient catalog.
    #[must_use]
    pub fn ingredient_catalog(world: &World) -> &IngredientCatalog {
        &world.catalog
    }

    /// Captures the active ingredients ordered by identifier.
    #[must_use]
    pub fn ingredients(world: &World) -> Vec<IngredientSnapshot> {
        let mut snapshots: Vec<IngredientSnapshot> = world
            .ingredients
            .iter()
            .map(|ingredient| IngredientSnapshot {
                id: ingredient.id,
                kind: ingredient.kind,
                cell: ingredient.cell,
                position: ingredient.position,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Number of ingredients currently lying in the arena.
    #[must_use]
    pub fn active_ingredient_count(world: &World) -> usize {
        world.ingredients.len()
    }

    /// Tiles holding delivery points.
    #[must_use]
    pub fn delivery_cells(world: &World) -> &[CellCoord] {
        &world.delivery_points
    }

    /// Centres of the delivery points in world units.
    #[must_use]
    pub fn delivery_positions(world: &World) -> Vec<Vec2> {
        world
            .delivery_points
            .iter()
            .map(|cell| cell.center(world.config.tile_length))
            .collect()
    }

    /// Captures the state of an actor.
    #[must_use]
    pub fn actor(world: &World, actor: Actor) -> ActorSnapshot {
        let body = world.body(actor);
        ActorSnapshot {
            actor,
            position: body.position,
            velocity: body.velocity,
            inventory: body.carrier.inventory.clone(),
            crafted: body.carrier.crafted.iter().copied().collect(),
            score: body.carrier.score,
            deliveries: body.carrier.deliveries,
            bot_state: match actor {
                Actor::Player => None,
                Actor::Bot => Some(world.bot_state),
            },
        }
    }

    /// Tile currently occupied by the actor.
    #[must_use]
    pub fn actor_cell(world: &World, actor: Actor) -> Option<CellCoord> {
        world.map.cell_at(world.body(actor).position)
    }

    /// Reports whether the actor could craft (or hand in a stacked pizza) right now.
    #[must_use]
    pub fn can_craft(world: &World, actor: Actor) -> bool {
        world
            .body(actor)
            .carrier
            .can_craft(&world.recipes, &world.config.rules)
    }

    /// Active sabotage zones in creation order.
    #[must_use]
    pub fn sabotage_zones(world: &World) -> &[SabotageZone] {
        &world.zones
    }

    /// Current round phase.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world.clock.phase
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub fn remaining_seconds(world: &World) -> u32 {
        world.clock.remaining
    }

    /// Simulated time elapsed since the round started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock.elapsed
    }

    /// Player actions recorded so far.
    #[must_use]
    pub fn move_log(world: &World) -> &MoveLog {
        &world.move_log
    }

    /// Action the HUD should suggest to the player.
    #[must_use]
    pub fn craft_hint(world: &World) -> Option<CraftHint> {
        let carrier = &world.player.carrier;
        if !carrier.crafted.is_empty() {
            return Some(CraftHint::Deliver);
        }
        world
            .recipes
            .recipes()
            .iter()
            .rev()
            .find(|recipe| recipe.satisfied_by(&carrier.inventory))
            .cloned()
            .map(CraftHint::Craft)
    }

    /// Suggested next action for the player.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum CraftHint {
        /// A crafted item is waiting to be delivered.
        Deliver,
        /// The held ingredients satisfy the recipe.
        Craft(Recipe),
    }
}

#[derive(Clone, Copy, Debug)]
struct Ingredient {
    id: IngredientId,
    kind: IngredientKind,
    cell: CellCoord,
    position: Vec2,
}

#[derive(Clone, Debug)]
struct Body {
    position: Vec2,
    intent: Vec2,
    velocity: Vec2,
    carrier: Carrier,
}

impl Body {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            intent: Vec2::ZERO,
            velocity: Vec2::ZERO,
            carrier: Carrier::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RoundClock {
    phase: RoundPhase,
    remaining: u32,
    pending: Duration,
    elapsed: Duration,
}

impl RoundClock {
    fn new(seconds: u32) -> Self {
        Self {
            phase: RoundPhase::Waiting,
            remaining: seconds,
            pending: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }
}
