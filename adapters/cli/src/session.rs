//! Frame driver wiring the world, the systems and the presentation together.

use std::time::Duration;

use anyhow::{Context, Result};
use pizza_brawl_core::{Actor, ActorSnapshot, CellCoord, Command, Event, RoundSummary};
use pizza_brawl_rendering::{
    ActorPresentation, Color, Cue, FeedbackSink, FrameInput, HudPresentation,
    IngredientPresentation, ResultSink, Scene, TileGridPresentation, ZonePresentation,
};
use pizza_brawl_system_bootstrap::Bootstrap;
use pizza_brawl_system_bot::{Bot, Surroundings};
use pizza_brawl_system_controls::{ControlInput, Controls};
use pizza_brawl_system_sabotage::Sabotage;
use pizza_brawl_system_spawning::Spawning;
use pizza_brawl_system_visibility::Visibility;
use pizza_brawl_world::{
    self as world,
    query::{self, CraftHint},
    World,
};
use tracing::{debug, info, warn};

use crate::settings::SessionSettings;

const MAX_PUMP_ROUNDS: usize = 8;

/// Builds the static part of the scene from the arena layout.
pub(crate) fn layout_scene(world: &World) -> Result<Scene> {
    let bootstrap = Bootstrap;
    let map = bootstrap.tile_map(world);
    let columns = map.columns().get();
    let rows = map.rows().get();
    let tile_grid = TileGridPresentation::new(
        columns,
        rows,
        map.tile_length(),
        Color::from_rgb_u8(0x33, 0x33, 0x33),
    )
    .context("arena tiles cannot be presented")?;

    let walls = (0..rows)
        .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| !map.is_walkable(*cell))
        .collect();
    let delivery_points = bootstrap
        .delivery_cells(world)
        .iter()
        .map(|cell| cell.center(map.tile_length()))
        .collect();

    Ok(Scene::new(tile_grid, walls, delivery_points))
}

#[derive(Debug)]
enum Stage {
    Playing,
    Closing { summary: RoundSummary, elapsed: Duration },
    Finished,
}

/// Owns one round and advances it once per rendered frame.
pub(crate) struct Session {
    world: World,
    controls: Controls,
    spawning: Spawning,
    bot: Bot,
    sabotage: Sabotage,
    visibility: Visibility,
    feedback: Box<dyn FeedbackSink>,
    results: Box<dyn ResultSink>,
    fade: Duration,
    stage: Stage,
    urgent: bool,
    pending_events: Vec<Event>,
    failure: Option<anyhow::Error>,
}

impl Session {
    pub(crate) fn new(
        world: World,
        settings: &SessionSettings,
        feedback: Box<dyn FeedbackSink>,
        results: Box<dyn ResultSink>,
    ) -> Self {
        Self {
            world,
            controls: Controls::new(),
            spawning: Spawning::new(settings.spawning_config()),
            bot: Bot::new(settings.bot_config()),
            sabotage: Sabotage::new(settings.sabotage_config()),
            visibility: Visibility::new(settings.visibility_config()),
            feedback,
            results,
            fade: settings.fade(),
            stage: Stage::Playing,
            urgent: false,
            pending_events: Vec::new(),
            failure: None,
        }
    }

    /// Opens the round and lets the systems react to it.
    pub(crate) fn start(&mut self, scene: &mut Scene) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::StartRound, &mut events);
        self.settle(events, scene);
    }

    /// Advances the round by one frame and refreshes the scene.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        match &mut self.stage {
            Stage::Playing => {}
            Stage::Closing { elapsed, .. } => {
                *elapsed = elapsed.saturating_add(dt);
                self.close(scene);
                return;
            }
            Stage::Finished => {
                scene.finished = true;
                return;
            }
        }

        let mut commands = Vec::new();
        self.controls.handle(
            &self.pending_events,
            ControlInput::new(input.intent, input.primary_action, input.deliver_action),
            &mut commands,
        );

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.settle(events, scene);
    }

    /// Takes the error raised while handing off the summary, if any.
    pub(crate) fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn settle(&mut self, events: Vec<Event>, scene: &mut Scene) {
        let mut frame_events = Vec::new();
        let mut batch = events;
        for _ in 0..MAX_PUMP_ROUNDS {
            if batch.is_empty() {
                break;
            }
            let commands = self.pump_systems(&batch);
            frame_events.append(&mut batch);
            for command in commands {
                world::apply(&mut self.world, command, &mut batch);
            }
        }
        if !batch.is_empty() {
            warn!(pending = batch.len(), "system_pump_exhausted");
            frame_events.append(&mut batch);
        }

        for event in &frame_events {
            match event {
                Event::ClockTicked { urgent, .. } => self.urgent = *urgent,
                Event::RoundEnded { summary } => {
                    self.stage = Stage::Closing {
                        summary: summary.clone(),
                        elapsed: Duration::ZERO,
                    };
                }
                _ => {}
            }
            if let Some(cue) = Cue::for_event(event) {
                if let Err(error) = self.feedback.play(cue) {
                    debug!(?cue, %error, "cue_failed");
                }
            }
        }

        self.populate(scene);
        self.pending_events = frame_events;

        if matches!(self.stage, Stage::Closing { .. }) {
            self.close(scene);
        }
    }

    fn pump_systems(&mut self, events: &[Event]) -> Vec<Command> {
        let mut commands = Vec::new();

        let bot = query::actor(&self.world, Actor::Bot);
        let ingredients = query::ingredients(&self.world);
        let delivery_points = query::delivery_positions(&self.world);
        let surroundings = Surroundings {
            bot: &bot,
            ingredients: &ingredients,
            delivery_points: &delivery_points,
            recipes: query::recipe_book(&self.world),
            rules: query::rules(&self.world),
        };
        self.bot.handle(events, &surroundings, &mut commands);

        self.spawning.handle(
            events,
            query::walkability_view(&self.world),
            query::ingredient_catalog(&self.world),
            query::active_ingredient_count(&self.world),
            &mut commands,
        );

        self.sabotage.handle(events, bot.position, &mut commands);
        commands
    }

    fn populate(&mut self, scene: &mut Scene) {
        let world = &self.world;
        let map = query::tile_map(world);
        let fog = self.visibility.update(
            query::rules(world).fog_of_war,
            query::actor_cell(world, Actor::Player),
            map.columns(),
            map.rows(),
        );
        scene.fog = fog.clone();

        scene.ingredients = query::ingredients(world)
            .into_iter()
            .map(|ingredient| IngredientPresentation {
                id: ingredient.id,
                kind: ingredient.kind,
                position: ingredient.position,
                color: Color::for_ingredient(ingredient.kind),
            })
            .collect();

        let player = query::actor(world, Actor::Player);
        let bot = query::actor(world, Actor::Bot);
        scene.actors = [&player, &bot].into_iter().map(present_actor).collect();

        scene.zones = query::sabotage_zones(world)
            .iter()
            .map(|zone| ZonePresentation {
                center: zone.center,
                radius: zone.radius,
            })
            .collect();

        scene.hud = HudPresentation {
            player_score: player.score,
            player_deliveries: player.deliveries,
            bot_score: bot.score,
            remaining_seconds: query::remaining_seconds(world),
            urgent: self.urgent,
            inventory: player.inventory.clone(),
            ready: player.crafted.len(),
            hint: query::craft_hint(world).map(|hint| match hint {
                CraftHint::Deliver => String::from("Deliver your order"),
                CraftHint::Craft(recipe) => format!("Ready to craft {}", recipe.name),
            }),
        };
    }

    fn close(&mut self, scene: &mut Scene) {
        let Stage::Closing { summary, elapsed } = &self.stage else {
            return;
        };
        scene.fade = if self.fade.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.fade.as_secs_f32()).min(1.0)
        };
        if *elapsed < self.fade {
            return;
        }

        match self.results.submit(summary) {
            Ok(()) => info!(
                player_score = summary.player_score,
                bot_score = summary.bot_score,
                "summary_submitted"
            ),
            Err(error) => self.failure = Some(error.context("result hand-off failed")),
        }
        self.stage = Stage::Finished;
        scene.finished = true;
    }
}

fn present_actor(snapshot: &ActorSnapshot) -> ActorPresentation {
    ActorPresentation {
        actor: snapshot.actor,
        position: snapshot.position,
        color: Color::for_actor(snapshot.actor),
        stacked: snapshot.crafted.len(),
    }
}
