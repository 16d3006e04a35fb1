//! Windowless rendering backend that simulates frames at a fixed rate.

use std::time::Duration;

use anyhow::{bail, Result};
use glam::Vec2;
use pizza_brawl_core::Actor;
use pizza_brawl_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use tracing::{debug, info};

/// Fraction of a tile within which the autopilot presses collect.
const COLLECT_REACH_TILES: f32 = 1.0;
/// Fraction of a tile within which the autopilot presses deliver.
const DELIVER_REACH_TILES: f32 = 1.25;

/// Backend that drives the scene without opening a window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    frame: Duration,
    max_frames: u64,
    autopilot: bool,
}

impl HeadlessBackend {
    pub(crate) fn new(frame: Duration, max_frames: u64) -> Self {
        Self {
            frame,
            max_frames,
            autopilot: false,
        }
    }

    /// Lets a simple scripted player steer when enabled.
    pub(crate) fn with_autopilot(mut self, enabled: bool) -> Self {
        self.autopilot = enabled;
        self
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;
        let mut scene = scene;
        info!(
            title = %window_title,
            width = scene.tile_grid.width(),
            height = scene.tile_grid.height(),
            autopilot = self.autopilot,
            "headless_started"
        );

        for frame in 0..self.max_frames {
            let input = if self.autopilot {
                autopilot_input(&scene)
            } else {
                FrameInput::default()
            };
            update_scene(self.frame, input, &mut scene);
            if scene.finished {
                debug!(frames = frame + 1, "headless_finished");
                return Ok(());
            }
        }

        bail!(
            "round did not finish within {} frames of {:?}",
            self.max_frames,
            self.frame
        )
    }
}

/// Derives player input from the scene alone.
///
/// Carried orders are taken to the nearest delivery point. Otherwise the
/// player crafts when the HUD offers a recipe and walks to the nearest
/// ingredient.
pub(crate) fn autopilot_input(scene: &Scene) -> FrameInput {
    let Some(player) = scene.actor(Actor::Player) else {
        return FrameInput::default();
    };
    let tile = scene.tile_grid.tile_length;

    if scene.hud.ready > 0 {
        return approach(
            player.position,
            scene.delivery_points.iter().copied(),
            DELIVER_REACH_TILES * tile,
            |input| input.deliver_action = true,
        );
    }

    if scene.hud.hint.is_some() {
        return FrameInput {
            primary_action: true,
            ..FrameInput::default()
        };
    }

    approach(
        player.position,
        scene.ingredients.iter().map(|ingredient| ingredient.position),
        COLLECT_REACH_TILES * tile,
        |input| input.primary_action = true,
    )
}

fn approach(
    from: Vec2,
    targets: impl Iterator<Item = Vec2>,
    reach: f32,
    act: impl FnOnce(&mut FrameInput),
) -> FrameInput {
    let nearest = targets.min_by(|a, b| from.distance(*a).total_cmp(&from.distance(*b)));
    let mut input = FrameInput::default();
    if let Some(target) = nearest {
        if from.distance(target) < reach {
            act(&mut input);
        } else {
            input.intent = (target - from).normalize_or_zero();
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizza_brawl_core::{CellCoord, IngredientId, IngredientKind};
    use pizza_brawl_rendering::{
        ActorPresentation, Color, IngredientPresentation, TileGridPresentation,
    };
    use std::{cell::Cell, rc::Rc};

    fn scene_with_player(position: Vec2) -> Scene {
        let grid = TileGridPresentation::new(20, 15, 40.0, Color::from_rgb_u8(0, 0, 0))
            .expect("valid grid");
        let mut scene = Scene::new(grid, Vec::new(), vec![Vec2::new(140.0, 140.0)]);
        scene.actors.push(ActorPresentation {
            actor: Actor::Player,
            position,
            color: Color::for_actor(Actor::Player),
            stacked: 0,
        });
        scene.ingredients.push(IngredientPresentation {
            id: IngredientId::new(0),
            kind: IngredientKind::Dough,
            position: CellCoord::new(10, 5).center(40.0),
            color: Color::for_ingredient(IngredientKind::Dough),
        });
        scene
    }

    #[test]
    fn walks_toward_the_nearest_ingredient() {
        let scene = scene_with_player(Vec2::new(420.0, 420.0));
        let input = autopilot_input(&scene);
        assert!(!input.primary_action);
        assert_eq!(input.intent, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn collects_when_in_reach() {
        let scene = scene_with_player(Vec2::new(420.0, 230.0));
        let input = autopilot_input(&scene);
        assert!(input.primary_action);
        assert_eq!(input.intent, Vec2::ZERO);
    }

    #[test]
    fn heads_for_delivery_while_carrying() {
        let mut scene = scene_with_player(Vec2::new(140.0, 300.0));
        scene.hud.ready = 1;
        let input = autopilot_input(&scene);
        assert_eq!(input.intent, Vec2::new(0.0, -1.0));

        scene.actors[0].position = Vec2::new(140.0, 160.0);
        let input = autopilot_input(&scene);
        assert!(input.deliver_action);
        assert!(!input.primary_action);
    }

    #[test]
    fn crafts_when_a_recipe_is_offered() {
        let mut scene = scene_with_player(Vec2::new(420.0, 420.0));
        scene.hud.hint = Some(String::from("Ready to craft Margherita"));
        let input = autopilot_input(&scene);
        assert!(input.primary_action);
        assert_eq!(input.intent, Vec2::ZERO);
    }

    #[test]
    fn stops_once_the_scene_is_finished() {
        let frames = Rc::new(Cell::new(0));
        let counter = Rc::clone(&frames);
        let scene = scene_with_player(Vec2::ZERO);
        let backend = HeadlessBackend::new(Duration::from_millis(16), 100);
        backend
            .run(
                Presentation::new("test", Color::from_rgb_u8(0, 0, 0), scene),
                move |_, _, scene| {
                    counter.set(counter.get() + 1);
                    scene.finished = counter.get() == 5;
                },
            )
            .expect("backend finishes");
        assert_eq!(frames.get(), 5);
    }

    #[test]
    fn gives_up_after_the_frame_budget() {
        let scene = scene_with_player(Vec2::ZERO);
        let backend = HeadlessBackend::new(Duration::from_millis(16), 3);
        let result = backend.run(
            Presentation::new("test", Color::from_rgb_u8(0, 0, 0), scene),
            |_, _, _| {},
        );
        assert!(result.is_err());
    }
}
