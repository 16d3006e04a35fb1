#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Pizza Brawl adapters.
//!
//! The arena core never depends on these types. Adapters translate world
//! snapshots into a [`Scene`], forward [`Cue`] requests to a
//! [`FeedbackSink`] and hand the final [`RoundSummary`] to a [`ResultSink`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use pizza_brawl_core::{
    Actor, CellCoord, Event, FogLevel, IngredientId, IngredientKind, RoundSummary,
    VisibilityField,
};
use std::{error::Error, fmt, time::Duration};

/// Straight-alpha RGBA color handed to backends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component, 0.0..=1.0.
    pub red: f32,
    /// Green component, 0.0..=1.0.
    pub green: f32,
    /// Blue component, 0.0..=1.0.
    pub blue: f32,
    /// Opacity, 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Color from normalised components.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from 8-bit components, as written in palette hex codes.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Palette entry used when drawing an ingredient.
    #[must_use]
    pub const fn for_ingredient(kind: IngredientKind) -> Self {
        match kind {
            IngredientKind::Dough => Self::from_rgb_u8(0xf5, 0xde, 0xb3),
            IngredientKind::Tomato => Self::from_rgb_u8(0xe5, 0x39, 0x35),
            IngredientKind::Cheese => Self::from_rgb_u8(0xff, 0xd5, 0x4f),
            IngredientKind::Pepperoni => Self::from_rgb_u8(0xb7, 0x1c, 0x1c),
            IngredientKind::Mushroom => Self::from_rgb_u8(0x8d, 0x6e, 0x63),
        }
    }

    /// Palette entry used when drawing an actor.
    #[must_use]
    pub const fn for_actor(actor: Actor) -> Self {
        match actor {
            Actor::Player => Self::from_rgb_u8(0x42, 0xa5, 0xf5),
            Actor::Bot => Self::from_rgb_u8(0xef, 0x6c, 0x00),
        }
    }
}

/// Player input sampled by the backend once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Desired movement direction with magnitude at most one.
    pub intent: Vec2,
    /// Whether the adapter detected a primary action press on this frame.
    pub primary_action: bool,
    /// Whether the adapter detected a deliver action press on this frame.
    pub deliver_action: bool,
}

/// Arena floor drawn as square tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Tiles across.
    pub columns: u32,
    /// Tiles down.
    pub rows: u32,
    /// Tile side in world units.
    pub tile_length: f32,
    /// Stroke color of the tile outlines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Validated floor layout.
    ///
    /// Returns an error when `tile_length` is not a positive number.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(tile_length > 0.0) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
        })
    }

    /// Arena width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Arena height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

}

/// Ingredient lying in the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngredientPresentation {
    /// Identifier allocated by the world.
    pub id: IngredientId,
    /// Kind of the ingredient.
    pub kind: IngredientKind,
    /// Centre of the ingredient in world units.
    pub position: Vec2,
    /// Fill color.
    pub color: Color,
}

/// Player or bot drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Which actor is drawn.
    pub actor: Actor,
    /// Centre of the actor in world units.
    pub position: Vec2,
    /// Fill color.
    pub color: Color,
    /// Crafted items carried, drawn as a stack of boxes on the actor's back.
    pub stacked: usize,
}

/// Sabotage zone drawn as a translucent circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZonePresentation {
    /// Centre of the zone in world units.
    pub center: Vec2,
    /// Radius of the zone in world units.
    pub radius: f32,
}

/// Heads-up display values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Player score.
    pub player_score: u32,
    /// Player deliveries.
    pub player_deliveries: u32,
    /// Bot score.
    pub bot_score: u32,
    /// Whole seconds left on the countdown.
    pub remaining_seconds: u32,
    /// Whether the timer should be drawn in its warning color.
    pub urgent: bool,
    /// Ingredients held by the player.
    pub inventory: Vec<IngredientKind>,
    /// Crafted items waiting to be delivered.
    pub ready: usize,
    /// Suggested next action, if any.
    pub hint: Option<String>,
}

impl HudPresentation {
    /// Color of the countdown text.
    #[must_use]
    pub const fn timer_color(&self) -> Color {
        if self.urgent {
            Color::from_rgb_u8(0xff, 0x44, 0x44)
        } else {
            Color::from_rgb_u8(0xff, 0xff, 0xff)
        }
    }
}

/// Scene description combining the tile grid and the arena inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena floor.
    pub tile_grid: TileGridPresentation,
    /// Wall tiles.
    pub walls: Vec<CellCoord>,
    /// Delivery point centres in world units.
    pub delivery_points: Vec<Vec2>,
    /// Ingredients lying in the arena.
    pub ingredients: Vec<IngredientPresentation>,
    /// Player and bot.
    pub actors: Vec<ActorPresentation>,
    /// Active sabotage zones.
    pub zones: Vec<ZonePresentation>,
    /// Fog tiers per tile. An empty field draws no fog.
    pub fog: VisibilityField,
    /// Heads-up display values.
    pub hud: HudPresentation,
    /// Progress of the closing fade in the range 0.0..=1.0.
    pub fade: f32,
    /// Set once the result has been handed off; backends may exit.
    pub finished: bool,
}

impl Scene {
    /// Creates a scene containing only the static layout.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        walls: Vec<CellCoord>,
        delivery_points: Vec<Vec2>,
    ) -> Self {
        Self {
            tile_grid,
            walls,
            delivery_points,
            ingredients: Vec::new(),
            actors: Vec::new(),
            zones: Vec::new(),
            fog: VisibilityField::default(),
            hud: HudPresentation::default(),
            fade: 0.0,
            finished: false,
        }
    }

    /// Opacity of the fog overlay above the provided tile.
    #[must_use]
    pub fn fog_opacity(&self, cell: CellCoord) -> f32 {
        if self.fog.levels().is_empty() {
            return FogLevel::Visible.opacity();
        }
        self.fog.level(cell).opacity()
    }

    /// Presentation of the provided actor, if present.
    #[must_use]
    pub fn actor(&self, actor: Actor) -> Option<&ActorPresentation> {
        self.actors.iter().find(|candidate| candidate.actor == actor)
    }
}

/// Everything a backend needs to open its surface and draw the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Window or terminal title.
    pub window_title: String,
    /// Background fill.
    pub clear_color: Color,
    /// Initial scene; updated in place every frame.
    pub scene: Scene,
}

impl Presentation {
    /// Bundles the title, background and initial scene.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Pizza Brawl scenes.
pub trait RenderingBackend {
    /// Drives frames until the scene is finished or the user quits.
    ///
    /// `update_scene` is called once per frame with the frame length and the
    /// sampled input, and refreshes the scene from the arena before drawing.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Fire-and-forget feedback requests derived from world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The player picked up an ingredient.
    Collect,
    /// The player crafted a recipe.
    Craft,
    /// The player scored a delivery.
    Deliver,
    /// A sabotage zone appeared.
    Sabotage,
    /// The countdown reached zero.
    RoundOver,
}

impl Cue {
    /// Maps a world event onto the cue it should trigger, if any.
    ///
    /// Bot pickups and crafts stay silent.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::IngredientCollected {
                actor: Actor::Player,
                ..
            } => Some(Self::Collect),
            Event::RecipeCrafted {
                actor: Actor::Player,
                ..
            } => Some(Self::Craft),
            Event::ItemDelivered {
                actor: Actor::Player,
                ..
            } => Some(Self::Deliver),
            Event::SabotageZoneCreated { .. } => Some(Self::Sabotage),
            Event::RoundEnded { .. } => Some(Self::RoundOver),
            _ => None,
        }
    }

    /// Synthesised tone describing the cue.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Collect => Tone::new(600.0, Waveform::Sine, 150),
            Self::Craft => Tone::new(880.0, Waveform::Sine, 200),
            Self::Deliver => Tone::new(1_200.0, Waveform::Sine, 300),
            Self::Sabotage => Tone::new(150.0, Waveform::Sawtooth, 300),
            Self::RoundOver => Tone::new(220.0, Waveform::Square, 500),
        }
    }
}

/// Oscillator shape used by a tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine.
    Sine,
    /// Buzzy sawtooth.
    Sawtooth,
    /// Hollow square.
    Square,
}

/// Short synthesised sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Frequency in hertz.
    pub frequency: f32,
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Length of the tone.
    pub duration: Duration,
}

impl Tone {
    const fn new(frequency: f32, waveform: Waveform, millis: u64) -> Self {
        Self {
            frequency,
            waveform,
            duration: Duration::from_millis(millis),
        }
    }
}

/// Audio or haptic sink receiving cue requests.
///
/// Failures are reported back but callers never let them interrupt play.
pub trait FeedbackSink {
    /// Plays the cue.
    fn play(&mut self, cue: Cue) -> AnyResult<()>;
}

/// Collaborator receiving the terminal summary of a round.
pub trait ResultSink {
    /// Receives the summary. Called exactly once per round.
    fn submit(&mut self, summary: &RoundSummary) -> AnyResult<()>;
}

/// Invalid presentation parameters.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive side length.
    InvalidTileLength {
        /// Rejected value.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
