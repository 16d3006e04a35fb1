#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating per-frame player input into world commands.

use pizza_brawl_core::{Actor, Command, Event, Vec2};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlInput {
    /// Desired direction of travel; magnitudes above one are clamped.
    pub intent: Vec2,
    /// Indicates whether the primary action was pressed on this frame.
    pub primary_action: bool,
    /// Indicates whether the deliver action was pressed on this frame.
    pub deliver_action: bool,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(intent: Vec2, primary_action: bool, deliver_action: bool) -> Self {
        Self {
            intent,
            primary_action,
            deliver_action,
        }
    }
}

impl Default for ControlInput {
    fn default() -> Self {
        Self::new(Vec2::ZERO, false, false)
    }
}

/// Control system that forwards player input while a round runs.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    live: bool,
    finished: bool,
    last_intent: Vec2,
}

impl Controls {
    /// Creates a new controls system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            live: false,
            finished: false,
            last_intent: Vec2::ZERO,
        }
    }

    /// Consumes world events and adapter-derived input to emit player commands.
    ///
    /// Steering is only re-issued when the intent changes; action pulses are
    /// forwarded on every frame they are set, primary before deliver.
    pub fn handle(&mut self, events: &[Event], input: ControlInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundStarted { .. } if !self.finished => self.live = true,
                Event::RoundEnded { .. } => {
                    self.live = false;
                    self.finished = true;
                }
                _ => {}
            }
        }

        if !self.live {
            return;
        }

        let intent = if input.intent.is_finite() {
            input.intent.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        if intent != self.last_intent {
            self.last_intent = intent;
            out.push(Command::Steer {
                actor: Actor::Player,
                intent,
            });
        }

        if input.primary_action {
            out.push(Command::PrimaryAction);
        }
        if input.deliver_action {
            out.push(Command::DeliverAction);
        }
    }
}
