#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bot sabotage cadence that drops movement-damping zones at the bot's feet.

use std::time::Duration;

use pizza_brawl_core::{Command, Event, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MIN_INTERVAL: Duration = Duration::from_secs(15);
const MAX_INTERVAL: Duration = Duration::from_secs(25);

/// Configuration parameters required to construct the sabotage system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    min_interval: Duration,
    max_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration drawing each interval uniformly from `min..=max`.
    ///
    /// Swapped bounds are reordered.
    #[must_use]
    pub fn new(min_interval: Duration, max_interval: Duration, rng_seed: u64) -> Self {
        Self {
            min_interval: min_interval.min(max_interval),
            max_interval: min_interval.max(max_interval),
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(MIN_INTERVAL, MAX_INTERVAL, 0)
    }
}

/// Pure system that schedules sabotage drops on a randomized interval.
#[derive(Debug)]
pub struct Sabotage {
    config: Config,
    elapsed: Duration,
    next_drop: Option<Duration>,
    finished: bool,
    rng: ChaCha8Rng,
}

impl Sabotage {
    /// Creates a new sabotage system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            elapsed: Duration::ZERO,
            next_drop: None,
            finished: false,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Time until the next scheduled drop, if the round is running.
    #[must_use]
    pub fn time_until_drop(&self) -> Option<Duration> {
        self.next_drop
            .map(|deadline| deadline.saturating_sub(self.elapsed))
    }

    /// Consumes world events and the bot position to emit sabotage commands.
    pub fn handle(&mut self, events: &[Event], bot_position: Vec2, out: &mut Vec<Command>) {
        if self.finished {
            return;
        }

        for event in events {
            match event {
                Event::RoundStarted { .. } if self.next_drop.is_none() => {
                    self.elapsed = Duration::ZERO;
                    self.next_drop = Some(self.draw_interval());
                }
                Event::TimeAdvanced { dt } => {
                    if self.next_drop.is_some() {
                        self.elapsed = self.elapsed.saturating_add(*dt);
                    }
                }
                Event::RoundEnded { .. } => {
                    self.finished = true;
                    self.next_drop = None;
                    return;
                }
                _ => {}
            }
        }

        while let Some(deadline) = self.next_drop {
            if self.elapsed < deadline {
                break;
            }
            out.push(Command::DropSabotageZone { at: bot_position });
            let interval = self.draw_interval().max(Duration::from_millis(1));
            self.next_drop = Some(deadline.saturating_add(interval));
        }
    }

    fn draw_interval(&mut self) -> Duration {
        let min = self.config.min_interval.as_millis();
        let max = self.config.max_interval.as_millis();
        let low = u64::try_from(min).unwrap_or(u64::MAX);
        let high = u64::try_from(max).unwrap_or(u64::MAX);
        Duration::from_millis(self.rng.gen_range(low..=high))
    }
}
