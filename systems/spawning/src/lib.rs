#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting ingredient spawn commands.

use std::time::Duration;

use pizza_brawl_core::{CellCoord, Command, Event, IngredientCatalog, WalkabilityView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OPENING_BATCH: usize = 12;
const RESPAWN_INTERVAL: Duration = Duration::from_secs(5);
const ACTIVE_FLOOR: usize = 8;
const RESPAWN_BATCH: usize = 3;
const SPAWN_MARGIN: u32 = 2;
const PLACEMENT_ATTEMPTS: u32 = 50;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    opening_batch: usize,
    respawn_interval: Duration,
    active_floor: usize,
    respawn_batch: usize,
    margin: u32,
    max_attempts: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates the stock arena cadence seeded with the provided value.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            opening_batch: OPENING_BATCH,
            respawn_interval: RESPAWN_INTERVAL,
            active_floor: ACTIVE_FLOOR,
            respawn_batch: RESPAWN_BATCH,
            margin: SPAWN_MARGIN,
            max_attempts: PLACEMENT_ATTEMPTS,
            rng_seed,
        }
    }

    /// Overrides the number of ingredients scattered when the round starts.
    #[must_use]
    pub const fn with_opening_batch(mut self, opening_batch: usize) -> Self {
        self.opening_batch = opening_batch;
        self
    }

    /// Overrides the top-up cadence.
    ///
    /// Every `interval`, a batch of `batch` ingredients is requested when fewer
    /// than `floor` ingredients lie in the arena.
    #[must_use]
    pub const fn with_respawn(mut self, interval: Duration, floor: usize, batch: usize) -> Self {
        self.respawn_interval = interval;
        self.active_floor = floor;
        self.respawn_batch = batch;
        self
    }

    /// Overrides the tile margin and the rejection sampling budget.
    #[must_use]
    pub const fn with_placement(mut self, margin: u32, max_attempts: u32) -> Self {
        self.margin = margin;
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Waiting,
    Active,
    Finished,
}

/// Pure system that deterministically emits spawn commands while a round runs.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    phase: Phase,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            phase: Phase::Waiting,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// `active` is the number of ingredients currently lying in the arena.
    pub fn handle(
        &mut self,
        events: &[Event],
        walkable: WalkabilityView<'_>,
        catalog: &IngredientCatalog,
        active: usize,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        let mut requested = 0;

        for event in events {
            match event {
                Event::RoundStarted { .. } if self.phase == Phase::Waiting => {
                    self.phase = Phase::Active;
                    let batch = self.config.opening_batch;
                    requested += self.spawn_batch(batch, walkable, catalog, out);
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
        for _ in 0..self.resolve_respawn_attempts() {
            if active + requested < self.config.active_floor {
                requested += self.spawn_batch(self.config.respawn_batch, walkable, catalog, out);
            }
        }
    }

    fn resolve_respawn_attempts(&mut self) -> usize {
        if self.config.respawn_interval.is_zero() {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.config.respawn_interval {
            self.accumulator -= self.config.respawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn spawn_batch(
        &mut self,
        count: usize,
        walkable: WalkabilityView<'_>,
        catalog: &IngredientCatalog,
        out: &mut Vec<Command>,
    ) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if let Some(command) = self.try_spawn(walkable, catalog) {
                out.push(command);
                spawned += 1;
            }
        }
        spawned
    }

    fn try_spawn(
        &mut self,
        walkable: WalkabilityView<'_>,
        catalog: &IngredientCatalog,
    ) -> Option<Command> {
        let total = catalog.total_weight();
        if total == 0 {
            return None;
        }
        let kind = catalog.pick(self.rng.gen_range(0..total))?;
        let cell = self.pick_cell(walkable)?;
        Some(Command::SpawnIngredient { kind, cell })
    }

    /// Bounded rejection sampling of a walkable tile inside the margin.
    ///
    /// Returns `None` when the inset is empty or every attempt lands on a
    /// wall; the spawn is skipped in that case.
    fn pick_cell(&mut self, walkable: WalkabilityView<'_>) -> Option<CellCoord> {
        let (columns, rows) = walkable.dimensions();
        let margin = self.config.margin;
        let inset = margin.saturating_mul(2);
        if columns <= inset || rows <= inset {
            return None;
        }

        for _ in 0..self.config.max_attempts {
            let cell = CellCoord::new(
                self.rng.gen_range(margin..columns - margin),
                self.rng.gen_range(margin..rows - margin),
            );
            if walkable.is_walkable(cell) {
                return Some(cell);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_respawn_attempts_without_interval() {
        let config = Config::new(1).with_respawn(Duration::ZERO, 8, 3);
        let mut spawning = Spawning::new(config);
        spawning.accumulator = Duration::from_secs(10);
        assert_eq!(spawning.resolve_respawn_attempts(), 0);
        assert_eq!(spawning.accumulator, Duration::ZERO);
    }

    #[test]
    fn carries_leftover_time_between_attempts() {
        let mut spawning = Spawning::new(Config::new(1));
        spawning.accumulator = Duration::from_millis(11_500);
        assert_eq!(spawning.resolve_respawn_attempts(), 2);
        assert_eq!(spawning.accumulator, Duration::from_millis(1_500));
    }

    #[test]
    fn picks_cells_inside_the_margin() {
        let (columns, rows) = (20, 15);
        let flags: Vec<bool> = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| {
                    column != 0 && row != 0 && column + 1 != columns && row + 1 != rows
                })
            })
            .collect();
        let view = WalkabilityView::new(&flags, columns, rows);
        let mut spawning = Spawning::new(Config::new(7));
        for _ in 0..200 {
            let cell = spawning
                .pick_cell(view)
                .expect("open interior always yields a cell");
            assert!((2..18).contains(&cell.column()));
            assert!((2..13).contains(&cell.row()));
            assert!(view.is_walkable(cell));
        }
    }

    #[test]
    fn gives_up_when_every_tile_is_blocked() {
        let flags = [false; 16];
        let view = WalkabilityView::new(&flags, 4, 4);
        let mut spawning = Spawning::new(Config::new(1).with_placement(0, 50));
        assert_eq!(spawning.pick_cell(view), None);
    }

    #[test]
    fn oversized_margins_yield_nothing() {
        let flags = [true; 16];
        let view = WalkabilityView::new(&flags, 4, 4);
        let mut spawning = Spawning::new(Config::new(1));
        assert_eq!(spawning.pick_cell(view), None);
    }
}
