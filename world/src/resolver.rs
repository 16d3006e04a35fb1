//! Converts movement intent into a velocity validated against the tile map.

use std::time::Duration;

use pizza_brawl_core::{Vec2, ZoneId};

use crate::grid::TileMap;

/// Upper bound on sub-steps taken by a single integration.
const MAX_SUBSTEPS: u32 = 256;

/// Temporary circle that damps movement of every actor inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SabotageZone {
    /// Identifier allocated by the world.
    pub id: ZoneId,
    /// Centre of the zone in world units.
    pub center: Vec2,
    /// Radius of the zone in world units.
    pub radius: f32,
    /// Round clock reading when the zone appeared.
    pub created_at: Duration,
    /// How long the zone persists.
    pub lifetime: Duration,
}

impl SabotageZone {
    /// Reports whether the position lies strictly inside the zone.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        self.center.distance(position) < self.radius
    }

    /// Reports whether the zone outlived its lifetime at the provided clock reading.
    #[must_use]
    pub fn expired_at(&self, now: Duration) -> bool {
        now.saturating_sub(self.created_at) >= self.lifetime
    }
}

/// Scales intent by speed and zeroes every axis heading into a wall.
///
/// Each axis is probed independently `look_ahead` units ahead of the
/// position while the other coordinate stays put, so an actor pressing
/// diagonally into a wall keeps sliding along it.
#[must_use]
pub fn resolve_velocity(
    position: Vec2,
    intent: Vec2,
    map: &TileMap,
    speed: f32,
    look_ahead: f32,
) -> Vec2 {
    let mut velocity = intent.clamp_length_max(1.0) * speed.max(0.0);

    if velocity.x != 0.0 {
        let probe = Vec2::new(position.x + look_ahead.copysign(velocity.x), position.y);
        if !map.is_walkable_at(probe) {
            velocity.x = 0.0;
        }
    }
    if velocity.y != 0.0 {
        let probe = Vec2::new(position.x, position.y + look_ahead.copysign(velocity.y));
        if !map.is_walkable_at(probe) {
            velocity.y = 0.0;
        }
    }
    velocity
}

/// Applies the sabotage multiplier once if any zone contains the position.
///
/// Overlapping zones do not compound.
#[must_use]
pub fn damp_velocity(
    position: Vec2,
    velocity: Vec2,
    zones: &[SabotageZone],
    damping: f32,
) -> Vec2 {
    if zones.iter().any(|zone| zone.contains(position)) {
        velocity * damping
    } else {
        velocity
    }
}

/// Moves a position by `velocity * dt`, one axis at a time.
///
/// Travel is split into sub-steps no longer than a quarter tile; an axis
/// step that would place the position on a non-walkable tile is dropped.
/// Travel beyond `MAX_SUBSTEPS` quarter tiles in one call is cut short.
#[must_use]
pub(crate) fn integrate(position: Vec2, velocity: Vec2, dt: Duration, map: &TileMap) -> Vec2 {
    let max_step = (map.tile_length() / 4.0).max(f32::EPSILON);
    let displacement =
        (velocity * dt.as_secs_f32()).clamp_length_max(max_step * MAX_SUBSTEPS as f32);
    let distance = displacement.length();
    if distance == 0.0 || !distance.is_finite() {
        return position;
    }

    let steps = ((distance / max_step).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let step = displacement / steps as f32;

    let mut current = position;
    for _ in 0..steps {
        let along_x = Vec2::new(current.x + step.x, current.y);
        if step.x != 0.0 && map.is_walkable_at(along_x) {
            current = along_x;
        }
        let along_y = Vec2::new(current.x, current.y + step.y);
        if step.y != 0.0 && map.is_walkable_at(along_y) {
            current = along_y;
        }
    }
    current
}
