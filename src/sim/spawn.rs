//! Stochastic entity spawner
//!
//! Once per frame a 30-in-1000 draw decides whether anything drops; a second
//! draw in [0, 100) picks what:
//!
//! | roll      | spawn          |
//! |-----------|----------------|
//! | 0..20     | health pickup  |
//! | 20..30    | power-up       |
//! | 30..60    | enemy ship     |
//! | 60..100   | asteroid       |
//!
//! Everything starts above the top edge and is expired by the scheduler
//! when its motion completes.

use glam::Vec2;
use rand::Rng;

use super::state::GameState;
use super::world::{Entity, EntityId, EntityKind, Motion};
use crate::consts::*;

/// What a spawn event produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Health,
    PowerUp,
    Enemy,
    Asteroid,
}

impl SpawnKind {
    /// Map a roll in [0, 100) to a spawn kind
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..20 => SpawnKind::Health,
            20..30 => SpawnKind::PowerUp,
            30..60 => SpawnKind::Enemy,
            _ => SpawnKind::Asteroid,
        }
    }
}

/// Uniform integer in `[0, n)`; an empty range yields 0 instead of panicking
#[inline]
pub fn random_below<R: Rng>(rng: &mut R, n: u32) -> u32 {
    if n == 0 { 0 } else { rng.random_range(0..n) }
}

/// Integer width that is never negative
#[inline]
fn span(width: f32) -> u32 {
    if width.is_finite() && width > 0.0 {
        width as u32
    } else {
        0
    }
}

/// x in `[margin, width - margin)`, collapsing to `margin` on narrow screens
fn inset_x<R: Rng>(rng: &mut R, width: f32, margin: f32) -> f32 {
    random_below(rng, span(width - 2.0 * margin)) as f32 + margin
}

/// Whether a draw in `[0, SPAWN_ROLL_RANGE)` triggers a spawn
#[inline]
pub fn spawn_roll_hits(roll: u32) -> bool {
    roll < SPAWN_CHANCE
}

/// Per-frame spawn draw
pub fn maybe_spawn(state: &mut GameState) -> Option<EntityId> {
    if spawn_roll_hits(random_below(&mut state.rng, SPAWN_ROLL_RANGE)) {
        Some(drop_thing(state))
    } else {
        None
    }
}

/// Pick a spawn kind and drop it
pub fn drop_thing(state: &mut GameState) -> EntityId {
    let kind = SpawnKind::from_roll(random_below(&mut state.rng, 100));
    spawn(state, kind)
}

pub fn spawn(state: &mut GameState, kind: SpawnKind) -> EntityId {
    let id = state.world.next_id();
    let (width, height) = (state.width, state.height);
    let rng = &mut state.rng;
    let entity = match kind {
        SpawnKind::Health => health_pickup(rng, id, width, height),
        SpawnKind::PowerUp => power_up(rng, id, width, height),
        SpawnKind::Enemy => enemy(rng, id, width, height),
        SpawnKind::Asteroid => asteroid(rng, id, width, height),
    };
    state.spawn(entity)
}

/// Falls straight down, shrinking to half size and fading out
pub fn health_pickup<R: Rng>(rng: &mut R, id: EntityId, width: f32, height: f32) -> Entity {
    let side = HEALTH_SIZE;
    let x = inset_x(rng, width, 30.0);
    let start = Vec2::new(x, height + side);
    let end = Vec2::new(x, -side);

    Entity::new(id, EntityKind::HealthPickup, start, Vec2::splat(side))
        .with_motion(Motion::Linear { start, end }, HEALTH_FALL_TIME)
        .with_fade(HEALTH_END_SCALE, 0.0)
}

/// Flies the scripted curve without turning
pub fn power_up<R: Rng>(rng: &mut R, id: EntityId, width: f32, height: f32) -> Entity {
    let side = POWER_UP_SIZE;
    let start = Vec2::new(inset_x(rng, width, 30.0), height + side);

    Entity::new(id, EntityKind::PowerUp, start, Vec2::splat(side)).with_motion(
        Motion::Path {
            origin: start,
            orient: false,
        },
        POWER_UP_PATH_TIME,
    )
}

/// Flies the scripted curve, nose along the tangent
pub fn enemy<R: Rng>(rng: &mut R, id: EntityId, width: f32, height: f32) -> Entity {
    let side = ENEMY_SIZE;
    let start = Vec2::new(inset_x(rng, width, 20.0), height + side);

    Entity::new(id, EntityKind::Enemy, start, Vec2::splat(side)).with_motion(
        Motion::Path {
            origin: start,
            orient: true,
        },
        ENEMY_PATH_TIME,
    )
}

/// Random size, may start up to a quarter-width off either side, drifts to a
/// random x below the screen while spinning
pub fn asteroid<R: Rng>(rng: &mut R, id: EntityId, width: f32, height: f32) -> Entity {
    let side = (random_below(rng, ASTEROID_SIZE_SPREAD) + ASTEROID_MIN_SIZE) as f32;
    let quarter = width.max(0.0) / 4.0;
    let start_x = random_below(rng, span(width + quarter * 2.0)) as f32 - quarter;
    let end_x = random_below(rng, span(width)) as f32;
    let start = Vec2::new(start_x, height + side);
    let end = Vec2::new(end_x, -side);

    let fall = (random_below(rng, ASTEROID_FALL_SPREAD) + ASTEROID_MIN_FALL) as f64;
    let spin_period = (random_below(rng, ASTEROID_SPIN_SPREAD) + ASTEROID_MIN_SPIN_PERIOD) as f32;

    Entity::new(id, EntityKind::Asteroid, start, Vec2::splat(side))
        .with_motion(Motion::Linear { start, end }, fall)
        .with_spin(ASTEROID_SPIN_ANGLE / spin_period)
}
