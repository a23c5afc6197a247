//! Per-frame game loop
//!
//! One call per host frame. Order within a frame is fixed:
//! 1. clock (the first frame only records the timestamp)
//! 2. scheduled actions, entity motion, explosions, stars
//! 3. touch steering and torpedo launch
//! 4. spawn draw
//! 5. shield opacity
//! 6. collision resolution

use glam::Vec2;

use super::actions::{ActionKey, Command};
use super::collision::resolve_collisions;
use super::spawn::maybe_spawn;
use super::state::{GameEvent, GameState};
use super::world::{Entity, EntityId, EntityKind, Motion};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Identity of a contact, assigned by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: TouchId,
    pub pos: Vec2,
}

/// Contacts for a single frame.
///
/// `active` lists every contact still down; a steering touch missing from it
/// has been released and is forgotten.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Contacts that went down this frame
    pub began: Vec<Touch>,
    pub active: Vec<Touch>,
}

impl FrameInput {
    /// A new contact at `pos`
    pub fn press(id: u64, pos: Vec2) -> Self {
        let touch = Touch { id: TouchId(id), pos };
        Self {
            began: vec![touch],
            active: vec![touch],
        }
    }

    /// An existing contact, now at `pos`
    pub fn hold(id: u64, pos: Vec2) -> Self {
        Self {
            began: Vec::new(),
            active: vec![Touch { id: TouchId(id), pos }],
        }
    }

    pub fn position_of(&self, id: TouchId) -> Option<Vec2> {
        self.active.iter().find(|t| t.id == id).map(|t| t.pos)
    }
}

/// Advance the game by one frame ending at host time `now` (seconds)
pub fn tick(state: &mut GameState, input: &FrameInput, now: f64) {
    let dt = match state.last_update_time {
        Some(last) => (now - last).max(0.0),
        None => 0.0,
    };
    state.frame += 1;
    state.time += dt;

    advance_timelines(state, dt);

    if state.is_running() {
        if let Some(target) = track_touch(state, input) {
            if let Some(ship) = state.ship.as_mut() {
                ship.move_toward(target, dt as f32);
            }
            if ready_to_fire(state, now) {
                shoot(state);
                state.last_shot_time = Some(now);
            }
        }

        maybe_spawn(state);

        if let Some(ship) = state.ship.as_mut() {
            ship.update_shield();
        }

        resolve_collisions(state);
    }

    state.last_update_time = Some(now);
}

/// Scheduled actions, entity motion and cosmetic layers
fn advance_timelines(state: &mut GameState, dt: f64) {
    state.world.advance(dt, &state.curve);

    for command in state.actions.advance(dt, &mut state.hud) {
        dispatch(state, command);
    }

    state.explosions.retain_mut(|e| e.advance(dt));
    if let Some(stars) = state.starfield.as_mut() {
        stars.advance(dt);
    }
}

fn dispatch(state: &mut GameState, command: Command) {
    match command {
        Command::RestoreFireRate => {
            if let Some(ship) = state.ship.as_mut() {
                ship.fire_rate = DEFAULT_FIRE_RATE;
                log::debug!("Power-up expired");
            }
        }
        Command::RefreshElapsed => state.hud.refresh_elapsed(state.time),
        Command::RefreshPowerUpTimer => state.hud.refresh_power_up_timer(state.time),
        Command::StopPowerUpTimer => {
            state.actions.cancel(ActionKey::PowerUpTimer);
        }
        Command::Despawn(id) => {
            state.despawn(id);
        }
    }
}

/// Adopt a newly pressed contact and look up where the steering contact is
fn track_touch(state: &mut GameState, input: &FrameInput) -> Option<Vec2> {
    if let Some(first) = input.began.first() {
        state.ship_touch = Some(first.id);
    }
    let id = state.ship_touch?;
    let pos = input.position_of(id);
    if pos.is_none() {
        state.ship_touch = None;
    }
    pos
}

fn ready_to_fire(state: &GameState, now: f64) -> bool {
    let Some(ship) = state.ship.as_ref() else {
        return false;
    };
    match state.last_shot_time {
        Some(last) => now - last > ship.fire_rate,
        None => true,
    }
}

/// Launch a torpedo straight up from the ship
pub fn shoot(state: &mut GameState) -> Option<EntityId> {
    let start = state.ship.as_ref()?.pos;
    let size = Vec2::new(TORPEDO_WIDTH, TORPEDO_HEIGHT);
    let end = start + Vec2::new(0.0, state.height + size.y);

    let id = state.world.next_id();
    let torpedo = Entity::new(id, EntityKind::Torpedo, start, size)
        .with_motion(Motion::Linear { start, end }, TORPEDO_FLIGHT_TIME);
    state.spawn(torpedo);
    state.emit(GameEvent::Sound(SoundEffect::LaserShot));
    state.emit(GameEvent::TorpedoFired { id });
    Some(id)
}
