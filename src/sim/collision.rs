//! Collision detection and resolution
//!
//! Detection is plain axis-aligned box overlap on current-frame positions
//! (no sweep, so very fast objects may tunnel). Resolution runs once per
//! frame in a fixed order: power-ups, health pickups, then each obstacle
//! against the ship and against torpedoes.

use glam::Vec2;

use super::actions::{Action, ActionKey, Command};
use super::state::{ExplosionKind, GameEvent, GameState};
use super::world::{Category, EntityId};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box enclosing a `size` rectangle centred on `center` and rotated by `rotation`
    pub fn from_frame(center: Vec2, size: Vec2, rotation: f32) -> Self {
        if rotation == 0.0 {
            return Self::from_center(center, size);
        }
        let (sin, cos) = rotation.sin_cos();
        let (w, h) = (size.x.abs(), size.y.abs());
        let extent = Vec2::new(w * cos.abs() + h * sin.abs(), w * sin.abs() + h * cos.abs());
        Self::from_center(center, extent)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// True when the boxes share interior area (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Run every collision check for the current frame.
///
/// Does nothing once the ship is gone.
pub fn resolve_collisions(state: &mut GameState) {
    if state.ship.is_none() {
        return;
    }
    collect_power_ups(state);
    collect_health(state);
    resolve_obstacles(state);
}

fn ship_touches(state: &GameState, id: EntityId) -> bool {
    match (&state.ship, state.world.get(id)) {
        (Some(ship), Some(entity)) => ship.bounds().intersects(&entity.bounds()),
        _ => false,
    }
}

/// Ship × power-up: boost fire rate and (re)start the single restore timer
fn collect_power_ups(state: &mut GameState) {
    for id in state.world.ids(Category::PowerUp) {
        if !ship_touches(state, id) {
            continue;
        }

        let now = state.time;
        state
            .hud
            .show_power_up_timer(POWER_UP_DURATION, now, &mut state.actions);
        state.despawn(id);

        if let Some(ship) = state.ship.as_mut() {
            ship.fire_rate = BOOSTED_FIRE_RATE;
        }
        state.actions.run_keyed(
            ActionKey::PowerDown,
            Action::sequence(vec![
                Action::wait(POWER_UP_DURATION),
                Action::run(Command::RestoreFireRate),
            ]),
        );
        state.emit(GameEvent::PowerUpCollected);
        log::info!("Power-up collected at {:.2}s", now);
    }
}

/// Ship × health pickup: shields back to full
fn collect_health(state: &mut GameState) {
    for id in state.world.ids(Category::HealthPickup) {
        if !ship_touches(state, id) {
            continue;
        }

        state.despawn(id);
        if let Some(ship) = state.ship.as_mut() {
            ship.restore_health();
            state.hud.show_health(ship.health);
        }
        state.emit(GameEvent::HealthRestored);
    }
}

/// Each obstacle against the ship first, then against torpedoes.
///
/// An obstacle the ship ran into is consumed by that contact and is not
/// offered to torpedoes afterwards, so it never scores.
fn resolve_obstacles(state: &mut GameState) {
    for obstacle_id in state.world.ids(Category::Obstacle) {
        let Some(obstacle_pos) = state.world.get(obstacle_id).map(|o| o.pos) else {
            continue;
        };

        if ship_touches(state, obstacle_id) {
            ship_hit(state, obstacle_id);
            continue;
        }

        // One torpedo destroys one obstacle
        let torpedo = state
            .world
            .ids(Category::Torpedo)
            .into_iter()
            .find(|&t| state.world.intersects(t, obstacle_id));

        if let Some(torpedo_id) = torpedo {
            state.despawn(torpedo_id);
            state.despawn(obstacle_id);
            state.emit(GameEvent::Sound(SoundEffect::ObstacleExplode));
            state.explode(ExplosionKind::Obstacle, obstacle_pos);
            state.hud.add_points(OBSTACLE_POINTS);
            state.emit(GameEvent::ObstacleDestroyed {
                id: obstacle_id,
                points: OBSTACLE_POINTS,
            });
        }
    }
}

/// Ship × obstacle: the shield soaks the hit, or the ship is lost
fn ship_hit(state: &mut GameState, obstacle_id: EntityId) {
    let Some(ship) = state.ship.as_mut() else {
        return;
    };

    if ship.health == 0 {
        state.despawn(obstacle_id);
        state.destroy_ship();
        return;
    }

    ship.absorb_hit();
    let health = ship.health;
    state.despawn(obstacle_id);
    state.hud.show_health(health);
    state.emit(GameEvent::Sound(SoundEffect::Tackle));
    state.emit(GameEvent::ShipHit { health });
    log::debug!("Shield absorbed a hit, health now {}", health);
}
