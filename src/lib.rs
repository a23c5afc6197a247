//! Space Run - a touch-steered arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, HUD state)
//! - `audio`: Sound effect identifiers and fire-and-forget playback
//! - `settings`: Screen size, seed and audio configuration

pub mod audio;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, SoundEffect};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Per-frame spawn odds, out of `SPAWN_ROLL_RANGE`
    pub const SPAWN_CHANCE: u32 = 30;
    pub const SPAWN_ROLL_RANGE: u32 = 1000;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 50.0;
    pub const SHIELD_SIZE: f32 = 80.0;
    /// Seek speed toward the active touch (units/s)
    pub const SHIP_SPEED: f32 = 300.0;
    /// Ship stops seeking inside this radius to avoid jitter
    pub const SHIP_DEAD_ZONE: f32 = 4.0;
    pub const MAX_HEALTH: u8 = 4;
    pub const STARTING_HEALTH: u8 = 2;

    /// Seconds between torpedo launches
    pub const DEFAULT_FIRE_RATE: f64 = 0.5;
    pub const BOOSTED_FIRE_RATE: f64 = 0.1;
    pub const POWER_UP_DURATION: f64 = 5.0;

    /// Torpedo flight: rises one screen height over this many seconds
    pub const TORPEDO_FLIGHT_TIME: f64 = 0.5;
    pub const TORPEDO_WIDTH: f32 = 12.0;
    pub const TORPEDO_HEIGHT: f32 = 18.0;

    /// Health pickup
    pub const HEALTH_SIZE: f32 = 20.0;
    pub const HEALTH_FALL_TIME: f64 = 5.0;
    pub const HEALTH_END_SCALE: f32 = 0.5;

    /// Weapons power-up
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_PATH_TIME: f64 = 5.0;

    /// Enemy ship
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_PATH_TIME: f64 = 7.0;

    /// Asteroid size range `[MIN, MIN + SPREAD)`
    pub const ASTEROID_MIN_SIZE: u32 = 15;
    pub const ASTEROID_SIZE_SPREAD: u32 = 30;
    /// Asteroid fall time range in whole seconds `[MIN, MIN + SPREAD)`
    pub const ASTEROID_MIN_FALL: u32 = 3;
    pub const ASTEROID_FALL_SPREAD: u32 = 4;
    /// Asteroid spin: `ASTEROID_SPIN_ANGLE` radians per period in `[MIN, MIN + SPREAD)`
    pub const ASTEROID_SPIN_ANGLE: f32 = 3.0;
    pub const ASTEROID_MIN_SPIN_PERIOD: u32 = 1;
    pub const ASTEROID_SPIN_SPREAD: u32 = 3;

    /// Points for destroying an obstacle with a torpedo
    pub const OBSTACLE_POINTS: u64 = 10;

    /// Explosion emission windows and particle lifetimes (seconds)
    pub const SHIP_EXPLOSION_EMIT: f64 = 0.3;
    pub const SHIP_EXPLOSION_LIFETIME: f64 = 1.0;
    pub const OBSTACLE_EXPLOSION_EMIT: f64 = 0.1;
    pub const OBSTACLE_EXPLOSION_LIFETIME: f64 = 0.5;

    /// HUD refresh cadence and power-up indicator fades
    pub const HUD_REFRESH_INTERVAL: f64 = 0.05;
    pub const POWER_UP_FADE_IN: f64 = 0.1;
    pub const POWER_UP_FADE_OUT: f64 = 1.0;
    pub const END_GAME_FADE_OUT: f64 = 0.3;
}

/// Heading from `from` to `to` in radians (atan2 of the offset)
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for a heading in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_straight_up() {
        let h = heading(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((h - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_direction_is_unit() {
        for i in 0..8 {
            let d = direction(i as f32 * 0.7);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }
}
