//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps in, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod actions;
pub mod collision;
pub mod hud;
pub mod path;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod tick;
pub mod world;

pub use actions::{Action, ActionKey, AlphaTarget, Command, Node, Scheduler};
pub use collision::{Aabb, resolve_collisions};
pub use hud::Hud;
pub use path::{BezierPath, CubicSegment, scripted_curve};
pub use spawn::{SpawnKind, maybe_spawn};
pub use starfield::{Star, Starfield};
pub use state::{
    Explosion, ExplosionKind, GameEvent, GamePhase, GameState, Ship, shield_alpha_for,
};
pub use tick::{FrameInput, Touch, TouchId, shoot, tick};
pub use world::{Category, Entity, EntityId, EntityKind, Motion, World};
