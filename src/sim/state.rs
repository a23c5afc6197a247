//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actions::{Action, ActionKey, Command, Scheduler};
use super::collision::Aabb;
use super::hud::Hud;
use super::path::{BezierPath, scripted_curve};
use super::starfield::Starfield;
use super::tick::TouchId;
use super::world::{Entity, EntityId, EntityKind, World};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::settings::Settings;

/// Macro state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Ship destroyed; terminal
    Ended,
}

/// Shield opacity for a health level: 0, 25, 50, 75, 100%
pub fn shield_alpha_for(health: u8) -> f32 {
    match health {
        0 => 0.0,
        1 => 0.25,
        2 => 0.5,
        3 => 0.75,
        _ => 1.0,
    }
}

/// The player's ship. Its shield ring is drawn centred on `pos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub size: Vec2,
    /// Shield strength in [0, MAX_HEALTH]
    pub health: u8,
    /// Seconds between torpedo launches
    pub fire_rate: f64,
    pub shield_alpha: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(SHIP_SIZE),
            health: STARTING_HEALTH,
            fire_rate: DEFAULT_FIRE_RATE,
            shield_alpha: shield_alpha_for(STARTING_HEALTH),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Seek toward `target` at ship speed. Returns whether the ship moved.
    ///
    /// Inside the dead-zone the ship holds still; a step never carries it
    /// past the target.
    pub fn move_toward(&mut self, target: Vec2, dt: f32) -> bool {
        let remaining = self.pos.distance(target);
        if remaining <= SHIP_DEAD_ZONE {
            return false;
        }
        let step = (SHIP_SPEED * dt.max(0.0)).min(remaining);
        let angle = crate::heading(self.pos, target);
        self.pos += crate::direction(angle) * step;
        true
    }

    pub fn update_shield(&mut self) {
        self.shield_alpha = shield_alpha_for(self.health);
    }

    /// Lose one shield level; callers check for zero health first
    pub fn absorb_hit(&mut self) {
        debug_assert!(self.health > 0, "a ship without shields cannot absorb a hit");
        self.health = self.health.saturating_sub(1);
    }

    pub fn restore_health(&mut self) {
        self.health = MAX_HEALTH;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Ship,
    Obstacle,
}

/// A fire-and-forget particle burst: emits for a short window, then lingers
/// while its particles die out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub kind: ExplosionKind,
    pub pos: Vec2,
    pub emitting: f64,
    pub remaining: f64,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, pos: Vec2) -> Self {
        let (emit, lifetime) = match kind {
            ExplosionKind::Ship => (SHIP_EXPLOSION_EMIT, SHIP_EXPLOSION_LIFETIME),
            ExplosionKind::Obstacle => (OBSTACLE_EXPLOSION_EMIT, OBSTACLE_EXPLOSION_LIFETIME),
        };
        Self {
            kind,
            pos,
            emitting: emit,
            remaining: emit + lifetime,
        }
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting > 0.0
    }

    /// Returns false once fully burned out
    pub fn advance(&mut self, dt: f64) -> bool {
        self.emitting = (self.emitting - dt).max(0.0);
        self.remaining -= dt;
        self.remaining > 0.0
    }
}

/// Notifications for the host (audio, particles, analytics), drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    Explosion { kind: ExplosionKind, pos: Vec2 },
    Spawned { id: EntityId, kind: EntityKind },
    TorpedoFired { id: EntityId },
    ObstacleDestroyed { id: EntityId, points: u64 },
    PowerUpCollected,
    HealthRestored,
    ShipHit { health: u8 },
    ShipDestroyed { pos: Vec2 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub width: f32,
    pub height: f32,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds of play since the first frame
    pub time: f64,
    pub frame: u64,
    /// Host timestamp of the previous frame (`None` before the first)
    pub last_update_time: Option<f64>,
    /// Host timestamp of the last torpedo launch
    pub last_shot_time: Option<f64>,
    /// `None` once destroyed
    pub ship: Option<Ship>,
    /// Contact currently steering the ship
    pub ship_touch: Option<TouchId>,
    pub world: World,
    pub actions: Scheduler,
    pub hud: Hud,
    pub curve: BezierPath,
    pub explosions: Vec<Explosion>,
    pub starfield: Option<Starfield>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a run on a `width` × `height` screen
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);

        let mut state = Self {
            width,
            height,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            time: 0.0,
            frame: 0,
            last_update_time: None,
            last_shot_time: None,
            ship: Some(Ship::new(Vec2::new(width / 2.0, height / 2.0))),
            ship_touch: None,
            world: World::new(),
            actions: Scheduler::new(),
            hud: Hud::new(STARTING_HEALTH),
            curve: scripted_curve(height),
            explosions: Vec::new(),
            starfield: None,
            events: Vec::new(),
        };

        state.hud.start_game(&mut state.actions);
        state.emit(GameEvent::Sound(SoundEffect::Intro));
        log::info!("New game: {}x{} screen, seed {}", width, height, seed);
        state
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut state = Self::new(settings.screen_width, settings.screen_height, settings.seed);
        if settings.starfield {
            state.starfield = Some(Starfield::new(settings.seed, state.width, state.height));
        }
        state
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u64 {
        self.hud.score
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add an entity and schedule its removal when its motion completes
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let kind = entity.kind;
        let duration = entity.duration;
        let id = self.world.add(entity);
        self.actions.run_keyed(
            ActionKey::Expire(id),
            Action::sequence(vec![Action::wait(duration), Action::run(Command::Despawn(id))]),
        );
        self.emit(GameEvent::Spawned { id, kind });
        log::debug!("Spawned {:?} {:?}", kind, id);
        id
    }

    /// Remove an entity and its expiry timer. Safe to call on a removed id.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.world.remove(id)?;
        self.actions.cancel(ActionKey::Expire(id));
        Some(entity)
    }

    /// Start a particle burst at `pos`
    pub fn explode(&mut self, kind: ExplosionKind, pos: Vec2) {
        self.explosions.push(Explosion::new(kind, pos));
        self.emit(GameEvent::Explosion { kind, pos });
    }

    /// Remove the ship and end the run
    pub fn destroy_ship(&mut self) {
        let Some(ship) = self.ship.take() else {
            return;
        };

        self.ship_touch = None;
        self.actions.cancel(ActionKey::PowerDown);
        self.emit(GameEvent::Sound(SoundEffect::ShipExplode));
        self.explode(ExplosionKind::Ship, ship.pos);
        self.hud.end_game(&mut self.actions);
        self.phase = GamePhase::Ended;
        self.emit(GameEvent::ShipDestroyed { pos: ship.pos });
        log::info!(
            "Game over: score {}, survived {:.1}s",
            self.hud.score,
            self.time
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Motion;

    #[test]
    fn test_new_game() {
        let state = GameState::new(400.0, 800.0, 1);
        let ship = state.ship.as_ref().expect("ship spawned");
        assert_eq!(ship.pos, Vec2::new(200.0, 400.0));
        assert_eq!(ship.health, STARTING_HEALTH);
        assert_eq!(ship.fire_rate, DEFAULT_FIRE_RATE);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.actions.is_running(ActionKey::ElapsedTimer));
        assert_eq!(state.events, vec![GameEvent::Sound(SoundEffect::Intro)]);
    }

    #[test]
    fn test_shield_steps() {
        let alphas: Vec<f32> = (0..=4).map(shield_alpha_for).collect();
        assert_eq!(alphas, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_move_toward_dead_zone() {
        let mut ship = Ship::new(Vec2::ZERO);
        assert!(!ship.move_toward(Vec2::new(3.0, 0.0), 1.0));
        assert_eq!(ship.pos, Vec2::ZERO);

        assert!(ship.move_toward(Vec2::new(100.0, 0.0), 0.1));
        assert!((ship.pos.x - 30.0).abs() < 1e-4);
        assert!(ship.pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_move_toward_never_overshoots() {
        let mut ship = Ship::new(Vec2::ZERO);
        ship.move_toward(Vec2::new(10.0, 10.0), 5.0);
        assert!((ship.pos - Vec2::new(10.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_spawn_and_despawn_cancel_expiry() {
        let mut state = GameState::new(400.0, 800.0, 1);
        let id = state.world.next_id();
        let entity = Entity::new(id, EntityKind::Asteroid, Vec2::ZERO, Vec2::splat(20.0))
            .with_motion(
                Motion::Linear {
                    start: Vec2::ZERO,
                    end: Vec2::new(0.0, -10.0),
                },
                3.0,
            );
        state.spawn(entity);
        assert!(state.actions.is_running(ActionKey::Expire(id)));

        assert!(state.despawn(id).is_some());
        assert!(!state.actions.is_running(ActionKey::Expire(id)));
        assert!(state.despawn(id).is_none());
    }

    #[test]
    fn test_destroy_ship_ends_game_once() {
        let mut state = GameState::new(400.0, 800.0, 1);
        state.drain_events();
        state.destroy_ship();
        state.destroy_ship();

        assert_eq!(state.phase, GamePhase::Ended);
        assert!(state.ship.is_none());
        assert_eq!(state.explosions.len(), 1);
        assert!(!state.actions.is_running(ActionKey::ElapsedTimer));
        let destroyed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_explosion_burns_out() {
        let mut e = Explosion::new(ExplosionKind::Obstacle, Vec2::ZERO);
        assert!(e.is_emitting());
        assert!(e.advance(0.2));
        assert!(!e.is_emitting());
        assert!(!e.advance(1.0));
    }
}
