//! End-to-end gameplay scenarios driven through the public simulation API

use glam::Vec2;
use proptest::prelude::*;

use space_run::consts::*;
use space_run::sim::{
    ActionKey, Category, Entity, EntityId, EntityKind, ExplosionKind, FrameInput, GameEvent,
    GamePhase, GameState, Motion, Ship, resolve_collisions, tick,
};
use space_run::{Settings, SoundEffect};

const FRAME: f64 = 1.0 / 60.0;
/// Far outside anything that spawns
const PARKED: Vec2 = Vec2::new(-5000.0, -5000.0);

/// Put a stationary entity into play for a minute
fn place(state: &mut GameState, kind: EntityKind, pos: Vec2, size: Vec2) -> EntityId {
    let id = state.world.next_id();
    let entity = Entity::new(id, kind, pos, size)
        .with_motion(Motion::Linear { start: pos, end: pos }, 60.0);
    state.spawn(entity)
}

fn ship_pos(state: &GameState) -> Vec2 {
    state.ship.as_ref().map(|s| s.pos).unwrap_or(Vec2::ZERO)
}

fn sounds(events: &[GameEvent]) -> Vec<SoundEffect> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Sound(s) => Some(*s),
            _ => None,
        })
        .collect()
}

#[test]
fn test_shield_absorbs_hit() {
    let mut state = GameState::new(375.0, 667.0, 1);
    state.drain_events();
    let pos = ship_pos(&state);
    let rock = place(&mut state, EntityKind::Asteroid, pos, Vec2::splat(30.0));

    resolve_collisions(&mut state);

    let ship = state.ship.as_ref().expect("shielded ship survives");
    assert_eq!(ship.health, 1);
    assert_eq!(state.hud.health_text, "1");
    assert!(!state.world.contains(rock));
    assert_eq!(state.phase, GamePhase::Running);
    assert_eq!(state.score(), 0);
    assert_eq!(sounds(&state.drain_events()), vec![SoundEffect::Tackle]);
}

#[test]
fn test_unshielded_hit_ends_game() {
    let mut state = GameState::new(375.0, 667.0, 1);
    tick(&mut state, &FrameInput::press(3, Vec2::new(100.0, 100.0)), 0.0);
    assert!(state.ship_touch.is_some());
    if let Some(ship) = state.ship.as_mut() {
        ship.health = 0;
    }
    state.drain_events();

    let pos = ship_pos(&state);
    place(&mut state, EntityKind::Enemy, pos, Vec2::splat(40.0));
    resolve_collisions(&mut state);

    assert_eq!(state.phase, GamePhase::Ended);
    assert!(state.ship.is_none());
    assert!(state.ship_touch.is_none());
    assert!(state.explosions.iter().any(|e| e.kind == ExplosionKind::Ship));
    let events = state.drain_events();
    assert!(sounds(&events).contains(&SoundEffect::ShipExplode));
    assert!(events.contains(&GameEvent::ShipDestroyed { pos }));
}

#[test]
fn test_torpedo_destroys_only_first_obstacle() {
    let mut state = GameState::new(375.0, 667.0, 1);
    let spot = Vec2::new(100.0, 600.0);
    let first = place(&mut state, EntityKind::Asteroid, spot, Vec2::splat(30.0));
    let second = place(&mut state, EntityKind::Asteroid, spot + Vec2::new(5.0, 0.0), Vec2::splat(30.0));
    let torpedo = place(&mut state, EntityKind::Torpedo, spot, Vec2::new(12.0, 18.0));

    resolve_collisions(&mut state);

    assert!(!state.world.contains(first));
    assert!(state.world.contains(second));
    assert!(!state.world.contains(torpedo));
    assert_eq!(state.score(), OBSTACLE_POINTS);
    assert_eq!(state.hud.score_text, "10");
    assert!(!state.actions.is_running(ActionKey::Expire(first)));
    assert!(state.actions.is_running(ActionKey::Expire(second)));
}

#[test]
fn test_score_counts_in_tens() {
    let mut state = GameState::new(375.0, 667.0, 1);
    for i in 0..3 {
        let spot = Vec2::new(40.0 + i as f32 * 100.0, 620.0);
        place(&mut state, EntityKind::Enemy, spot, Vec2::splat(40.0));
        place(&mut state, EntityKind::Torpedo, spot, Vec2::new(12.0, 18.0));
    }

    resolve_collisions(&mut state);

    assert_eq!(state.score(), 30);
    assert_eq!(state.world.count(Category::Obstacle), 0);
    assert_eq!(state.world.count(Category::Torpedo), 0);
    let destroyed = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::ObstacleDestroyed { points: 10, .. }))
        .count();
    assert_eq!(destroyed, 3);
}

#[test]
fn test_ship_contact_wins_over_torpedo() {
    let mut state = GameState::new(375.0, 667.0, 1);
    let pos = ship_pos(&state);
    let rock = place(&mut state, EntityKind::Asteroid, pos, Vec2::splat(30.0));
    let torpedo = place(&mut state, EntityKind::Torpedo, pos, Vec2::new(12.0, 18.0));

    resolve_collisions(&mut state);

    assert!(!state.world.contains(rock));
    assert!(state.world.contains(torpedo));
    assert_eq!(state.score(), 0);
    assert_eq!(state.ship.as_ref().map(|s| s.health), Some(1));
}

#[test]
fn test_health_pickup_restores_full_shield() {
    let mut state = GameState::new(375.0, 667.0, 1);
    if let Some(ship) = state.ship.as_mut() {
        ship.health = 1;
    }
    let pos = ship_pos(&state);
    let pickup = place(&mut state, EntityKind::HealthPickup, pos, Vec2::splat(20.0));

    resolve_collisions(&mut state);
    tick(&mut state, &FrameInput::default(), 0.0);

    let ship = state.ship.as_ref().expect("ship alive");
    assert_eq!(ship.health, MAX_HEALTH);
    assert_eq!(ship.shield_alpha, 1.0);
    assert_eq!(state.hud.health_text, "4");
    assert!(!state.world.contains(pickup));
}

#[test]
fn test_second_power_up_restarts_countdown() {
    let mut state = GameState::new(375.0, 667.0, 1);
    if let Some(ship) = state.ship.as_mut() {
        ship.pos = PARKED;
    }

    place(&mut state, EntityKind::PowerUp, PARKED, Vec2::splat(30.0));
    tick(&mut state, &FrameInput::default(), 0.0);
    assert_eq!(state.ship.as_ref().map(|s| s.fire_rate), Some(BOOSTED_FIRE_RATE));
    assert_eq!(state.hud.power_up_text, "5.0s left");

    let mut frame = 1u32;
    while (frame as f64) * FRAME < 2.0 {
        tick(&mut state, &FrameInput::default(), frame as f64 * FRAME);
        frame += 1;
    }
    assert!(state.hud.power_up_remaining < 3.1);

    place(&mut state, EntityKind::PowerUp, PARKED, Vec2::splat(30.0));
    tick(&mut state, &FrameInput::default(), frame as f64 * FRAME);
    frame += 1;
    assert_eq!(state.hud.power_up_remaining, 5.0);
    assert_eq!(state.hud.power_up_text, "5.0s left");

    // The first boost would have lapsed at 5s
    while (frame as f64) * FRAME < 6.5 {
        tick(&mut state, &FrameInput::default(), frame as f64 * FRAME);
        frame += 1;
    }
    assert_eq!(state.ship.as_ref().map(|s| s.fire_rate), Some(BOOSTED_FIRE_RATE));

    while (frame as f64) * FRAME < 7.5 {
        tick(&mut state, &FrameInput::default(), frame as f64 * FRAME);
        frame += 1;
    }
    assert_eq!(state.ship.as_ref().map(|s| s.fire_rate), Some(DEFAULT_FIRE_RATE));
    assert!(!state.actions.is_running(ActionKey::PowerDown));
}

#[test]
fn test_spawned_entities_expire() {
    let mut state = GameState::new(375.0, 667.0, 42);
    if let Some(ship) = state.ship.as_mut() {
        ship.pos = PARKED;
    }
    let rock = space_run::sim::spawn::spawn(&mut state, space_run::sim::SpawnKind::Asteroid);

    for frame in 0..(8 * 60) {
        tick(&mut state, &FrameInput::default(), frame as f64 * FRAME);
    }
    assert!(!state.world.contains(rock));
}

#[test]
fn test_no_spawns_after_game_over() {
    let mut state = GameState::new(375.0, 667.0, 5);
    tick(&mut state, &FrameInput::default(), 0.0);
    state.destroy_ship();
    state.drain_events();
    let before = state.world.len();

    for frame in 1..600 {
        tick(&mut state, &FrameInput::press(1, Vec2::ZERO), frame as f64 * FRAME);
    }

    let spawned = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Spawned { .. }))
        .count();
    assert_eq!(spawned, 0);
    assert!(state.world.len() <= before);
    assert!(state.explosions.is_empty());
    assert_eq!(state.hud.power_up_alpha, 0.0);
}

#[test]
fn test_starfield_does_not_change_gameplay() {
    let mut plain = Settings::default();
    plain.starfield = false;
    let starry = Settings::default();

    let mut a = GameState::from_settings(&plain);
    let mut b = GameState::from_settings(&starry);
    assert!(a.starfield.is_none());
    assert!(b.starfield.is_some());

    for frame in 0..300 {
        let now = frame as f64 * FRAME;
        tick(&mut a, &FrameInput::default(), now);
        tick(&mut b, &FrameInput::default(), now);
    }
    let ids_a: Vec<EntityId> = a.world.ids(Category::Obstacle);
    let ids_b: Vec<EntityId> = b.world.ids(Category::Obstacle);
    assert_eq!(ids_a, ids_b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ship_approaches_without_overshoot(
        sx in -500.0f32..500.0, sy in -500.0f32..500.0,
        tx in -500.0f32..500.0, ty in -500.0f32..500.0,
        dt in 0.0f32..0.5,
    ) {
        let mut ship = Ship::new(Vec2::new(sx, sy));
        let target = Vec2::new(tx, ty);
        let before = ship.pos.distance(target);

        let moved = ship.move_toward(target, dt);
        let after = ship.pos.distance(target);

        prop_assert!(after <= before + 1e-3);
        if before <= SHIP_DEAD_ZONE {
            prop_assert!(!moved);
        } else {
            let step = SHIP_SPEED * dt;
            let expected = (before - step).max(0.0);
            prop_assert!((after - expected).abs() < 1e-2);
        }
    }

    #[test]
    fn prop_session_invariants(seed in any::<u64>(), sweep in 0.0f32..1.0) {
        let mut state = GameState::new(375.0, 667.0, seed);
        let mut last_score = 0;

        for frame in 0..900u32 {
            let now = frame as f64 * FRAME;
            let x = 375.0 * ((sweep + frame as f32 / 300.0) % 1.0);
            let finger = Vec2::new(x, 150.0);
            let input = if frame == 0 {
                FrameInput::press(1, finger)
            } else {
                FrameInput::hold(1, finger)
            };
            tick(&mut state, &input, now);

            let events = state.drain_events();
            let drops = events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { kind, .. } if *kind != EntityKind::Torpedo))
                .count();
            prop_assert!(drops <= 1);

            if let Some(ship) = state.ship.as_ref() {
                prop_assert!(ship.health <= MAX_HEALTH);
                prop_assert_eq!(ship.health, state.hud.health);
            }
            prop_assert!(state.score() >= last_score);
            prop_assert_eq!(state.score() % OBSTACLE_POINTS, 0);
            prop_assert!(state.hud.power_up_remaining >= 0.0);
            last_score = state.score();
        }
    }
}
