//! Typed entity registry
//!
//! Every transient object (obstacles, torpedoes, pickups) lives here, keyed by
//! a monotonically increasing [`EntityId`]. Each [`Category`] keeps its own
//! ordered id set so collision scans never compare names and always iterate
//! in spawn order.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::path::BezierPath;

/// Handle to a live entity. Ids are never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Collision category an entity is scanned under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Category {
    Obstacle,
    Torpedo,
    PowerUp,
    HealthPickup,
}

impl Category {
    pub const COUNT: usize = Category::HealthPickup as usize + 1;

    fn index(self) -> usize {
        self as usize
    }
}

/// Concrete entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Tumbling rock on a straight line to a random point below the screen
    Asteroid,
    /// Enemy ship flying the scripted curve
    Enemy,
    Torpedo,
    /// Weapons power-up (fire-rate boost) flying the scripted curve
    PowerUp,
    HealthPickup,
}

impl EntityKind {
    pub fn category(self) -> Category {
        match self {
            EntityKind::Asteroid | EntityKind::Enemy => Category::Obstacle,
            EntityKind::Torpedo => Category::Torpedo,
            EntityKind::PowerUp => Category::PowerUp,
            EntityKind::HealthPickup => Category::HealthPickup,
        }
    }
}

/// How an entity's position evolves over its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Straight line from `start` to `end`
    Linear { start: Vec2, end: Vec2 },
    /// Scripted curve applied as an offset from `origin`
    Path { origin: Vec2, orient: bool },
}

/// Scale/alpha interpolation applied alongside the motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub scale_to: f32,
    pub alpha_to: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    pub motion: Motion,
    /// Seconds the motion takes; the entity is expired when it completes
    pub duration: f64,
    pub elapsed: f64,
    /// Continuous spin (radians/sec)
    pub spin: f32,
    pub fade: Option<Fade>,
}

impl Entity {
    /// A stationary entity at `pos`
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            motion: Motion::Linear { start: pos, end: pos },
            duration: 0.0,
            elapsed: 0.0,
            spin: 0.0,
            fade: None,
        }
    }

    pub fn with_motion(mut self, motion: Motion, duration: f64) -> Self {
        self.motion = motion;
        self.duration = duration.max(0.0);
        self
    }

    pub fn with_spin(mut self, radians_per_sec: f32) -> Self {
        self.spin = radians_per_sec;
        self
    }

    pub fn with_fade(mut self, scale_to: f32, alpha_to: f32) -> Self {
        self.fade = Some(Fade { scale_to, alpha_to });
        self
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Motion progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0) as f32
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance motion, spin and fade by `dt` seconds
    pub fn advance(&mut self, dt: f64, curve: &BezierPath) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = self.progress();

        match self.motion {
            Motion::Linear { start, end } => {
                self.pos = start.lerp(end, t);
            }
            Motion::Path { origin, orient } => {
                let sample = curve.sample(t);
                self.pos = origin + sample.offset;
                if orient {
                    self.rotation = sample.heading;
                }
            }
        }

        if self.spin != 0.0 {
            self.rotation += self.spin * dt as f32;
        }

        if let Some(fade) = self.fade {
            self.scale = 1.0 + (fade.scale_to - 1.0) * t;
            self.alpha = 1.0 + (fade.alpha_to - 1.0) * t;
        }
    }

    /// Axis-aligned bounds of the scaled, rotated frame
    pub fn bounds(&self) -> Aabb {
        Aabb::from_frame(self.pos, self.size * self.scale, self.rotation)
    }
}

/// Live entity collection with per-category indices
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, Entity>,
    tags: [BTreeSet<EntityId>; Category::COUNT],
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id
    pub fn next_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Insert an entity built with an id from [`World::next_id`]
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        debug_assert!(!self.entities.contains_key(&id), "entity id reused: {id:?}");
        self.tags[entity.category().index()].insert(id);
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity. Removing an id that is already gone returns `None`.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.tags[entity.category().index()].remove(&id);
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Snapshot of live ids in a category, in spawn order.
    ///
    /// Callers that remove entities while scanning must re-check liveness
    /// with [`World::get`] for each id.
    pub fn ids(&self, category: Category) -> Vec<EntityId> {
        self.tags[category.index()].iter().copied().collect()
    }

    pub fn iter(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.tags[category.index()]
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    pub fn count(&self, category: Category) -> usize {
        self.tags[category.index()].len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Bounding-box overlap of two live entities (false if either is gone)
    pub fn intersects(&self, a: EntityId, b: EntityId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.bounds().intersects(&b.bounds()),
            _ => false,
        }
    }

    /// Advance every entity's scripted motion
    pub fn advance(&mut self, dt: f64, curve: &BezierPath) {
        for entity in self.entities.values_mut() {
            entity.advance(dt, curve);
        }
    }
}
