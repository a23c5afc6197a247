//! Background shooting stars
//!
//! Purely cosmetic, and seeded on its own stream so turning it off never
//! changes gameplay. Dimmer stars are smaller, slower and drawn further back,
//! which reads as parallax.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::random_below;

/// Launch attempt cadence (seconds)
const LAUNCH_INTERVAL: f64 = 0.01;
/// Cap on queued launch attempts after a long frame
const MAX_BACKLOG: f64 = 0.25;
/// Seed offset separating the star stream from gameplay
const STREAM_OFFSET: u64 = 0x5741_5253;

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: Vec2,
    pub alpha: f32,
    /// Draw depth, brighter stars in front
    pub z: f32,
    velocity: f32,
    remaining: f64,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    rng: Pcg32,
    width: f32,
    height: f32,
    backlog: f64,
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed.wrapping_add(STREAM_OFFSET)),
            width,
            height,
            backlog: 0.0,
            stars: Vec::new(),
        }
    }

    pub fn advance(&mut self, dt: f64) {
        for star in &mut self.stars {
            star.pos.y += star.velocity * dt as f32;
            star.remaining -= dt;
        }
        self.stars.retain(|s| s.remaining > 0.0);

        self.backlog = (self.backlog + dt).min(MAX_BACKLOG);
        while self.backlog >= LAUNCH_INTERVAL {
            self.backlog -= LAUNCH_INTERVAL;
            if random_below(&mut self.rng, 10) < 5 {
                self.launch();
            }
        }
    }

    fn launch(&mut self) {
        let x = random_below(&mut self.rng, self.width.max(0.0) as u32) as f32;
        let alpha = 0.1 + random_below(&mut self.rng, 10) as f32 / 10.0;
        let size = Vec2::new(3.0 - alpha, 8.0 - alpha);
        let drop = -self.height - size.y;
        let duration = 1.8 - alpha as f64;

        self.stars.push(Star {
            pos: Vec2::new(x, self.height),
            size,
            alpha,
            z: -100.0 + alpha + 10.0,
            velocity: drop / duration as f32,
            remaining: duration,
        });
    }
}
