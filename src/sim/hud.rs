//! Heads-up display state
//!
//! Score, elapsed time, health and the power-up countdown, each mirrored to
//! the text a renderer would draw. Timed behaviour (refresh cadence, fades)
//! runs on the shared [`Scheduler`] under fixed keys, so at most one
//! countdown timeline exists at any moment.

use serde::Serialize;

use super::actions::{Action, ActionKey, AlphaTarget, Command, Node, Scheduler};
use crate::consts::*;

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub score: u64,
    /// Seconds since the game started, frozen at game over
    pub elapsed: f64,
    pub health: u8,
    /// Seconds left on the power-up countdown
    pub power_up_remaining: f64,
    /// Opacity of the power-up indicator (hidden at 0)
    pub power_up_alpha: f32,

    pub score_text: String,
    pub elapsed_text: String,
    pub health_text: String,
    pub power_up_text: String,

    power_up_started_at: f64,
    power_up_duration: f64,
}

impl Hud {
    pub fn new(health: u8) -> Self {
        Self {
            score: 0,
            elapsed: 0.0,
            health,
            power_up_remaining: 0.0,
            power_up_alpha: 0.0,
            score_text: "0".to_string(),
            elapsed_text: format_seconds(0.0),
            health_text: health.to_string(),
            power_up_text: format_time_left(0.0),
            power_up_started_at: 0.0,
            power_up_duration: 0.0,
        }
    }

    /// Start the elapsed-time clock
    pub fn start_game(&mut self, actions: &mut Scheduler) {
        actions.run_keyed(
            ActionKey::ElapsedTimer,
            Action::repeat_forever(Action::sequence(vec![
                Action::run(Command::RefreshElapsed),
                Action::wait(HUD_REFRESH_INTERVAL),
            ])),
        );
    }

    pub fn refresh_elapsed(&mut self, now: f64) {
        self.elapsed = now.max(0.0);
        self.elapsed_text = format_seconds(self.elapsed);
    }

    /// Show (or restart) the power-up countdown at full `duration`
    pub fn show_power_up_timer(&mut self, duration: f64, now: f64, actions: &mut Scheduler) {
        actions.cancel(ActionKey::PowerUpTimer);

        self.power_up_started_at = now;
        self.power_up_duration = duration;
        self.refresh_power_up_timer(now);

        let countdown = Action::repeat_forever(Action::sequence(vec![
            Action::run(Command::RefreshPowerUpTimer),
            Action::wait(HUD_REFRESH_INTERVAL),
        ]));
        let visuals = Action::sequence(vec![
            Action::fade_alpha(Node::PowerUpIndicator, 1.0, POWER_UP_FADE_IN),
            Action::wait(duration),
            Action::fade_alpha(Node::PowerUpIndicator, 0.0, POWER_UP_FADE_OUT),
            Action::run(Command::StopPowerUpTimer),
        ]);
        actions.run_keyed(ActionKey::PowerUpTimer, Action::group(vec![countdown, visuals]));
    }

    pub fn refresh_power_up_timer(&mut self, now: f64) {
        let left = self.power_up_duration - (now - self.power_up_started_at);
        self.power_up_remaining = left.clamp(0.0, self.power_up_duration);
        self.power_up_text = format_time_left(self.power_up_remaining);
    }

    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.score_text = format_grouped(self.score);
    }

    pub fn show_health(&mut self, health: u8) {
        self.health = health;
        self.health_text = health.to_string();
    }

    /// Freeze the clock, drop any countdown and fade the indicator out
    pub fn end_game(&mut self, actions: &mut Scheduler) {
        actions.cancel(ActionKey::ElapsedTimer);
        actions.cancel(ActionKey::PowerUpTimer);
        actions.run(Action::fade_alpha(
            Node::PowerUpIndicator,
            0.0,
            END_GAME_FADE_OUT,
        ));
    }
}

impl AlphaTarget for Hud {
    fn alpha(&self, node: Node) -> f32 {
        match node {
            Node::PowerUpIndicator => self.power_up_alpha,
        }
    }

    fn set_alpha(&mut self, node: Node, alpha: f32) {
        match node {
            Node::PowerUpIndicator => self.power_up_alpha = alpha.clamp(0.0, 1.0),
        }
    }
}

/// "1,234,567"
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "12.3s", "1,234.5s"
pub fn format_seconds(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).round() as u64;
    format!("{}.{}s", format_grouped(tenths / 10), tenths % 10)
}

/// "4.9s left"
pub fn format_time_left(seconds: f64) -> String {
    format!("{:.1}s left", seconds)
}
