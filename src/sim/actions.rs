//! Keyed, time-driven action scheduler
//!
//! Actions are declarative timelines (waits, fades, sequences, groups,
//! repeats) advanced a frame at a time. Instead of closures, "run" steps
//! carry a [`Command`] that is handed back to the frame loop when it fires,
//! so nothing here holds references into game state.
//!
//! A key identifies at most one running timeline: starting a keyed action
//! cancels whatever was running under that key.

use std::collections::VecDeque;

use super::world::EntityId;

/// Identity of a cancellable timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    /// Restores the default fire rate when a power-up wears off
    PowerDown,
    /// HUD power-up countdown (refresh + fade in/out)
    PowerUpTimer,
    /// HUD elapsed-time refresh
    ElapsedTimer,
    /// Time-bounded removal of a spawned entity
    Expire(EntityId),
}

/// Work handed back to the frame loop when a `Run` step fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RestoreFireRate,
    RefreshElapsed,
    RefreshPowerUpTimer,
    StopPowerUpTimer,
    Despawn(EntityId),
}

/// Fadeable display nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    PowerUpIndicator,
}

/// Receiver of alpha fades
pub trait AlphaTarget {
    fn alpha(&self, node: Node) -> f32;
    fn set_alpha(&mut self, node: Node, alpha: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Wait(f64),
    Run(Command),
    FadeAlpha { node: Node, to: f32, duration: f64 },
    Sequence(Vec<Action>),
    Group(Vec<Action>),
    RepeatForever(Box<Action>),
}

impl Action {
    pub fn wait(seconds: f64) -> Self {
        Action::Wait(seconds.max(0.0))
    }

    pub fn run(command: Command) -> Self {
        Action::Run(command)
    }

    pub fn fade_alpha(node: Node, to: f32, duration: f64) -> Self {
        Action::FadeAlpha {
            node,
            to,
            duration: duration.max(0.0),
        }
    }

    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::Sequence(actions)
    }

    pub fn group(actions: Vec<Action>) -> Self {
        Action::Group(actions)
    }

    pub fn repeat_forever(action: Action) -> Self {
        Action::RepeatForever(Box::new(action))
    }
}

/// Progress of a started action
#[derive(Debug, Clone)]
enum Running {
    Wait {
        remaining: f64,
    },
    Run(Command),
    Fade {
        node: Node,
        to: f32,
        duration: f64,
        elapsed: f64,
        from: Option<f32>,
    },
    Sequence {
        pending: VecDeque<Action>,
        current: Option<Box<Running>>,
    },
    Group {
        members: Vec<Running>,
        done: Vec<bool>,
    },
    Repeat {
        template: Box<Action>,
        current: Box<Running>,
    },
}

impl Running {
    fn start(action: Action) -> Self {
        match action {
            Action::Wait(remaining) => Running::Wait { remaining },
            Action::Run(command) => Running::Run(command),
            Action::FadeAlpha { node, to, duration } => Running::Fade {
                node,
                to,
                duration,
                elapsed: 0.0,
                from: None,
            },
            Action::Sequence(items) => Running::Sequence {
                pending: items.into(),
                current: None,
            },
            Action::Group(items) => {
                let done = vec![false; items.len()];
                Running::Group {
                    members: items.into_iter().map(Running::start).collect(),
                    done,
                }
            }
            Action::RepeatForever(template) => Running::Repeat {
                current: Box::new(Running::start((*template).clone())),
                template,
            },
        }
    }

    /// Advance by `dt`. Returns the unused time once finished, `None` while running.
    fn advance<T: AlphaTarget>(
        &mut self,
        dt: f64,
        target: &mut T,
        fired: &mut Vec<Command>,
    ) -> Option<f64> {
        match self {
            Running::Wait { remaining } => {
                if dt >= *remaining {
                    let left = dt - *remaining;
                    *remaining = 0.0;
                    Some(left)
                } else {
                    *remaining -= dt;
                    None
                }
            }
            Running::Run(command) => {
                fired.push(*command);
                Some(dt)
            }
            Running::Fade {
                node,
                to,
                duration,
                elapsed,
                from,
            } => {
                let start = *from.get_or_insert_with(|| target.alpha(*node));
                *elapsed += dt;
                if *elapsed >= *duration {
                    target.set_alpha(*node, *to);
                    Some(*elapsed - *duration)
                } else {
                    let t = (*elapsed / *duration) as f32;
                    target.set_alpha(*node, start + (*to - start) * t);
                    None
                }
            }
            Running::Sequence { pending, current } => {
                let mut dt = dt;
                loop {
                    if current.is_none() {
                        match pending.pop_front() {
                            Some(next) => *current = Some(Box::new(Running::start(next))),
                            None => return Some(dt),
                        }
                    }
                    let step = current.as_mut()?;
                    match step.advance(dt, target, fired) {
                        Some(left) => {
                            *current = None;
                            dt = left;
                        }
                        None => return None,
                    }
                }
            }
            Running::Group { members, done } => {
                let mut left = dt;
                for (member, finished) in members.iter_mut().zip(done.iter_mut()) {
                    if *finished {
                        continue;
                    }
                    if let Some(member_left) = member.advance(dt, target, fired) {
                        *finished = true;
                        left = left.min(member_left);
                    }
                }
                if done.iter().all(|d| *d) {
                    Some(left)
                } else {
                    None
                }
            }
            Running::Repeat { template, current } => {
                let mut dt = dt;
                loop {
                    let left = current.advance(dt, target, fired)?;
                    **current = Running::start((**template).clone());
                    if left >= dt {
                        // Cycle consumed no time; resume next frame instead of spinning
                        return None;
                    }
                    dt = left;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    key: Option<ActionKey>,
    state: Running,
}

/// Running timelines, advanced once per frame
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    running: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an anonymous action
    pub fn run(&mut self, action: Action) {
        self.running.push(Scheduled {
            key: None,
            state: Running::start(action),
        });
    }

    /// Start an action under `key`, replacing any timeline already using it
    pub fn run_keyed(&mut self, key: ActionKey, action: Action) {
        self.cancel(key);
        self.running.push(Scheduled {
            key: Some(key),
            state: Running::start(action),
        });
    }

    /// Cancel the timeline under `key`. Returns whether one was running.
    pub fn cancel(&mut self, key: ActionKey) -> bool {
        let before = self.running.len();
        self.running.retain(|s| s.key != Some(key));
        self.running.len() != before
    }

    pub fn is_running(&self, key: ActionKey) -> bool {
        self.running.iter().any(|s| s.key == Some(key))
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advance all timelines by `dt`, applying fades to `target`.
    ///
    /// Returns fired commands in firing order; finished timelines are dropped.
    pub fn advance<T: AlphaTarget>(&mut self, dt: f64, target: &mut T) -> Vec<Command> {
        let mut fired = Vec::new();
        self.running
            .retain_mut(|s| s.state.advance(dt, target, &mut fired).is_none());
        fired
    }
}
