//! The turn state machine: one eased rotation of `±2π/N` at a time. The
//! presentation layer reads `rotation()` every frame whether or not a turn
//! is running; labels update only when a completion is reported.

use std::f32::consts::TAU;

use serde::Serialize;

/// Which way the content set advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    QuadraticInOut,
    CubicInOut,
}

impl Easing {
    /// Map a linear fraction in `[0, 1]` onto the eased curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let back = 2.0 * t - 2.0;
                    0.5 * back * back * back + 1.0
                }
            }
        }
    }
}

/// Duration and curve of one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnStyle {
    pub duration: f32,
    pub easing: Easing,
}

impl TurnStyle {
    /// Arrow-key turns: quick, cubic.
    pub const KEYS: TurnStyle = TurnStyle {
        duration: 1.0,
        easing: Easing::CubicInOut,
    };
    /// On-screen arrow turns: slower, quadratic.
    pub const ARROWS: TurnStyle = TurnStyle {
        duration: 1.5,
        easing: Easing::QuadraticInOut,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RunningTurn {
    start: f32,
    target: f32,
    elapsed: f32,
    style: TurnStyle,
    next_index: usize,
}

/// Fired when a turn begins; `next_index` is fixed at start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnStarted {
    pub direction: TurnDirection,
    pub next_index: usize,
}

/// Fired exactly once, when the rotation commits to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnCompleted {
    pub next_index: usize,
}

/// Owns the gallery rotation and at most one running turn.
///
/// Concurrent-start policy: a command that arrives mid-turn supersedes the
/// running turn. The running turn is cancelled without completing, and the
/// new turn starts from the live interpolated rotation with its next index
/// recomputed from that value.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    slot_count: usize,
    rotation: f32,
    running: Option<RunningTurn>,
}

impl TurnScheduler {
    pub fn new(slot_count: usize) -> Self {
        TurnScheduler {
            slot_count: slot_count.max(1),
            rotation: 0.0,
            running: None,
        }
    }

    /// Live rotation value, valid to read every frame in any state.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Index of the frontmost item for the live rotation.
    pub fn current_index(&self) -> usize {
        index_for_rotation(self.rotation, self.slot_count)
    }

    pub fn begin(&mut self, direction: TurnDirection, style: TurnStyle) -> TurnStarted {
        // Supersede: drop any running turn at its live rotation. Its
        // completion never fires.
        self.running = None;

        let slot = TAU / self.slot_count as f32;
        let current = self.current_index();
        let (target, next_index) = match direction {
            TurnDirection::Left => (
                self.rotation - slot,
                (current + 1) % self.slot_count,
            ),
            TurnDirection::Right => (
                self.rotation + slot,
                (current + self.slot_count - 1) % self.slot_count,
            ),
        };

        self.running = Some(RunningTurn {
            start: self.rotation,
            target,
            elapsed: 0.0,
            style,
            next_index,
        });
        TurnStarted {
            direction,
            next_index,
        }
    }

    /// Abandon a running turn, freezing the rotation at its live value.
    pub fn cancel(&mut self) {
        self.running = None;
    }

    pub fn tick(&mut self, dt: f32) -> Option<TurnCompleted> {
        let run = self.running.as_mut()?;
        run.elapsed += dt.max(0.0);
        let t = (run.elapsed / run.style.duration).min(1.0);
        let eased = run.style.easing.apply(t);
        self.rotation = run.start + (run.target - run.start) * eased;

        if run.elapsed >= run.style.duration {
            self.rotation = run.target;
            let next_index = run.next_index;
            self.running = None;
            Some(TurnCompleted { next_index })
        } else {
            None
        }
    }
}

/// Frontmost index for a rotation value: each slot is `2π/N` wide and the
/// ring turns negative as indices ascend.
fn index_for_rotation(rotation: f32, slot_count: usize) -> usize {
    let normalized = rotation.rem_euclid(TAU);
    let raw = (-normalized / TAU) * slot_count as f32 + slot_count as f32;
    (raw.round() as usize) % slot_count
}
