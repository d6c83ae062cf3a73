//! Per-frame motion integration: held keys become a damped horizontal
//! velocity and a proposed displacement. The cosmetic head-bob and breathing
//! offsets ride along but never enter the collision-relevant position.

use glam::{Vec2, Vec3};

/// Snapshot of the directional keys and the sprint modifier for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

impl KeySnapshot {
    pub fn any_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Accumulates key-down/key-up events, delivered by logical key name, into
/// the per-frame snapshot the integrator consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardState {
    snapshot: KeySnapshot,
}

impl KeyboardState {
    /// Apply one key event. Returns false for keys the gallery does not
    /// bind, so the host can pass them on.
    pub fn key_event(&mut self, code: &str, pressed: bool) -> bool {
        match code {
            "KeyW" => self.snapshot.forward = pressed,
            "KeyS" => self.snapshot.back = pressed,
            "KeyA" => self.snapshot.left = pressed,
            "KeyD" => self.snapshot.right = pressed,
            "ShiftLeft" | "ShiftRight" => self.snapshot.sprint = pressed,
            _ => return false,
        }
        true
    }

    pub fn snapshot(&self) -> KeySnapshot {
        self.snapshot
    }

    /// Forget every held key, as when the window loses input altogether.
    pub fn release_all(&mut self) {
        self.snapshot = KeySnapshot::default();
    }
}

/// Tuning constants for the integrator. Defaults match the exhibit's feel:
/// walking settles at `walk_speed / damping` units per second.
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub damping: f32,
    /// Upper bound on a single integration step; larger frame gaps (a
    /// backgrounded tab) are truncated instead of teleporting the viewer.
    pub max_step: f32,
    /// Speed below which the viewer counts as standing still.
    pub moving_threshold: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    /// Bob frequency and amplitude gain while sprinting.
    pub sprint_bob_gain: f32,
    pub breathing_frequency: f32,
    pub breathing_amplitude: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            walk_speed: 10.0,
            run_speed: 17.0,
            damping: 10.0,
            max_step: 0.1,
            moving_threshold: 0.05,
            bob_frequency: 10.0,
            bob_amplitude: 0.05,
            sprint_bob_gain: 1.5,
            breathing_frequency: 1.5,
            breathing_amplitude: 0.02,
        }
    }
}

/// Outcome of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Proposed horizontal displacement in world space for this frame.
    pub displacement: Vec3,
    /// Cosmetic vertical eye offset (bob while moving, breathing at rest).
    pub eye_offset: f32,
    pub moving: bool,
}

impl MotionStep {
    pub fn rest() -> Self {
        MotionStep {
            displacement: Vec3::ZERO,
            eye_offset: 0.0,
            moving: false,
        }
    }
}

/// Integrates held-key input into a damped velocity, frame by frame.
/// Velocity lives in viewer-local space (x lateral, y forward) and is
/// rotated into world space by the current yaw when the step is produced.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    config: MotionConfig,
    velocity: Vec2,
    bob_timer: f32,
    breathing_timer: f32,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig) -> Self {
        MotionIntegrator {
            config,
            velocity: Vec2::ZERO,
            bob_timer: 0.0,
            breathing_timer: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Drop all residual velocity and cosmetic timers. Called when capture
    /// is released or the detail overlay opens, so navigation halts on the
    /// same frame with no carry-over.
    pub fn reset(&mut self) {
        self.velocity = Vec2::ZERO;
        self.bob_timer = 0.0;
        self.breathing_timer = 0.0;
    }

    pub fn integrate(&mut self, dt: f32, keys: &KeySnapshot, yaw: f32) -> MotionStep {
        let dt = dt.clamp(0.0, self.config.max_step);
        if dt == 0.0 {
            return MotionStep {
                displacement: Vec3::ZERO,
                eye_offset: self.resting_offset(),
                moving: false,
            };
        }

        let decay = (self.config.damping * dt).min(1.0);
        self.velocity -= self.velocity * decay;

        let speed = if keys.sprint {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };

        // Normalize so diagonal input is no faster than axis-aligned, but
        // never normalize a zero vector; each axis only receives drive while
        // one of its keys is held.
        let axes = Vec2::new(
            (keys.right as i32 - keys.left as i32) as f32,
            (keys.forward as i32 - keys.back as i32) as f32,
        );
        if axes.length_squared() > 0.0 {
            let direction = axes.normalize();
            if keys.forward || keys.back {
                self.velocity.y += direction.y * speed * dt;
            }
            if keys.left || keys.right {
                self.velocity.x += direction.x * speed * dt;
            }
        }

        let moving = self.velocity.length() > self.config.moving_threshold
            && keys.any_direction();

        let eye_offset = if moving {
            let gain = if keys.sprint {
                self.config.sprint_bob_gain
            } else {
                1.0
            };
            self.bob_timer += dt * self.config.bob_frequency * gain;
            self.bob_timer.sin() * self.config.bob_amplitude * gain
        } else {
            self.breathing_timer += dt * self.config.breathing_frequency;
            self.resting_offset()
        };

        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let forward = Vec3::new(-sin_yaw, 0.0, -cos_yaw);
        let right = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        let displacement = (right * self.velocity.x + forward * self.velocity.y) * dt;

        MotionStep {
            displacement,
            eye_offset,
            moving,
        }
    }

    fn resting_offset(&self) -> f32 {
        self.breathing_timer.sin() * self.config.breathing_amplitude
    }
}
