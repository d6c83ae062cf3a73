//! Session state and the per-frame controller. The session object replaces
//! the original exhibit's ambient mode flags with explicit state the
//! controller owns; the controller wires input snapshots through motion,
//! collision, focus, and turns, and queues events for the host to drain.

use std::collections::VecDeque;

use glam::Vec3;
use log::debug;

use crate::collision;
use crate::events::GalleryEvent;
use crate::focus::{
    CameraLens, FocusDetector, GalleryScene, MAX_ENGAGEMENT_DISTANCE, Ray, SceneRaycast, TargetTag,
    first_interactive, view_forward,
};
use crate::geometry::{GalleryGeometry, RoomShape};
use crate::motion::{KeySnapshot, MotionConfig, MotionIntegrator};
use crate::transition::{TurnDirection, TurnScheduler, TurnStyle};

/// Straight up/down would gimbal the look controls; stop just short.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const POINTER_SENSITIVITY: f32 = 0.002;

/// Viewer pose. Mutated once per frame by the motion/collision pipeline and
/// by captured pointer motion; never shared for concurrent write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Pose {
    pub fn forward(&self) -> Vec3 {
        view_forward(self.yaw, self.pitch)
    }
}

/// Explicit mode state: capture, key routing, and the detail overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionState {
    captured: bool,
    keys_disabled: bool,
    overlay_open: bool,
    capture_before_overlay: bool,
}

impl SessionState {
    pub fn captured(&self) -> bool {
        self.captured
    }

    /// Gallery-level key commands (turns, activation) are routed only while
    /// no overlay holds them.
    pub fn keys_enabled(&self) -> bool {
        !self.keys_disabled
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }
}

/// What a pointer click asked the host to do. Activation and turns are also
/// queued as events; capture acquisition is only ever a request, because the
/// pointer lock itself is a host resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Activated(usize),
    Turned(TurnDirection),
    CaptureRequested,
    Ignored,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub motion: MotionConfig,
    pub max_focus_distance: f32,
    /// Vertical field of view of the presentation camera, radians. Used to
    /// turn pointer coordinates back into world rays.
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            motion: MotionConfig::default(),
            max_focus_distance: MAX_ENGAGEMENT_DISTANCE,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }
}

/// The navigation core. One instance per gallery view; ticked once per
/// rendered frame by the host.
pub struct GalleryController {
    geometry: GalleryGeometry,
    motion: MotionIntegrator,
    focus: FocusDetector,
    turns: TurnScheduler,
    session: SessionState,
    pose: Pose,
    lens: CameraLens,
    eye_offset: f32,
    moving: bool,
    events: VecDeque<GalleryEvent>,
}

impl GalleryController {
    /// The geometry argument is the initialization barrier: it can only be
    /// built from a non-empty catalog, so the pipeline never sees N = 0.
    pub fn new(geometry: GalleryGeometry, config: ControllerConfig) -> Self {
        let spawn = geometry.spawn();
        let slot_count = geometry.item_count();
        GalleryController {
            geometry,
            motion: MotionIntegrator::new(config.motion),
            focus: FocusDetector::new(config.max_focus_distance),
            turns: TurnScheduler::new(slot_count),
            session: SessionState::default(),
            pose: Pose {
                position: spawn.position,
                yaw: spawn.yaw,
                pitch: 0.0,
            },
            lens: CameraLens {
                fov_y: config.fov_y,
                aspect: config.aspect,
            },
            eye_offset: 0.0,
            moving: false,
            events: VecDeque::new(),
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Eye position including the cosmetic bob/breathing offset. Applied
    /// after collision resolution, so it may poke past the height band by
    /// the bob amplitude; accepted drift.
    pub fn eye_position(&self) -> Vec3 {
        self.pose.position + Vec3::Y * self.eye_offset
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus.current()
    }

    /// Live gallery rotation; the presentation layer writes this to the
    /// scene root every frame, running turn or not.
    pub fn rotation(&self) -> f32 {
        self.turns.rotation()
    }

    pub fn current_index(&self) -> usize {
        self.turns.current_index()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn geometry(&self) -> &GalleryGeometry {
        &self.geometry
    }

    /// One frame. Motion and hover focus run only while capture is held and
    /// no overlay covers the view; the turn scheduler always advances.
    pub fn tick(&mut self, dt: f32, keys: &KeySnapshot) {
        if self.session.captured && !self.session.overlay_open {
            let step = self.motion.integrate(dt, keys, self.pose.yaw);
            let proposed = self.pose.position + step.displacement;
            self.pose.position = collision::resolve(self.geometry.shape(), proposed);
            self.eye_offset = step.eye_offset;
            self.moving = step.moving;

            let ray = Ray::new(self.eye_position(), self.pose.forward());
            let scene = GalleryScene::new(&self.geometry, self.turns.rotation());
            if let Some(change) = self.focus.update(&scene, ray) {
                self.events.push_back(GalleryEvent::FocusChanged {
                    previous: change.previous,
                    current: change.current,
                });
            }
        }

        if let Some(done) = self.turns.tick(dt) {
            self.events.push_back(GalleryEvent::TurnCompleted {
                next_index: done.next_index,
            });
        }
    }

    /// Captured pointer motion steers the view. Outside capture the pointer
    /// belongs to the host cursor and is ignored here.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32) {
        if !self.session.captured || self.session.overlay_open {
            return;
        }
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pose.yaw -= dx * POINTER_SENSITIVITY;
        self.pose.pitch = (self.pose.pitch - dy * POINTER_SENSITIVITY)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Capture lock/unlock notification from the input boundary. Release
    /// halts navigation on the spot: residual velocity would otherwise
    /// carry into the next capture.
    pub fn set_captured(&mut self, captured: bool) {
        if self.session.captured == captured {
            return;
        }
        self.session.captured = captured;
        self.motion.reset();
        if !captured {
            self.moving = false;
        }
        self.events
            .push_back(GalleryEvent::CaptureChanged { captured });
    }

    /// Pointer click outside capture. `pointer` is the click position in
    /// normalized device coordinates; `None` (or NaN coordinates) reads as
    /// a click that hit nothing.
    pub fn handle_click(&mut self, pointer: Option<[f32; 2]>) -> ClickOutcome {
        if self.session.captured || self.session.overlay_open {
            return ClickOutcome::Ignored;
        }

        let target = pointer
            .and_then(|ndc| {
                self.lens
                    .pointer_ray(self.eye_position(), self.pose.yaw, self.pose.pitch, ndc)
            })
            .and_then(|ray| {
                let scene = GalleryScene::new(&self.geometry, self.turns.rotation());
                first_interactive(&scene.cast(&ray))
            });

        match target {
            Some(TargetTag::Artwork(index)) => {
                // The rotunda opens its frontmost painting no matter which
                // panel was struck; the hall opens the struck panel.
                let index = match self.geometry.shape() {
                    RoomShape::Rotunda(_) => self.turns.current_index(),
                    RoomShape::Hall(_) => index,
                };
                self.activate_index(index);
                ClickOutcome::Activated(index)
            }
            Some(TargetTag::TurnArrow(direction)) => {
                self.turn(direction, TurnStyle::ARROWS);
                ClickOutcome::Turned(direction)
            }
            Some(TargetTag::Frame(_)) | None => {
                // Empty space: an already-focused painting wins, otherwise
                // the click asks to re-enter navigation.
                if let Some(index) = self.focus.current() {
                    self.activate_index(index);
                    ClickOutcome::Activated(index)
                } else {
                    ClickOutcome::CaptureRequested
                }
            }
        }
    }

    /// Keyboard activation. Prefers the hover focus; without one, the hall
    /// falls back to the painting nearest along the corridor and the
    /// rotunda to its frontmost slot.
    pub fn activate(&mut self) -> Option<usize> {
        if !self.session.keys_enabled() {
            return None;
        }
        let index = match self.focus.current() {
            Some(index) => index,
            None => match self.geometry.shape() {
                RoomShape::Hall(room) => nearest_hall_index(
                    self.pose.position.z,
                    room.spacing,
                    self.geometry.item_count(),
                ),
                RoomShape::Rotunda(_) => self.turns.current_index(),
            },
        };
        self.activate_index(index);
        Some(index)
    }

    /// Start (or supersede) a turn of one slot.
    pub fn turn(&mut self, direction: TurnDirection, style: TurnStyle) {
        if !self.session.keys_enabled() {
            return;
        }
        let started = self.turns.begin(direction, style);
        self.events.push_back(GalleryEvent::TurnStarted {
            direction: started.direction,
            next_index: started.next_index,
        });
    }

    /// The detail overlay is opening: remember whether capture was held,
    /// release it, stop motion, and take the gallery keys.
    pub fn open_overlay(&mut self, index: usize) {
        if self.session.overlay_open {
            return;
        }
        self.session.capture_before_overlay = self.session.captured;
        self.set_captured(false);
        self.session.keys_disabled = true;
        self.session.overlay_open = true;
        self.events.push_back(GalleryEvent::OverlayOpened { index });
    }

    /// The overlay closed. Returns whether the host should re-acquire
    /// capture: only if it was held when the overlay opened.
    pub fn close_overlay(&mut self) -> bool {
        if !self.session.overlay_open {
            return false;
        }
        self.session.overlay_open = false;
        self.session.keys_disabled = false;
        let recapture = self.session.capture_before_overlay;
        self.session.capture_before_overlay = false;
        self.events
            .push_back(GalleryEvent::OverlayClosed { recapture });
        recapture
    }

    /// An image finished decoding; its panel takes the real aspect ratio.
    pub fn set_panel_aspect(&mut self, index: usize, aspect: f32) -> bool {
        self.geometry.set_panel_aspect(index, aspect)
    }

    pub fn drain_events(&mut self) -> Vec<GalleryEvent> {
        self.events.drain(..).collect()
    }

    fn activate_index(&mut self, index: usize) {
        debug!("activating painting {index}");
        self.events
            .push_back(GalleryEvent::ItemActivated { index });
    }
}

/// Painting whose corridor depth is nearest to `z`.
fn nearest_hall_index(z: f32, spacing: f32, count: usize) -> usize {
    let raw = (z / spacing).round();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(count.saturating_sub(1))
    }
}
