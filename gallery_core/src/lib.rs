//! Navigation and interaction core for the walkable gallery: room geometry,
//! damped first-person motion, collision resolution, ray-based focus, and
//! the eased turn state machine. Rendering, UI, and audio live behind the
//! boundaries in [`focus::SceneRaycast`] and [`events::GalleryEvent`].

pub mod collision;
pub mod events;
pub mod focus;
pub mod geometry;
pub mod motion;
pub mod session;
pub mod transition;

pub use events::GalleryEvent;
pub use focus::{FocusDetector, GalleryScene, MAX_ENGAGEMENT_DISTANCE, Ray, SceneRaycast};
pub use geometry::{GalleryGeometry, GeometryError};
pub use motion::{KeySnapshot, KeyboardState, MotionConfig, MotionIntegrator};
pub use session::{ClickOutcome, ControllerConfig, GalleryController, Pose, SessionState};
pub use transition::{TurnDirection, TurnScheduler, TurnStyle};
