//! Ray-based focus: which painting is the viewer looking at, and what did a
//! pointer click land on. The scene boundary is a trait returning ordered
//! hits, so a real renderer can stand in for the built-in hit-tester.

use glam::Vec3;

use crate::geometry::{FRAME_MARGIN, GalleryGeometry, ItemPlacement, RoomShape};
use crate::transition::TurnDirection;

/// Hover focus gives up past this distance; clicks are exempt.
pub const MAX_ENGAGEMENT_DISTANCE: f32 = 4.0;

/// Turn arrows flank the frontmost slot of the rotunda at this radius and
/// angular offset from it. They stay put while the ring rotates.
const ARROW_RADIUS: f32 = 5.0;
const ARROW_ANGLE_OFFSET: f32 = 0.35;
const ARROW_HALF_EXTENT: f32 = 0.25;

/// A ray with a normalized direction. Construction filters the degenerate
/// inputs (NaN components, zero-length direction) the detector must survive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() || !direction.is_finite() {
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Ray { origin, direction })
    }
}

/// What a hit-testable shape stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTag {
    /// A focusable painting panel.
    Artwork(usize),
    /// The decorative frame behind a panel; hit-testable but never focusable,
    /// and it must not shadow an artwork behind it.
    Frame(usize),
    /// A rotunda navigation arrow.
    TurnArrow(TurnDirection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub tag: TargetTag,
}

/// Renderer boundary: cast a ray, get back hits ordered by increasing
/// distance.
pub trait SceneRaycast {
    fn cast(&self, ray: &Ray) -> Vec<RayHit>;
}

/// Hit-tester over the geometry registry. For the rotunda it folds the live
/// gallery rotation into every panel's transform, and adds the two fixed
/// turn arrows.
pub struct GalleryScene<'a> {
    geometry: &'a GalleryGeometry,
    rotation: f32,
}

impl<'a> GalleryScene<'a> {
    pub fn new(geometry: &'a GalleryGeometry, rotation: f32) -> Self {
        GalleryScene { geometry, rotation }
    }

    fn panel_hits(&self, ray: &Ray, placement: &ItemPlacement, hits: &mut Vec<RayHit>) {
        let rotated = matches!(self.geometry.shape(), RoomShape::Rotunda(_));
        let (position, normal) = if rotated {
            (
                rotate_y(placement.position, self.rotation),
                rotate_y(placement.normal, self.rotation),
            )
        } else {
            (placement.position, placement.normal)
        };

        let half_w = placement.panel_half_width();
        let half_h = placement.panel_half_height();
        if let Some(distance) = quad_intersection(ray, position, normal, half_w, half_h) {
            hits.push(RayHit {
                distance,
                tag: TargetTag::Artwork(placement.index),
            });
        }
        // The frame sits just behind the panel and overhangs it; a ray that
        // misses the canvas can still strike the frame.
        let frame_position = position - normal * 0.005;
        if let Some(distance) = quad_intersection(
            ray,
            frame_position,
            normal,
            half_w + FRAME_MARGIN,
            half_h + FRAME_MARGIN,
        ) {
            hits.push(RayHit {
                distance,
                tag: TargetTag::Frame(placement.index),
            });
        }
    }

    fn arrow_hits(&self, ray: &Ray, hits: &mut Vec<RayHit>) {
        let RoomShape::Rotunda(room) = self.geometry.shape() else {
            return;
        };
        for (direction, side) in [(TurnDirection::Left, 1.0), (TurnDirection::Right, -1.0)] {
            let angle = side * ARROW_ANGLE_OFFSET;
            let radial = Vec3::new(angle.cos(), 0.0, angle.sin());
            let position = radial * ARROW_RADIUS.min(room.ring_radius) + Vec3::Y;
            if let Some(distance) =
                quad_intersection(ray, position, -radial, ARROW_HALF_EXTENT, ARROW_HALF_EXTENT)
            {
                hits.push(RayHit {
                    distance,
                    tag: TargetTag::TurnArrow(direction),
                });
            }
        }
    }
}

impl SceneRaycast for GalleryScene<'_> {
    fn cast(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for placement in self.geometry.placements() {
            self.panel_hits(ray, placement, &mut hits);
        }
        self.arrow_hits(ray, &mut hits);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Distance along `ray` to a wall-mounted quad, if struck from either side.
fn quad_intersection(
    ray: &Ray,
    center: Vec3,
    normal: Vec3,
    half_width: f32,
    half_height: f32,
) -> Option<f32> {
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let distance = (center - ray.origin).dot(normal) / denom;
    if distance <= 1e-4 {
        return None;
    }
    let point = ray.origin + ray.direction * distance;
    let offset = point - center;
    let lateral = Vec3::Y.cross(normal);
    if offset.dot(lateral).abs() <= half_width && offset.y.abs() <= half_height {
        Some(distance)
    } else {
        None
    }
}

fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Simple pinhole camera for turning pointer coordinates into rays.
#[derive(Debug, Clone, Copy)]
pub struct CameraLens {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub aspect: f32,
}

impl CameraLens {
    /// Ray through a pointer position in normalized device coordinates
    /// (`[-1, 1]` on both axes, +y up). NaN coordinates yield no ray.
    pub fn pointer_ray(&self, eye: Vec3, yaw: f32, pitch: f32, ndc: [f32; 2]) -> Option<Ray> {
        let forward = view_forward(yaw, pitch);
        let right = Vec3::Y.cross(forward).normalize_or_zero() * -1.0;
        let up = forward.cross(right).normalize_or_zero() * -1.0;
        let half_height = (self.fov_y / 2.0).tan();
        let direction = forward
            + right * (ndc[0] * half_height * self.aspect)
            + up * (ndc[1] * half_height);
        Ray::new(eye, direction)
    }
}

/// View direction for a yaw/pitch pair; yaw 0 faces −z, positive pitch
/// looks up.
pub fn view_forward(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
}

/// Change reported when the hover focus moves between items (or to none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Tracks the hovered painting frame to frame and reports edges only.
#[derive(Debug, Clone)]
pub struct FocusDetector {
    current: Option<usize>,
    max_distance: f32,
}

impl FocusDetector {
    pub fn new(max_distance: f32) -> Self {
        FocusDetector {
            current: None,
            max_distance,
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Re-evaluate hover focus for this frame. `ray` may be `None` when the
    /// view direction is degenerate; that reads as "nothing focused".
    /// Returns a change exactly when the result differs from last frame.
    pub fn update(&mut self, scene: &dyn SceneRaycast, ray: Option<Ray>) -> Option<FocusChange> {
        let focused = ray.and_then(|ray| {
            first_artwork(&scene.cast(&ray))
                .filter(|&(_, distance)| distance <= self.max_distance)
                .map(|(index, _)| index)
        });
        if focused == self.current {
            return None;
        }
        let change = FocusChange {
            previous: self.current,
            current: focused,
        };
        self.current = focused;
        Some(change)
    }
}

/// First focusable entry of an ordered hit list. Frames and other scenery
/// are stepped over so they cannot shadow the panel behind them.
pub fn first_artwork(hits: &[RayHit]) -> Option<(usize, f32)> {
    hits.iter().find_map(|hit| match hit.tag {
        TargetTag::Artwork(index) => Some((index, hit.distance)),
        _ => None,
    })
}

/// First interactive entry of an ordered hit list; used by the click path,
/// where turn arrows count as well.
pub fn first_interactive(hits: &[RayHit]) -> Option<TargetTag> {
    hits.iter().find_map(|hit| match hit.tag {
        TargetTag::Frame(_) => None,
        tag => Some(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GalleryGeometry;

    fn hall_scene(geometry: &GalleryGeometry) -> GalleryScene<'_> {
        GalleryScene::new(geometry, 0.0)
    }

    fn ray_at_painting(geometry: &GalleryGeometry, index: usize, distance: f32) -> Ray {
        let placement = geometry.placement(index).expect("placement");
        let origin = placement.position + placement.normal * distance;
        Ray::new(origin, -placement.normal).expect("ray")
    }

    #[test]
    fn ray_rejects_degenerate_input() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
        assert!(Ray::new(Vec3::new(f32::INFINITY, 0.0, 0.0), Vec3::X).is_none());
    }

    #[test]
    fn straight_on_ray_focuses_the_placed_painting() {
        let geometry = GalleryGeometry::hall(7).expect("geometry");
        let scene = hall_scene(&geometry);
        let mut detector = FocusDetector::new(MAX_ENGAGEMENT_DISTANCE);

        let ray = ray_at_painting(&geometry, 3, 2.0);
        let change = detector.update(&scene, Some(ray)).expect("change");
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some(3));
    }

    #[test]
    fn unchanged_ray_reports_exactly_one_change() {
        let geometry = GalleryGeometry::hall(7).expect("geometry");
        let scene = hall_scene(&geometry);
        let mut detector = FocusDetector::new(MAX_ENGAGEMENT_DISTANCE);

        let ray = ray_at_painting(&geometry, 2, 2.0);
        let mut changes = 0;
        for _ in 0..30 {
            if detector.update(&scene, Some(ray)).is_some() {
                changes += 1;
            }
        }
        assert_eq!(changes, 1);
        assert_eq!(detector.current(), Some(2));
    }

    #[test]
    fn losing_the_painting_emits_one_clearing_change() {
        let geometry = GalleryGeometry::hall(7).expect("geometry");
        let scene = hall_scene(&geometry);
        let mut detector = FocusDetector::new(MAX_ENGAGEMENT_DISTANCE);

        detector.update(&scene, Some(ray_at_painting(&geometry, 1, 2.0)));
        let away = Ray::new(Vec3::new(0.0, 1.6, 0.0), Vec3::Y).expect("ray");
        let change = detector.update(&scene, Some(away)).expect("change");
        assert_eq!(change.previous, Some(1));
        assert_eq!(change.current, None);
        assert!(detector.update(&scene, Some(away)).is_none());
    }

    #[test]
    fn too_distant_painting_is_not_focused() {
        let geometry = GalleryGeometry::hall(7).expect("geometry");
        let scene = hall_scene(&geometry);
        let mut detector = FocusDetector::new(MAX_ENGAGEMENT_DISTANCE);

        let ray = ray_at_painting(&geometry, 0, 4.5);
        assert!(detector.update(&scene, Some(ray)).is_none());
        assert_eq!(detector.current(), None);
    }

    #[test]
    fn degenerate_ray_clears_focus() {
        let geometry = GalleryGeometry::hall(7).expect("geometry");
        let scene = hall_scene(&geometry);
        let mut detector = FocusDetector::new(MAX_ENGAGEMENT_DISTANCE);

        detector.update(&scene, Some(ray_at_painting(&geometry, 0, 2.0)));
        let change = detector.update(&scene, None).expect("change");
        assert_eq!(change.current, None);
    }

    #[test]
    fn frames_do_not_shadow_their_panel() {
        let geometry = GalleryGeometry::hall(3).expect("geometry");
        let scene = hall_scene(&geometry);
        let ray = ray_at_painting(&geometry, 0, 2.0);
        let hits = scene.cast(&ray);
        // Both the panel and its frame are struck; the panel must win even
        // though the hit list interleaves scenery.
        assert!(hits.len() >= 2);
        assert_eq!(first_artwork(&hits).map(|(index, _)| index), Some(0));
    }

    #[test]
    fn click_walk_skips_frames_but_keeps_arrows() {
        let hits = [
            RayHit {
                distance: 1.0,
                tag: TargetTag::Frame(4),
            },
            RayHit {
                distance: 2.0,
                tag: TargetTag::TurnArrow(TurnDirection::Left),
            },
            RayHit {
                distance: 3.0,
                tag: TargetTag::Artwork(4),
            },
        ];
        assert_eq!(
            first_interactive(&hits),
            Some(TargetTag::TurnArrow(TurnDirection::Left))
        );
        assert_eq!(first_artwork(&hits).map(|(index, _)| index), Some(4));
    }

    #[test]
    fn rotunda_rotation_moves_the_focused_slot() {
        let geometry = GalleryGeometry::rotunda(6).expect("geometry");
        // Looking at the frontmost slot from the center.
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).expect("ray");

        let at_rest = GalleryScene::new(&geometry, 0.0);
        assert_eq!(
            first_artwork(&at_rest.cast(&ray)).map(|(index, _)| index),
            Some(0)
        );

        // One full slot of rotation brings painting 1 to the front.
        let turned = GalleryScene::new(&geometry, -std::f32::consts::TAU / 6.0);
        assert_eq!(
            first_artwork(&turned.cast(&ray)).map(|(index, _)| index),
            Some(1)
        );
    }

    #[test]
    fn rotunda_arrows_are_clickable() {
        let geometry = GalleryGeometry::rotunda(6).expect("geometry");
        let scene = GalleryScene::new(&geometry, 0.0);
        let angle = ARROW_ANGLE_OFFSET;
        let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), direction).expect("ray");
        assert_eq!(
            first_interactive(&scene.cast(&ray)),
            Some(TargetTag::TurnArrow(TurnDirection::Left))
        );
    }

    #[test]
    fn pointer_ray_matches_view_center() {
        let lens = CameraLens {
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
        };
        let eye = Vec3::new(0.0, 1.6, 0.0);
        let ray = lens.pointer_ray(eye, 0.3, -0.1, [0.0, 0.0]).expect("ray");
        let forward = view_forward(0.3, -0.1);
        assert!((ray.direction - forward).length() < 1e-5);
        assert!(lens.pointer_ray(eye, 0.0, 0.0, [f32::NAN, 0.0]).is_none());
    }

    #[test]
    fn pointer_ray_offsets_follow_the_pointer() {
        let lens = CameraLens {
            fov_y: 60f32.to_radians(),
            aspect: 1.0,
        };
        let eye = Vec3::ZERO;
        // Yaw 0 faces -z; +x pointer must bend the ray toward +x, +y up.
        let right = lens.pointer_ray(eye, 0.0, 0.0, [0.5, 0.0]).expect("ray");
        assert!(right.direction.x > 0.0, "{right:?}");
        let up = lens.pointer_ray(eye, 0.0, 0.0, [0.0, 0.5]).expect("ray");
        assert!(up.direction.y > 0.0, "{up:?}");
    }
}
