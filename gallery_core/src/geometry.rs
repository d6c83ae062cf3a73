//! Static room geometry: walkable bounds for both room variants and the
//! placement of every painting panel. Built once from the catalog count,
//! immutable afterwards except for panel aspect ratios, which arrive
//! asynchronously as images finish decoding.

use glam::Vec3;
use thiserror::Error;

/// Painting panels hang with a fixed height; width follows the image aspect.
pub const PANEL_HEIGHT: f32 = 2.0;
/// Aspect ratio used until the real image reports its dimensions.
pub const PLACEHOLDER_ASPECT: f32 = 1.5;
/// Extra half-extent of the decorative frame behind each panel.
pub const FRAME_MARGIN: f32 = 0.1;

const HALL_WIDTH: f32 = 6.0;
const HALL_WALL_DISTANCE: f32 = 2.0;
const HALL_SPACING: f32 = 2.0;
const HALL_PANEL_Y: f32 = 1.0;
const HALL_EYE_HEIGHT: f32 = 1.6;

const ROTUNDA_WIDTH: f32 = 7.0;
const ROTUNDA_LENGTH: f32 = 11.0;
const ROTUNDA_OFFSET_Z: f32 = -1.0;
const ROTUNDA_NEAR_WALL_Z: f32 = -5.8;
const ROTUNDA_RING_RADIUS: f32 = 6.0;
const ROTUNDA_RING_THICKNESS: f32 = 0.5;
const ROTUNDA_SECTOR_WINDOW: f32 = 0.6;
const ROTUNDA_PANEL_Y: f32 = 1.0;

/// Margin kept between the viewer and every wall.
const WALL_MARGIN: f32 = 0.5;
/// Vertical band the viewer's position may occupy in either variant.
const FLOOR_Y: f32 = -0.5;
const CEILING_Y: f32 = 2.5;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("gallery needs at least one painting")]
    EmptyCollection,
}

/// Axis-aligned walkable region, margins already applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl RectBounds {
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.clamp(point) == point
    }
}

/// Corridor variant: paintings alternate between the two side walls every
/// `spacing` units of depth, so the walkable depth grows with the count.
#[derive(Debug, Clone)]
pub struct HallRoom {
    pub bounds: RectBounds,
    pub wall_distance: f32,
    pub spacing: f32,
}

impl HallRoom {
    pub fn for_count(count: usize) -> Self {
        let half_width = HALL_WIDTH / 2.0 - WALL_MARGIN;
        let far_z = (count.saturating_sub(1)) as f32 * HALL_SPACING + 5.0;
        HallRoom {
            bounds: RectBounds {
                min: Vec3::new(-half_width, FLOOR_Y, -5.0),
                max: Vec3::new(half_width, CEILING_Y, far_z),
            },
            wall_distance: HALL_WALL_DISTANCE,
            spacing: HALL_SPACING,
        }
    }
}

/// Rotunda variant: a rectangular outer room around a ring of paintings,
/// one per angular slot of width `2π/N`.
#[derive(Debug, Clone)]
pub struct RotundaRoom {
    pub bounds: RectBounds,
    /// Paintings hang past this z; the viewer may not cross it.
    pub near_wall_z: f32,
    pub ring_radius: f32,
    pub ring_thickness: f32,
    /// Angular tie-break window around each slot center, in radians.
    pub sector_window: f32,
    pub slot_count: usize,
}

impl RotundaRoom {
    pub fn for_count(count: usize) -> Self {
        let half_width = ROTUNDA_WIDTH / 2.0 - WALL_MARGIN;
        let half_length = ROTUNDA_LENGTH / 2.0 - WALL_MARGIN;
        RotundaRoom {
            bounds: RectBounds {
                min: Vec3::new(-half_width, FLOOR_Y, -half_length + ROTUNDA_OFFSET_Z),
                max: Vec3::new(half_width, CEILING_Y, half_length + ROTUNDA_OFFSET_Z),
            },
            near_wall_z: ROTUNDA_NEAR_WALL_Z,
            ring_radius: ROTUNDA_RING_RADIUS,
            ring_thickness: ROTUNDA_RING_THICKNESS,
            sector_window: ROTUNDA_SECTOR_WINDOW,
            slot_count: count,
        }
    }

    /// Center angle of slot `index`, measured as `atan2(z, x)`.
    pub fn slot_angle(&self, index: usize) -> f32 {
        std::f32::consts::TAU * index as f32 / self.slot_count.max(1) as f32
    }

    /// Slot whose tie-break window contains `angle`, if any. Slots are
    /// tested in index order and the first match wins, which makes the
    /// answer deterministic where windows would overlap.
    pub fn sector_at(&self, angle: f32) -> Option<usize> {
        let angle = angle.rem_euclid(std::f32::consts::TAU);
        for index in 0..self.slot_count {
            let center = self.slot_angle(index);
            let mut diff = (angle - center).abs();
            if diff > std::f32::consts::PI {
                diff = std::f32::consts::TAU - diff;
            }
            if diff < self.sector_window / 2.0 {
                return Some(index);
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
pub enum RoomShape {
    Hall(HallRoom),
    Rotunda(RotundaRoom),
}

impl RoomShape {
    pub fn bounds(&self) -> &RectBounds {
        match self {
            RoomShape::Hall(room) => &room.bounds,
            RoomShape::Rotunda(room) => &room.bounds,
        }
    }
}

/// One painting's slot in the room. `position` and `normal` describe the
/// panel at rest; the rotunda rotates both by the live gallery rotation when
/// hit-testing. `aspect` starts at the placeholder ratio and is replaced
/// once the image decodes.
#[derive(Debug, Clone)]
pub struct ItemPlacement {
    pub index: usize,
    pub position: Vec3,
    /// Unit vector the panel faces (out of the wall, toward the viewer).
    pub normal: Vec3,
    pub aspect: f32,
}

impl ItemPlacement {
    pub fn panel_half_width(&self) -> f32 {
        PANEL_HEIGHT * self.aspect / 2.0
    }

    pub fn panel_half_height(&self) -> f32 {
        PANEL_HEIGHT / 2.0
    }
}

/// Where the viewer stands when the gallery opens.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPose {
    pub position: Vec3,
    pub yaw: f32,
}

/// The registry the whole pipeline reads: room shape plus every placement,
/// fully populated before the first tick runs.
#[derive(Debug, Clone)]
pub struct GalleryGeometry {
    shape: RoomShape,
    placements: Vec<ItemPlacement>,
    spawn: SpawnPose,
}

impl GalleryGeometry {
    /// Corridor layout: painting `i` sits at depth `i * spacing`, on the
    /// left wall for even `i` and the right wall for odd `i`, facing inward.
    pub fn hall(count: usize) -> Result<Self, GeometryError> {
        if count == 0 {
            return Err(GeometryError::EmptyCollection);
        }
        let room = HallRoom::for_count(count);
        let placements = (0..count)
            .map(|index| {
                let z = index as f32 * room.spacing;
                let (x, normal) = if index % 2 == 0 {
                    (-room.wall_distance, Vec3::X)
                } else {
                    (room.wall_distance, Vec3::NEG_X)
                };
                ItemPlacement {
                    index,
                    position: Vec3::new(x, HALL_PANEL_Y, z),
                    normal,
                    aspect: PLACEHOLDER_ASPECT,
                }
            })
            .collect();
        Ok(GalleryGeometry {
            shape: RoomShape::Hall(room),
            placements,
            // Face down the corridor, toward ascending painting depths.
            spawn: SpawnPose {
                position: Vec3::new(0.0, HALL_EYE_HEIGHT, 0.0),
                yaw: std::f32::consts::PI,
            },
        })
    }

    /// Ring layout: painting `i` hangs at slot angle `2π·i/N` on the ring,
    /// facing the room center. Slot 0 starts frontmost.
    pub fn rotunda(count: usize) -> Result<Self, GeometryError> {
        if count == 0 {
            return Err(GeometryError::EmptyCollection);
        }
        let room = RotundaRoom::for_count(count);
        let placements = (0..count)
            .map(|index| {
                let angle = room.slot_angle(index);
                let radial = Vec3::new(angle.cos(), 0.0, angle.sin());
                ItemPlacement {
                    index,
                    position: radial * room.ring_radius + Vec3::Y * ROTUNDA_PANEL_Y,
                    normal: -radial,
                    aspect: PLACEHOLDER_ASPECT,
                }
            })
            .collect();
        Ok(GalleryGeometry {
            shape: RoomShape::Rotunda(room),
            placements,
            // Slot 0 lies along +x; face it from the center.
            spawn: SpawnPose {
                position: Vec3::ZERO,
                yaw: -std::f32::consts::FRAC_PI_2,
            },
        })
    }

    pub fn shape(&self) -> &RoomShape {
        &self.shape
    }

    pub fn placements(&self) -> &[ItemPlacement] {
        &self.placements
    }

    pub fn placement(&self, index: usize) -> Option<&ItemPlacement> {
        self.placements.get(index)
    }

    pub fn item_count(&self) -> usize {
        self.placements.len()
    }

    pub fn spawn(&self) -> SpawnPose {
        self.spawn
    }

    /// Late aspect-ratio update from an image decode. Returns false for an
    /// index the registry does not know.
    pub fn set_panel_aspect(&mut self, index: usize, aspect: f32) -> bool {
        match self.placements.get_mut(index) {
            Some(placement) if aspect.is_finite() && aspect > 0.0 => {
                placement.aspect = aspect;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hall_depth_grows_with_count() {
        let small = GalleryGeometry::hall(2).expect("geometry");
        let large = GalleryGeometry::hall(9).expect("geometry");
        let small_max = small.shape().bounds().max.z;
        let large_max = large.shape().bounds().max.z;
        assert!((small_max - 7.0).abs() < 1e-6);
        assert!((large_max - 21.0).abs() < 1e-6);
    }

    #[test]
    fn hall_alternates_walls() {
        let geometry = GalleryGeometry::hall(4).expect("geometry");
        let placements = geometry.placements();
        assert!(placements[0].position.x < 0.0);
        assert!(placements[1].position.x > 0.0);
        assert_eq!(placements[0].normal, Vec3::X);
        assert_eq!(placements[1].normal, Vec3::NEG_X);
        assert!((placements[3].position.z - 6.0).abs() < 1e-6);
    }

    #[test]
    fn rotunda_placements_face_center() {
        let geometry = GalleryGeometry::rotunda(6).expect("geometry");
        for placement in geometry.placements() {
            let radial = Vec3::new(placement.position.x, 0.0, placement.position.z);
            assert!((radial.length() - 6.0).abs() < 1e-5);
            let inward = -radial.normalize();
            assert!((placement.normal - inward).length() < 1e-5);
        }
    }

    #[test]
    fn empty_collection_is_refused() {
        assert!(GalleryGeometry::hall(0).is_err());
        assert!(GalleryGeometry::rotunda(0).is_err());
    }

    #[test]
    fn sector_lookup_uses_shortest_arc() {
        let room = RotundaRoom::for_count(6);
        assert_eq!(room.sector_at(0.0), Some(0));
        assert_eq!(room.sector_at(-0.25), Some(0));
        assert_eq!(room.sector_at(std::f32::consts::TAU - 0.25), Some(0));
        assert_eq!(room.sector_at(std::f32::consts::TAU / 6.0), Some(1));
        // Halfway between slots 0 and 1 no window applies.
        assert_eq!(room.sector_at(std::f32::consts::TAU / 12.0), None);
    }

    #[test]
    fn aspect_updates_only_known_panels() {
        let mut geometry = GalleryGeometry::hall(2).expect("geometry");
        assert!(geometry.set_panel_aspect(1, 0.8));
        assert!(!geometry.set_panel_aspect(5, 0.8));
        assert!(!geometry.set_panel_aspect(0, f32::NAN));
        let placement = geometry.placement(1).expect("placement");
        assert!((placement.panel_half_width() - 0.8).abs() < 1e-6);
    }
}
