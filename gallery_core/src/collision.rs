//! Position correction against room bounds and painting exclusion zones.
//! `resolve` is total: any input position comes back inside the walkable
//! region, and a valid position passes through unchanged.

use glam::{Vec2, Vec3};

use crate::geometry::{RoomShape, RotundaRoom};

/// Radii below this are treated as "at the center", where the viewer's
/// angle carries no direction information for the radial push.
const DEGENERATE_RADIUS: f32 = 1e-5;

/// Clamp or push `proposed` until it satisfies every constraint of `shape`.
pub fn resolve(shape: &RoomShape, proposed: Vec3) -> Vec3 {
    match shape {
        RoomShape::Hall(room) => room.bounds.clamp(proposed),
        RoomShape::Rotunda(room) => resolve_rotunda(room, proposed),
    }
}

/// Rotunda resolution runs clamp, radial push, re-clamp, in that order. The
/// outward push in the middle can leave the rectangular bound, so the final
/// clamp is not optional.
fn resolve_rotunda(room: &RotundaRoom, proposed: Vec3) -> Vec3 {
    let mut position = room.bounds.clamp(proposed);

    let radial = Vec2::new(position.x, position.z);
    let radius = radial.length();
    let angle = if radius > DEGENERATE_RADIUS {
        radial.y.atan2(radial.x)
    } else {
        0.0
    };

    if let Some(sector) = room.sector_at(angle) {
        let min_radius = room.ring_radius - room.ring_thickness;
        if radius < min_radius {
            // Push straight out along the current angle; from the exact
            // center there is no current angle, so use the sector's own.
            let push_angle = if radius > DEGENERATE_RADIUS {
                angle
            } else {
                room.slot_angle(sector)
            };
            position.x = push_angle.cos() * min_radius;
            position.z = push_angle.sin() * min_radius;
        }
    }

    position.z = position.z.max(room.near_wall_z);
    room.bounds.clamp(position)
}
