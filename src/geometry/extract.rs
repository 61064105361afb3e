//! Deriving trail snapshots from labels when a sequence ships without
//! trail files: each labeled object's "trail" in a frame is the set of
//! lidar returns that fall inside its box.

use crate::types::{FrameTrails, Label, Point, TrailId, TrailPosition};

/// Whether `point` lies inside the yawed box of `label` (sensor coordinates)
pub fn label_contains(label: &Label, point: &Point) -> bool {
    let (sin, cos) = label.yaw_angle.sin_cos();
    let dx = point.x - label.center_x;
    let dy = point.y - label.center_y;
    let local_x = dx * cos - dy * sin;
    let local_y = dx * sin + dy * cos;

    local_x.abs() <= label.size_x / 2.0
        && local_y.abs() <= label.size_y / 2.0
        && point.z >= label.based_z
        && point.z <= label.based_z + label.size_z
}

/// One trail entry per label, in label order, holding the points inside it
pub fn extract_frame_trails(points: &[Point], labels: &[Label]) -> FrameTrails {
    labels
        .iter()
        .map(|label| {
            let inside = points
                .iter()
                .filter(|p| label_contains(label, p))
                .map(|p| TrailPosition {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                })
                .collect();
            (TrailId::new(label.id.clone()), inside)
        })
        .collect()
}
