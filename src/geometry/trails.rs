use std::collections::BTreeMap;

use glam::Vec3;

use crate::math::sensor_to_scene;
use crate::types::{FrameTrails, Rgb, TrailId};

pub const TRAIL_COLOR: Rgb = [1.0, 0.0, 0.0];

/// Historical positions of one tracked object up to one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TrailPointSet {
    positions: Vec<Vec3>,
}

impl TrailPointSet {
    /// Scene-space positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Builds one frame's trail renderables
pub struct TrailBuilder;

impl TrailBuilder {
    /// Ids without positions in this frame get no entry. An id listed twice
    /// has its positions concatenated in file order.
    pub fn build(trails: &FrameTrails) -> BTreeMap<TrailId, TrailPointSet> {
        let mut built: BTreeMap<TrailId, TrailPointSet> = BTreeMap::new();

        for (id, positions) in trails {
            if positions.is_empty() {
                continue;
            }
            let scene_positions = positions.iter().map(|p| sensor_to_scene(p.x, p.y, p.z));
            built
                .entry(id.clone())
                .or_insert_with(|| TrailPointSet {
                    positions: Vec::with_capacity(positions.len()),
                })
                .positions
                .extend(scene_positions);
        }

        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrailPosition;

    fn pos(x: f32, y: f32, z: f32) -> TrailPosition {
        TrailPosition { x, y, z }
    }

    #[test]
    fn empty_entries_produce_no_renderable() {
        let trails: FrameTrails = vec![
            (TrailId::from("a"), vec![pos(1.0, 2.0, 3.0)]),
            (TrailId::from("b"), vec![]),
        ];
        let built = TrailBuilder::build(&trails);
        assert_eq!(built.len(), 1);
        assert!(built.contains_key(&TrailId::from("a")));
        assert!(!built.contains_key(&TrailId::from("b")));
    }

    #[test]
    fn positions_use_scene_axes() {
        let trails: FrameTrails = vec![(TrailId::from("a"), vec![pos(1.0, 2.0, 3.0)])];
        let built = TrailBuilder::build(&trails);
        assert_eq!(built[&TrailId::from("a")].positions(), &[Vec3::new(1.0, 3.0, 2.0)]);
    }

    #[test]
    fn repeated_id_is_merged() {
        let trails: FrameTrails = vec![
            (TrailId::from("a"), vec![pos(0.0, 0.0, 0.0)]),
            (TrailId::from("a"), vec![pos(1.0, 0.0, 0.0), pos(2.0, 0.0, 0.0)]),
        ];
        let built = TrailBuilder::build(&trails);
        assert_eq!(built[&TrailId::from("a")].len(), 3);
    }
}
