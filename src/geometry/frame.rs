use std::sync::Arc;

use glam::Vec3;

use crate::config::ViewerConfig;
use crate::error::BuildError;
use crate::math::{find_range, sensor_to_scene, ValueRange, FALLBACK_COLOR};
use crate::types::{ColorChannel, Point, Rgb};

/// Color of every point in the uniform channel
pub const UNIFORM_COLOR: Rgb = [0.0, 1.0, 0.0];

/// One frame's points colored by one channel
///
/// All four channels of a frame hold the same `Arc` of positions; only the
/// color buffer differs.
#[derive(Debug, Clone)]
pub struct ColoredPointSet {
    channel: ColorChannel,
    positions: Arc<[Vec3]>,
    colors: Vec<Rgb>,
}

impl ColoredPointSet {
    pub fn channel(&self) -> ColorChannel {
        self.channel
    }

    /// Scene-space positions
    pub fn positions(&self) -> &Arc<[Vec3]> {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn shares_positions_with(&self, other: &ColoredPointSet) -> bool {
        Arc::ptr_eq(&self.positions, &other.positions)
    }
}

/// The four colorings of one frame
#[derive(Debug, Clone)]
pub struct FramePointSets {
    pub height: ColoredPointSet,
    pub distance: ColoredPointSet,
    pub reflection: ColoredPointSet,
    pub uniform: ColoredPointSet,
}

impl FramePointSets {
    pub fn get(&self, channel: ColorChannel) -> &ColoredPointSet {
        match channel {
            ColorChannel::Height => &self.height,
            ColorChannel::Distance => &self.distance,
            ColorChannel::Reflection => &self.reflection,
            ColorChannel::Uniform => &self.uniform,
        }
    }

    pub fn positions(&self) -> &Arc<[Vec3]> {
        self.uniform.positions()
    }

    pub fn len(&self) -> usize {
        self.uniform.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniform.is_empty()
    }
}

/// Output of [`FrameBuilder::build`]
#[derive(Debug)]
pub struct FrameBuild {
    pub point_sets: FramePointSets,
    /// Channels that fell back to [`FALLBACK_COLOR`]
    pub diagnostics: Vec<BuildError>,
}

/// Builds the colored point sets of a frame
///
/// Height uses the frame's own z range; distance and reflection use fixed
/// ranges so colors stay comparable from frame to frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder {
    distance_range: ValueRange,
    reflection_range: ValueRange,
}

impl FrameBuilder {
    pub fn new(distance_range: ValueRange, reflection_range: ValueRange) -> Self {
        Self {
            distance_range,
            reflection_range,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.distance_range(), config.reflection_range())
    }

    pub fn build(&self, frame: usize, points: &[Point]) -> FrameBuild {
        let positions: Arc<[Vec3]> = points
            .iter()
            .map(|p| sensor_to_scene(p.x, p.y, p.z))
            .collect();
        let mut diagnostics = Vec::new();

        let height_range = find_range(points.iter().map(|p| p.z));
        let height = colorize(
            frame,
            ColorChannel::Height,
            height_range,
            points.iter().map(|p| p.z),
            points.len(),
            &mut diagnostics,
        );
        let distance = colorize(
            frame,
            ColorChannel::Distance,
            self.distance_range,
            points.iter().map(Point::horizontal_distance),
            points.len(),
            &mut diagnostics,
        );
        let reflection = colorize(
            frame,
            ColorChannel::Reflection,
            self.reflection_range,
            points.iter().map(|p| p.intensity),
            points.len(),
            &mut diagnostics,
        );
        let uniform = vec![UNIFORM_COLOR; points.len()];

        let set = |channel, colors| ColoredPointSet {
            channel,
            positions: Arc::clone(&positions),
            colors,
        };

        FrameBuild {
            point_sets: FramePointSets {
                height: set(ColorChannel::Height, height),
                distance: set(ColorChannel::Distance, distance),
                reflection: set(ColorChannel::Reflection, reflection),
                uniform: set(ColorChannel::Uniform, uniform),
            },
            diagnostics,
        }
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

/// Color `scalars` against `range`, or fall back to a flat color and record
/// why when the range cannot be normalized against.
fn colorize(
    frame: usize,
    channel: ColorChannel,
    range: ValueRange,
    scalars: impl Iterator<Item = f32>,
    len: usize,
    diagnostics: &mut Vec<BuildError>,
) -> Vec<Rgb> {
    match range.to_scale() {
        Some(scale) => scalars.map(|v| scale.color(v)).collect(),
        None => {
            diagnostics.push(BuildError::DegenerateRange {
                frame,
                channel,
                min: range.min,
                max: range.max,
            });
            vec![FALLBACK_COLOR; len]
        }
    }
}
