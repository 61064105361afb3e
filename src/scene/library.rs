use std::collections::BTreeMap;

use crate::error::BuildReport;
use crate::geometry::{
    ColoredPointSet, FrameBuilder, FramePointSets, LabelBox, LabelBuilder, TrailBuilder,
    TrailPointSet,
};
use crate::loaders::{Dataset, FrameData};
use crate::types::{ColorChannel, TrailId};

/// Everything prebuilt for one frame
#[derive(Debug)]
pub struct FrameRenderables {
    pub points: FramePointSets,
    pub labels: Vec<LabelBox>,
    /// Keyed by index into [`RenderableLibrary::trail_ids`]
    pub trails: BTreeMap<usize, TrailPointSet>,
}

/// All renderables of a sequence, built once at startup
#[derive(Debug)]
pub struct RenderableLibrary {
    frames: Vec<FrameRenderables>,
    trail_ids: Vec<TrailId>,
    report: BuildReport,
}

impl RenderableLibrary {
    pub fn build(dataset: Dataset, builder: &FrameBuilder) -> Self {
        let mut report = BuildReport::new();
        report.extend(dataset.errors);
        Self::build_frames(&dataset.frames, builder, report)
    }

    pub fn from_frames(frames: &[FrameData], builder: &FrameBuilder) -> Self {
        Self::build_frames(frames, builder, BuildReport::new())
    }

    fn build_frames(frames: &[FrameData], builder: &FrameBuilder, mut report: BuildReport) -> Self {
        let mut trail_ids: Vec<TrailId> = Vec::new();
        let mut trail_index: BTreeMap<TrailId, usize> = BTreeMap::new();
        let mut built = Vec::with_capacity(frames.len());

        for (frame, data) in frames.iter().enumerate() {
            let points = builder.build(frame, &data.points);
            report.extend(points.diagnostics);

            let (labels, label_errors) = LabelBuilder::build(frame, &data.labels);
            report.extend(label_errors);

            // Trail ids are numbered by first appearance across the sequence,
            // including ids that are listed but empty in that frame
            for (id, _) in &data.trails {
                if !trail_index.contains_key(id) {
                    trail_index.insert(id.clone(), trail_ids.len());
                    trail_ids.push(id.clone());
                }
            }
            let trails = TrailBuilder::build(&data.trails)
                .into_iter()
                .filter_map(|(id, set)| trail_index.get(&id).map(|&index| (index, set)))
                .collect();

            built.push(FrameRenderables {
                points: points.point_sets,
                labels,
                trails,
            });
        }

        log::info!(
            "Built {} frames: {} point sets, {} trail ids",
            built.len(),
            built.len() * ColorChannel::ALL.len(),
            trail_ids.len()
        );

        Self {
            frames: built,
            trail_ids,
            report,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, frame: usize) -> Option<&FrameRenderables> {
        self.frames.get(frame)
    }

    pub fn point_set(&self, frame: usize, channel: ColorChannel) -> Option<&ColoredPointSet> {
        self.frame(frame).map(|f| f.points.get(channel))
    }

    pub fn label_boxes(&self, frame: usize) -> &[LabelBox] {
        self.frame(frame).map(|f| f.labels.as_slice()).unwrap_or(&[])
    }

    /// Trail renderable for `trail` at `frame`, `None` if it was not
    /// tracked then
    pub fn trail(&self, frame: usize, trail: usize) -> Option<&TrailPointSet> {
        self.frame(frame).and_then(|f| f.trails.get(&trail))
    }

    /// Indices of the trails that have a renderable at `frame`
    pub fn trails_at(&self, frame: usize) -> impl Iterator<Item = usize> + '_ {
        self.frame(frame)
            .into_iter()
            .flat_map(|f| f.trails.keys().copied())
    }

    pub fn trail_ids(&self) -> &[TrailId] {
        &self.trail_ids
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}
