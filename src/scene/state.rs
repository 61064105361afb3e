use std::collections::BTreeSet;
use std::sync::Arc;

use super::graph::{RenderableId, Scene, SceneOp};
use super::library::RenderableLibrary;
use super::view::{ViewSnapshot, ViewState};
use crate::types::ColorChannel;

/// The part of a snapshot the point and label layers diff against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedState {
    pub frame: usize,
    pub channel: ColorChannel,
    pub labels_visible: bool,
}

impl From<&ViewSnapshot> for AppliedState {
    fn from(snapshot: &ViewSnapshot) -> Self {
        Self {
            frame: snapshot.frame,
            channel: snapshot.channel,
            labels_visible: snapshot.labels_visible,
        }
    }
}

/// Scene mutations made by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub added: usize,
    pub removed: usize,
}

impl TickReport {
    fn from_ops(ops: &[SceneOp]) -> Self {
        ops.iter().fold(Self::default(), |mut report, op| {
            match op {
                SceneOp::Add(_) => report.added += 1,
                SceneOp::Remove(_) => report.removed += 1,
            }
            report
        })
    }

    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Every renderable that should be in the scene for `view`
pub fn desired(library: &RenderableLibrary, view: &ViewState) -> BTreeSet<RenderableId> {
    desired_for(library, &view.snapshot(library.frame_count()))
}

fn desired_for(library: &RenderableLibrary, snapshot: &ViewSnapshot) -> BTreeSet<RenderableId> {
    let frame = snapshot.frame;
    let mut ids = BTreeSet::new();
    if library.frame(frame).is_none() {
        return ids;
    }

    ids.insert(RenderableId::Points {
        frame,
        channel: snapshot.channel,
    });
    if snapshot.labels_visible {
        ids.extend(label_ids(library, frame));
    }
    ids.extend(wanted_trails(library, snapshot));
    ids
}

fn label_ids(library: &RenderableLibrary, frame: usize) -> impl Iterator<Item = RenderableId> {
    (0..library.label_boxes(frame).len()).map(move |index| RenderableId::LabelBox { frame, index })
}

fn wanted_trails(library: &RenderableLibrary, snapshot: &ViewSnapshot) -> BTreeSet<RenderableId> {
    let frame = snapshot.frame;
    library
        .trails_at(frame)
        .filter(|&trail| snapshot.trail_wanted(trail))
        .map(|trail| RenderableId::Trail { frame, trail })
        .collect()
}

/// Keeps a [`Scene`] equal to `desired(view)` with minimal mutations
///
/// Only the previously applied state is remembered. A tick with an
/// unchanged view makes no scene mutations.
#[derive(Debug)]
pub struct SceneState {
    library: Arc<RenderableLibrary>,
    prev: Option<AppliedState>,
}

impl SceneState {
    pub fn new(library: Arc<RenderableLibrary>) -> Self {
        Self {
            library,
            prev: None,
        }
    }

    pub fn library(&self) -> &RenderableLibrary {
        &self.library
    }

    pub fn applied(&self) -> Option<AppliedState> {
        self.prev
    }

    pub fn tick(&mut self, view: &ViewState, scene: &mut Scene) -> TickReport {
        scene.begin_tick();
        let snapshot = view.snapshot(self.library.frame_count());
        let next = AppliedState::from(&snapshot);

        self.apply_points(next, scene);
        self.apply_labels(next, scene);
        self.apply_trails(&snapshot, scene);
        self.prev = Some(next);

        let report = TickReport::from_ops(scene.tick_ops());
        if !report.is_noop() {
            log::debug!(
                "Tick frame={} channel={}: +{} -{} ({} in scene)",
                next.frame,
                next.channel,
                report.added,
                report.removed,
                scene.len()
            );
        }
        report
    }

    /// Swaps the point set in one step so a frame is never drawn without
    /// points
    fn apply_points(&self, next: AppliedState, scene: &mut Scene) {
        if let Some(prev) = self.prev {
            if prev.frame == next.frame && prev.channel == next.channel {
                return;
            }
            scene.remove(RenderableId::Points {
                frame: prev.frame,
                channel: prev.channel,
            });
        }
        if self.library.frame(next.frame).is_some() {
            scene.add(RenderableId::Points {
                frame: next.frame,
                channel: next.channel,
            });
        }
    }

    fn apply_labels(&self, next: AppliedState, scene: &mut Scene) {
        if let Some(prev) = self.prev {
            if prev.frame == next.frame && prev.labels_visible == next.labels_visible {
                return;
            }
            if prev.labels_visible {
                for id in label_ids(&self.library, prev.frame) {
                    scene.remove(id);
                }
            }
        }
        if next.labels_visible {
            for id in label_ids(&self.library, next.frame) {
                scene.add(id);
            }
        }
    }

    /// Removes before adding, which also clears every trail of the
    /// previous frame
    fn apply_trails(&self, snapshot: &ViewSnapshot, scene: &mut Scene) {
        let wanted = wanted_trails(&self.library, snapshot);
        let stale: Vec<RenderableId> = scene
            .members()
            .iter()
            .filter(|id| matches!(id, RenderableId::Trail { .. }) && !wanted.contains(id))
            .copied()
            .collect();

        for id in stale {
            scene.remove(id);
        }
        for id in wanted {
            scene.add(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FrameBuilder;
    use crate::loaders::FrameData;
    use crate::types::{Label, Point, TrailId, TrailPosition};

    fn library() -> Arc<RenderableLibrary> {
        let label = |id: &str| Label {
            id: id.to_string(),
            center_x: 1.0,
            center_y: 2.0,
            based_z: 0.0,
            size_x: 1.0,
            size_y: 1.0,
            size_z: 1.0,
            yaw_angle: 0.0,
            object_class: "CAR".to_string(),
        };
        let position = TrailPosition { x: 0.0, y: 0.0, z: 0.0 };
        let frames = vec![
            FrameData {
                points: vec![Point::new(0.0, 0.0, 0.0, 0.1), Point::new(0.0, 0.0, 1.0, 0.3)],
                labels: vec![label("1"), label("2")],
                trails: vec![(TrailId::from("1"), vec![position])],
            },
            FrameData {
                points: vec![Point::new(1.0, 0.0, 0.0, 0.1)],
                labels: vec![label("1")],
                trails: vec![
                    (TrailId::from("1"), vec![position; 2]),
                    (TrailId::from("2"), vec![position]),
                ],
            },
        ];
        Arc::new(RenderableLibrary::from_frames(&frames, &FrameBuilder::default()))
    }

    fn tick(state: &mut SceneState, view: &ViewState, scene: &mut Scene) -> TickReport {
        let report = state.tick(view, scene);
        assert_eq!(scene.members(), &desired(state.library(), view));
        report
    }

    #[test]
    fn first_tick_adds_uniform_points_only() {
        let library = library();
        let mut state = SceneState::new(library.clone());
        let mut scene = Scene::new();
        let view = ViewState::new(library.trail_ids());

        let report = tick(&mut state, &view, &mut scene);
        assert_eq!(report, TickReport { added: 1, removed: 0 });
        assert!(scene.contains(&RenderableId::Points {
            frame: 0,
            channel: ColorChannel::Uniform
        }));
    }

    #[test]
    fn unchanged_view_is_a_noop() {
        let library = library();
        let mut state = SceneState::new(library.clone());
        let mut scene = Scene::new();
        let mut view = ViewState::new(library.trail_ids());
        view.labels_visible = true;
        view.all_trails_visible = true;

        tick(&mut state, &view, &mut scene);
        let report = tick(&mut state, &view, &mut scene);
        assert!(report.is_noop());
        assert!(scene.tick_ops().is_empty());
    }

    #[test]
    fn channel_change_swaps_points_in_one_tick() {
        let library = library();
        let mut state = SceneState::new(library.clone());
        let mut scene = Scene::new();
        let mut view = ViewState::new(library.trail_ids());
        tick(&mut state, &view, &mut scene);

        view.coloring.select(ColorChannel::Height);
        let report = tick(&mut state, &view, &mut scene);
        assert_eq!(report, TickReport { added: 1, removed: 1 });
        assert_eq!(scene.point_sets().collect::<Vec<_>>(), vec![(0, ColorChannel::Height)]);
    }

    #[test]
    fn frame_change_moves_labels_and_trails() {
        let library = library();
        let mut state = SceneState::new(library.clone());
        let mut scene = Scene::new();
        let mut view = ViewState::new(library.trail_ids());
        view.labels_visible = true;
        view.all_trails_visible = true;
        tick(&mut state, &view, &mut scene);
        assert_eq!(scene.label_boxes().count(), 2);
        assert_eq!(scene.trails().collect::<Vec<_>>(), vec![(0, 0)]);

        view.frame = 1;
        tick(&mut state, &view, &mut scene);
        assert_eq!(scene.label_boxes().collect::<Vec<_>>(), vec![(1, 0)]);
        assert_eq!(scene.trails().collect::<Vec<_>>(), vec![(1, 0), (1, 1)]);
    }

    #[test]
    fn single_trail_toggle() {
        let library = library();
        let mut state = SceneState::new(library.clone());
        let mut scene = Scene::new();
        let mut view = ViewState::new(library.trail_ids());
        view.frame = 1;
        tick(&mut state, &view, &mut scene);

        view.set_trail_visible(&TrailId::from("2"), true);
        let report = tick(&mut state, &view, &mut scene);
        assert_eq!(report, TickReport { added: 1, removed: 0 });
        assert_eq!(scene.trails().collect::<Vec<_>>(), vec![(1, 1)]);

        view.set_trail_visible(&TrailId::from("2"), false);
        let report = tick(&mut state, &view, &mut scene);
        assert_eq!(report, TickReport { added: 0, removed: 1 });
        assert_eq!(scene.trails().count(), 0);
    }

    #[test]
    fn empty_library_stays_empty() {
        let library = Arc::new(RenderableLibrary::from_frames(&[], &FrameBuilder::default()));
        let mut state = SceneState::new(library);
        let mut scene = Scene::new();
        let view = ViewState::default();

        assert!(tick(&mut state, &view, &mut scene).is_noop());
        assert!(scene.is_empty());
    }
}
