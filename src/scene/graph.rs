use std::collections::BTreeSet;

use crate::types::ColorChannel;

/// Identity of a prebuilt renderable in the [`RenderableLibrary`](super::RenderableLibrary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderableId {
    Points { frame: usize, channel: ColorChannel },
    LabelBox { frame: usize, index: usize },
    Trail { frame: usize, trail: usize },
}

impl RenderableId {
    pub fn frame(&self) -> usize {
        match *self {
            RenderableId::Points { frame, .. }
            | RenderableId::LabelBox { frame, .. }
            | RenderableId::Trail { frame, .. } => frame,
        }
    }
}

/// A membership change applied to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Add(RenderableId),
    Remove(RenderableId),
}

/// The set of renderables currently drawn
///
/// Only the reconciler mutates it; the renderer reads it. Operations of the
/// most recent tick are kept for inspection.
#[derive(Debug, Default)]
pub struct Scene {
    members: BTreeSet<RenderableId>,
    tick_ops: Vec<SceneOp>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the per-tick operation log
    pub fn begin_tick(&mut self) {
        self.tick_ops.clear();
    }

    /// Returns false (and records nothing) if `id` was already present
    pub fn add(&mut self, id: RenderableId) -> bool {
        let inserted = self.members.insert(id);
        if inserted {
            self.tick_ops.push(SceneOp::Add(id));
        }
        inserted
    }

    /// Returns false (and records nothing) if `id` was not present
    pub fn remove(&mut self, id: RenderableId) -> bool {
        let removed = self.members.remove(&id);
        if removed {
            self.tick_ops.push(SceneOp::Remove(id));
        }
        removed
    }

    pub fn contains(&self, id: &RenderableId) -> bool {
        self.members.contains(id)
    }

    pub fn members(&self) -> &BTreeSet<RenderableId> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Operations applied since the last [`Scene::begin_tick`]
    pub fn tick_ops(&self) -> &[SceneOp] {
        &self.tick_ops
    }

    pub fn point_sets(&self) -> impl Iterator<Item = (usize, ColorChannel)> + '_ {
        self.members.iter().filter_map(|id| match *id {
            RenderableId::Points { frame, channel } => Some((frame, channel)),
            _ => None,
        })
    }

    pub fn label_boxes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members.iter().filter_map(|id| match *id {
            RenderableId::LabelBox { frame, index } => Some((frame, index)),
            _ => None,
        })
    }

    pub fn trails(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members.iter().filter_map(|id| match *id {
            RenderableId::Trail { frame, trail } => Some((frame, trail)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_add_is_rejected() {
        let mut scene = Scene::new();
        let id = RenderableId::Trail { frame: 0, trail: 3 };
        assert!(scene.add(id));
        assert!(!scene.add(id));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.tick_ops(), &[SceneOp::Add(id)]);
    }

    #[test]
    fn remove_of_absent_is_a_no_op() {
        let mut scene = Scene::new();
        assert!(!scene.remove(RenderableId::LabelBox { frame: 1, index: 0 }));
        assert!(scene.tick_ops().is_empty());
    }

    #[test]
    fn begin_tick_clears_ops_not_members() {
        let mut scene = Scene::new();
        scene.add(RenderableId::Points {
            frame: 0,
            channel: ColorChannel::Uniform,
        });
        scene.begin_tick();
        assert!(scene.tick_ops().is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn layers_are_filtered() {
        let mut scene = Scene::new();
        scene.add(RenderableId::Points {
            frame: 2,
            channel: ColorChannel::Height,
        });
        scene.add(RenderableId::LabelBox { frame: 2, index: 0 });
        scene.add(RenderableId::LabelBox { frame: 2, index: 1 });
        scene.add(RenderableId::Trail { frame: 2, trail: 5 });

        assert_eq!(scene.point_sets().collect::<Vec<_>>(), vec![(2, ColorChannel::Height)]);
        assert_eq!(scene.label_boxes().count(), 2);
        assert_eq!(scene.trails().collect::<Vec<_>>(), vec![(2, 5)]);
    }
}
