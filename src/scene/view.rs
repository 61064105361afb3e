use crate::types::{ColorChannel, TrailId};

/// The three mutually exclusive coloring checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorToggles {
    pub height: bool,
    pub distance: bool,
    pub reflection: bool,
}

impl ColorToggles {
    /// Checks `channel` and clears the others; `Uniform` clears all three
    pub fn select(&mut self, channel: ColorChannel) {
        *self = ColorToggles::default();
        match channel {
            ColorChannel::Height => self.height = true,
            ColorChannel::Distance => self.distance = true,
            ColorChannel::Reflection => self.reflection = true,
            ColorChannel::Uniform => {}
        }
    }

    /// Checkbox semantics: checking one unchecks the rest, unchecking the
    /// active one falls back to uniform
    pub fn set(&mut self, channel: ColorChannel, checked: bool) {
        if checked {
            self.select(channel);
        } else if resolve_channel(*self) == channel {
            self.select(ColorChannel::Uniform);
        }
    }

    pub fn is_checked(&self, channel: ColorChannel) -> bool {
        match channel {
            ColorChannel::Height => self.height,
            ColorChannel::Distance => self.distance,
            ColorChannel::Reflection => self.reflection,
            ColorChannel::Uniform => false,
        }
    }
}

/// Height wins over distance, distance over reflection, otherwise uniform
pub fn resolve_channel(toggles: ColorToggles) -> ColorChannel {
    if toggles.height {
        ColorChannel::Height
    } else if toggles.distance {
        ColorChannel::Distance
    } else if toggles.reflection {
        ColorChannel::Reflection
    } else {
        ColorChannel::Uniform
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailToggle {
    pub id: TrailId,
    pub visible: bool,
}

/// User-facing control state
///
/// Holds one toggle per known trail id, in the order trails first appear
/// in the sequence. Only controls mutate it; the reconciler reads it
/// through [`ViewState::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub frame: usize,
    pub coloring: ColorToggles,
    pub labels_visible: bool,
    pub trails: Vec<TrailToggle>,
    pub all_trails_visible: bool,
    pub playing: bool,
}

impl ViewState {
    /// Defaults: frame 0, uniform coloring, labels and trails hidden
    pub fn new(trail_ids: &[TrailId]) -> Self {
        Self {
            trails: trail_ids
                .iter()
                .map(|id| TrailToggle {
                    id: id.clone(),
                    visible: false,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn channel(&self) -> ColorChannel {
        resolve_channel(self.coloring)
    }

    /// Returns false if `id` is not a known trail
    pub fn set_trail_visible(&mut self, id: &TrailId, visible: bool) -> bool {
        match self.trails.iter_mut().find(|t| &t.id == id) {
            Some(toggle) => {
                toggle.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn trail_visible(&self, index: usize) -> bool {
        self.trails.get(index).map(|t| t.visible).unwrap_or(false)
    }

    pub fn step_frame(&mut self, frame_count: usize, forward: bool) {
        if frame_count == 0 {
            return;
        }
        self.frame = if forward {
            (self.frame + 1) % frame_count
        } else {
            (self.frame + frame_count - 1) % frame_count
        };
    }

    /// Pulls an out-of-range frame back to the last one. Returns true
    /// when the frame had to move.
    pub fn clamp_frame(&mut self, frame_count: usize) -> bool {
        let max_frame = frame_count.saturating_sub(1);
        if self.frame <= max_frame {
            return false;
        }
        log::warn!(
            "Frame {} out of range, clamping to {}",
            self.frame,
            max_frame
        );
        self.frame = max_frame;
        true
    }

    /// Reads every field once; the reconciler branches only on the result
    pub fn snapshot(&self, frame_count: usize) -> ViewSnapshot {
        let max_frame = frame_count.saturating_sub(1);
        let frame = if self.frame > max_frame {
            log::debug!("Frame {} out of range, reading {}", self.frame, max_frame);
            max_frame
        } else {
            self.frame
        };

        ViewSnapshot {
            frame,
            channel: self.channel(),
            labels_visible: self.labels_visible,
            all_trails: self.all_trails_visible,
            trail_mask: self.trails.iter().map(|t| t.visible).collect(),
        }
    }
}

/// Immutable copy of [`ViewState`] taken at the start of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub frame: usize,
    pub channel: ColorChannel,
    pub labels_visible: bool,
    pub all_trails: bool,
    /// Indexed like the library's trail ids
    pub trail_mask: Vec<bool>,
}

impl ViewSnapshot {
    pub fn trail_wanted(&self, trail: usize) -> bool {
        self.all_trails || self.trail_mask.get(trail).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<TrailId> {
        names.iter().map(|n| TrailId::from(*n)).collect()
    }

    #[test]
    fn resolver_priority() {
        let all = ColorToggles {
            height: true,
            distance: true,
            reflection: true,
        };
        assert_eq!(resolve_channel(all), ColorChannel::Height);

        let no_height = ColorToggles { height: false, ..all };
        assert_eq!(resolve_channel(no_height), ColorChannel::Distance);

        let only_reflection = ColorToggles {
            reflection: true,
            ..ColorToggles::default()
        };
        assert_eq!(resolve_channel(only_reflection), ColorChannel::Reflection);
        assert_eq!(resolve_channel(ColorToggles::default()), ColorChannel::Uniform);
    }

    #[test]
    fn checking_one_clears_the_others() {
        let mut toggles = ColorToggles::default();
        toggles.set(ColorChannel::Height, true);
        toggles.set(ColorChannel::Reflection, true);
        assert!(!toggles.height);
        assert!(toggles.reflection);
        assert_eq!(resolve_channel(toggles), ColorChannel::Reflection);
    }

    #[test]
    fn unchecking_active_falls_back_to_uniform() {
        let mut toggles = ColorToggles::default();
        toggles.set(ColorChannel::Distance, true);
        toggles.set(ColorChannel::Height, false);
        assert_eq!(resolve_channel(toggles), ColorChannel::Distance);

        toggles.set(ColorChannel::Distance, false);
        assert_eq!(resolve_channel(toggles), ColorChannel::Uniform);
    }

    #[test]
    fn defaults() {
        let view = ViewState::new(&ids(&["4", "9"]));
        assert_eq!(view.frame, 0);
        assert_eq!(view.channel(), ColorChannel::Uniform);
        assert!(!view.labels_visible);
        assert!(!view.all_trails_visible);
        assert!(!view.playing);
        assert_eq!(view.trails.len(), 2);
        assert!(view.trails.iter().all(|t| !t.visible));
    }

    #[test]
    fn trail_toggle_by_id() {
        let mut view = ViewState::new(&ids(&["4", "9"]));
        assert!(view.set_trail_visible(&TrailId::from("9"), true));
        assert!(!view.set_trail_visible(&TrailId::from("missing"), true));
        assert!(!view.trail_visible(0));
        assert!(view.trail_visible(1));
        assert!(!view.trail_visible(7));
    }

    #[test]
    fn snapshot_clamps_frame() {
        let mut view = ViewState::new(&[]);
        view.frame = 42;
        assert_eq!(view.snapshot(30).frame, 29);
        assert_eq!(view.snapshot(0).frame, 0);
    }

    #[test]
    fn snapshot_trail_wanted() {
        let mut view = ViewState::new(&ids(&["a", "b"]));
        view.trails[1].visible = true;
        let snapshot = view.snapshot(1);
        assert!(!snapshot.trail_wanted(0));
        assert!(snapshot.trail_wanted(1));
        assert!(!snapshot.trail_wanted(5));

        view.all_trails_visible = true;
        assert!(view.snapshot(1).trail_wanted(5));
    }

    #[test]
    fn step_frame_wraps() {
        let mut view = ViewState::new(&[]);
        view.step_frame(3, false);
        assert_eq!(view.frame, 2);
        view.step_frame(3, true);
        assert_eq!(view.frame, 0);
        view.step_frame(0, true);
        assert_eq!(view.frame, 0);
    }

    #[test]
    fn clamp_frame_moves_once() {
        let mut view = ViewState::new(&[]);
        view.frame = 12;
        assert!(view.clamp_frame(8));
        assert_eq!(view.frame, 7);
        assert!(!view.clamp_frame(8));
        assert_eq!(view.snapshot(8).frame, 7);
    }
}
