use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::core::timer::FixedHz;
use crate::geometry::FrameBuilder;
use crate::loaders::Dataset;
use crate::scene::{RenderableLibrary, Scene, SceneState, TickReport, ViewState};

/// Everything the viewer owns between event-loop iterations
///
/// Created once after loading; the control surface and renderer borrow
/// from it every frame.
#[derive(Debug)]
pub struct ViewerSession {
    config: ViewerConfig,
    library: Arc<RenderableLibrary>,
    view: ViewState,
    scene: Scene,
    state: SceneState,
    playback: FixedHz,
    initialized: bool,
}

impl ViewerSession {
    /// Builds every renderable of `dataset` up front
    pub fn new(dataset: Dataset, config: ViewerConfig) -> Self {
        let builder = FrameBuilder::from_config(&config);
        let library = RenderableLibrary::build(dataset, &builder);
        library.report().log();
        Self::from_library(Arc::new(library), config)
    }

    pub fn from_library(library: Arc<RenderableLibrary>, config: ViewerConfig) -> Self {
        Self {
            view: ViewState::new(library.trail_ids()),
            scene: Scene::new(),
            state: SceneState::new(library.clone()),
            playback: FixedHz::new(config.playback_hz),
            initialized: false,
            library,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn library(&self) -> &RenderableLibrary {
        &self.library
    }

    pub fn frame_count(&self) -> usize {
        self.library.frame_count()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns true only the first time, so one-off UI setup runs once
    pub fn mark_initialized(&mut self) -> bool {
        !std::mem::replace(&mut self.initialized, true)
    }

    pub fn step_frame(&mut self, forward: bool) {
        let frame_count = self.frame_count();
        self.view.step_frame(frame_count, forward);
    }

    pub fn toggle_playback(&mut self) {
        self.view.playing = !self.view.playing;
        self.playback.reset();
        log::info!("Playback {}", if self.view.playing { "started" } else { "paused" });
    }

    /// Moves the frame forward while playing; returns whether it moved
    pub fn advance(&mut self, delta: f32) -> bool {
        let frame_count = self.frame_count();
        if !self.view.playing || frame_count == 0 {
            self.playback.reset();
            return false;
        }

        let steps = self.playback.steps(delta, frame_count as u32);
        for _ in 0..steps {
            self.view.step_frame(frame_count, true);
        }
        steps > 0
    }

    /// Brings the scene in line with the current view state
    pub fn reconcile(&mut self) -> TickReport {
        self.view.clamp_frame(self.library.frame_count());
        self.state.tick(&self.view, &mut self.scene)
    }

    pub fn tick(&mut self, delta: f32) -> TickReport {
        self.advance(delta);
        self.reconcile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::FrameData;
    use crate::types::{ColorChannel, Point};

    fn session(frames: usize) -> ViewerSession {
        let frames = (0..frames)
            .map(|i| FrameData {
                points: vec![Point::new(i as f32, 0.0, 0.0, 0.1)],
                ..FrameData::default()
            })
            .collect();
        ViewerSession::new(Dataset::from_frames(frames), ViewerConfig::default())
    }

    #[test]
    fn initialized_once() {
        let mut session = session(1);
        assert!(!session.is_initialized());
        assert!(session.mark_initialized());
        assert!(!session.mark_initialized());
        assert!(session.is_initialized());
    }

    #[test]
    fn paused_session_does_not_advance() {
        let mut session = session(3);
        assert!(!session.advance(1.0));
        assert_eq!(session.view().frame, 0);
    }

    #[test]
    fn playback_wraps_at_last_frame() {
        let mut session = session(3);
        session.toggle_playback();

        // 10 Hz default
        assert!(session.advance(0.15));
        assert_eq!(session.view().frame, 1);
        assert!(session.advance(0.1));
        assert_eq!(session.view().frame, 2);
        assert!(session.advance(0.1));
        assert_eq!(session.view().frame, 0);
    }

    #[test]
    fn tick_reconciles_after_advancing() {
        let mut session = session(2);
        session.toggle_playback();
        session.tick(0.15);
        let points: Vec<_> = session.scene().point_sets().collect();
        assert_eq!(points, vec![(1, ColorChannel::Uniform)]);
    }

    #[test]
    fn step_frame_wraps_backwards() {
        let mut session = session(4);
        session.step_frame(false);
        assert_eq!(session.view().frame, 3);
    }

    #[test]
    fn reconcile_writes_clamped_frame_back() {
        let mut session = session(3);
        session.view_mut().frame = 9;
        session.reconcile();
        assert_eq!(session.view().frame, 2);
        assert!(session.reconcile().is_noop());
    }
}
