use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use lidar_viewer::camera::OrbitCamera;
use lidar_viewer::cli::Cli;
use lidar_viewer::config::ViewerConfig;
use lidar_viewer::core::{Button, Clock, WinitController};
use lidar_viewer::loaders::{Dataset, LoadOptions};
use lidar_viewer::math::AABB;
use lidar_viewer::renderer::ViewerRenderer;
use lidar_viewer::session::ViewerSession;
use lidar_viewer::ui::ControlPanel;

struct App {
    session: ViewerSession,
    window: Option<Arc<Window>>,
    renderer: Option<ViewerRenderer>,
    camera: OrbitCamera,
    controller: WinitController,
    panel: ControlPanel,
    clock: Clock,
}

impl App {
    fn new(session: ViewerSession) -> Self {
        let mut app = Self {
            session,
            window: None,
            renderer: None,
            camera: OrbitCamera::new(),
            controller: WinitController::new(),
            panel: ControlPanel::new(),
            clock: Clock::new(),
        };
        app.focus_camera();
        app
    }

    fn focus_camera(&mut self) {
        let view = self.session.view();
        let bounds = self
            .session
            .library()
            .point_set(view.frame, view.channel())
            .and_then(|set| AABB::from_points(set.positions().iter()));
        if let Some(bounds) = bounds {
            self.camera.focus(&bounds);
        }
    }

    fn handle_input(&mut self) {
        for button in self.controller.just_pressed().to_vec() {
            match button {
                Button::ArrowLeft => self.session.step_frame(false),
                Button::ArrowRight => self.session.step_frame(true),
                Button::Space => self.session.toggle_playback(),
                Button::KeyF => self.focus_camera(),
                _ => {}
            }
        }
        self.camera.update(
            &self.controller,
            self.controller.mouse_delta(),
            self.controller.scroll_delta(),
        );
        self.controller.reset_deltas();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        self.handle_input();

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let session = &mut self.session;
        let panel = &mut self.panel;
        let ui = renderer.run_ui(window, |ctx| panel.show(ctx, session));
        session.tick(delta);

        match renderer.render(window, session.library(), session.scene(), &self.camera, ui) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let size = self.session.config().window;
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Lidar Viewer")
                .with_inner_size(winit::dpi::LogicalSize::new(size.width, size.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(ViewerRenderer::new(window.clone())) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        self.clock.reset();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::Resized(size) = event {
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(size.width, size.height);
            }
        }

        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                self.controller.process_consumed_event(&event);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.controller.process_event(&other),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Build, reconcile once and report without opening a window
fn run_headless(mut session: ViewerSession) -> Result<()> {
    let report = session.reconcile();
    let library = session.library();
    let points: usize = (0..library.frame_count())
        .filter_map(|frame| library.frame(frame))
        .map(|frame| frame.points.len())
        .sum();

    log::info!(
        "{} frames, {} points, {} trail ids, {} renderables in scene after first tick (+{})",
        library.frame_count(),
        points,
        library.trail_ids().len(),
        session.scene().len(),
        report.added
    );
    if !library.report().is_empty() {
        log::warn!("{} build diagnostics", library.report().len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ViewerConfig::resolve(&cli)?;
    let options = LoadOptions {
        derive_missing_trails: config.derive_trails,
    };

    let dataset = Dataset::load(cli.data_dir.clone(), config.frame_count, options);
    if dataset.is_empty() {
        bail!("No lidar points could be loaded from {:?}", cli.data_dir);
    }

    let session = ViewerSession::new(dataset, config);
    if cli.no_ui {
        return run_headless(session);
    }

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(session);

    log::info!(
        "Controls: left drag orbit, right drag pan, wheel zoom, arrows step frames, \
         Space play/pause, F refocus, Escape quit"
    );
    event_loop.run_app(&mut app)?;

    Ok(())
}
