use crate::session::ViewerSession;
use crate::types::ColorChannel;

const HEADING_COLOR: egui::Color32 = egui::Color32::from_rgb(74, 158, 255);

/// Egui control surface: the only place user input mutates the view state
#[derive(Debug)]
pub struct ControlPanel {
    trail_filter: String,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            trail_filter: String::new(),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, session: &mut ViewerSession) {
        if session.mark_initialized() {
            log::info!(
                "Control panel ready: {} frames, {} trails",
                session.frame_count(),
                session.library().trail_ids().len()
            );
        }

        egui::Window::new("Controls")
            .resizable(false)
            .default_pos(egui::pos2(10.0, 10.0))
            .default_width(240.0)
            .show(ctx, |ui| {
                self.coloring(ui, session);
                ui.separator();
                self.frame_select(ui, session);
                ui.separator();
                heading(ui, "Labels");
                ui.checkbox(&mut session.view_mut().labels_visible, "Show labels");
                ui.separator();
                self.trails(ui, session);
                ui.separator();
                self.stats(ui, session);
            });
    }

    fn coloring(&self, ui: &mut egui::Ui, session: &mut ViewerSession) {
        heading(ui, "Coloring Options");
        let coloring = &mut session.view_mut().coloring;
        for (channel, text) in [
            (ColorChannel::Height, "Color by Height"),
            (ColorChannel::Distance, "Color by Distance"),
            (ColorChannel::Reflection, "Color by Reflection"),
        ] {
            let mut checked = coloring.is_checked(channel);
            if ui.checkbox(&mut checked, text).changed() {
                coloring.set(channel, checked);
            }
        }
    }

    fn frame_select(&self, ui: &mut egui::Ui, session: &mut ViewerSession) {
        heading(ui, "Select Frame");
        let last = session.frame_count().saturating_sub(1);
        ui.add(
            egui::Slider::new(&mut session.view_mut().frame, 0..=last)
                .step_by(1.0)
                .text("Frame"),
        );
        ui.horizontal(|ui| {
            if ui.button("Prev").clicked() {
                session.step_frame(false);
            }
            let play = if session.view().playing { "Pause" } else { "Play" };
            if ui.button(play).clicked() {
                session.toggle_playback();
            }
            if ui.button("Next").clicked() {
                session.step_frame(true);
            }
        });
    }

    fn trails(&mut self, ui: &mut egui::Ui, session: &mut ViewerSession) {
        heading(ui, "Trails");
        let view = session.view_mut();
        ui.checkbox(&mut view.all_trails_visible, "Show all trails");
        if view.trails.is_empty() {
            ui.label("No tracked objects");
            return;
        }

        ui.add(egui::TextEdit::singleline(&mut self.trail_filter).hint_text("Filter ids"));
        let all = view.all_trails_visible;
        egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
            ui.add_enabled_ui(!all, |ui| {
                for toggle in view
                    .trails
                    .iter_mut()
                    .filter(|t| t.id.as_str().contains(self.trail_filter.as_str()))
                {
                    ui.checkbox(&mut toggle.visible, format!("Trail {}", toggle.id));
                }
            });
        });
    }

    fn stats(&self, ui: &mut egui::Ui, session: &ViewerSession) {
        let view = session.view();
        let library = session.library();
        let points = library
            .point_set(view.frame, view.channel())
            .map(|set| set.len())
            .unwrap_or(0);

        ui.label(
            egui::RichText::new(format!("{} points", points))
                .size(14.0)
                .color(egui::Color32::GRAY),
        );
        ui.label(format!("{} labels", library.label_boxes(view.frame).len()));
        ui.label(format!("{} trails", library.trails_at(view.frame).count()));
        let diagnostics = library.report().len();
        if diagnostics > 0 {
            ui.label(
                egui::RichText::new(format!("{} build diagnostics", diagnostics))
                    .color(egui::Color32::from_rgb(255, 200, 100)),
            );
        }
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn heading(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong().color(HEADING_COLOR));
}
