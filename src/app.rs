use std::time::Instant;

use eframe::egui;

use crate::config::ViewerConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ReviewPlayerApp {
    pub state: AppState,
}

impl ReviewPlayerApp {
    /// Build the app and open the configured data file, if any.
    pub fn new(config: ViewerConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = AppState::new(config);
        if let Some(path) = data_path {
            state.load_path(&path);
        }
        Self { state }
    }
}

impl eframe::App for ReviewPlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Timers: deliver due ticks, then sleep until the next one ----
        if let Some(wait) = self.state.poll_timers(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: legends ----
        egui::SidePanel::left("legend_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: animated charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::chart_panel(ui, &mut self.state);
        });
    }
}
