use eframe::egui;

use crate::state::SessionState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DatelensApp {
    pub state: SessionState,
}

impl eframe::App for DatelensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Controls: side panel or inline, per config ----
        if self.state.config.sidebar_controls {
            egui::SidePanel::left("control_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
            egui::CentralPanel::default().show(ctx, |ui| {
                plot::chart_view(ui, &self.state);
                ui.separator();
                table::table_view(ui, &self.state);
            });
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::controls(ui, &mut self.state);
                ui.separator();
                plot::chart_view(ui, &self.state);
                ui.separator();
                table::table_view(ui, &self.state);
            });
        }
    }
}
