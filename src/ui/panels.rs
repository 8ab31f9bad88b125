use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::chart::ChartKind;
use crate::data::filter::Strictness;
use crate::state::{FilterMode, SessionState};

// ---------------------------------------------------------------------------
// Controls – shared between the side panel and the inline layout
// ---------------------------------------------------------------------------

/// Render the date/filter/chart controls.  Used for both layout variants.
pub fn controls(ui: &mut Ui, state: &mut SessionState) {
    let Some(table) = &state.table else {
        ui.label("No file loaded.");
        return;
    };
    let columns = table.column_names();
    let candidates = state.date_candidates.clone();

    // Vertical shrink keeps the inline layout from swallowing the chart area.
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            // ---- Date column ----
            ui.strong("Date/Time column");
            if candidates.is_empty() {
                ui.label("No date/time column found.");
            } else {
                let current = state.date_column.clone().unwrap_or_default();
                egui::ComboBox::from_id_salt("date_column")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in &candidates {
                            if ui.selectable_label(current == *col, col).clicked() {
                                state.select_date_column(col.clone());
                            }
                        }
                    });

                let mut strict = state.strictness == Strictness::Strict;
                if ui.checkbox(&mut strict, "Strict date parsing").changed() {
                    state.strictness = if strict {
                        Strictness::Strict
                    } else {
                        Strictness::Lenient
                    };
                    // Re-coerce under the new policy.
                    if let Some(col) = state.date_column.clone() {
                        state.select_date_column(col);
                    }
                }
            }
            ui.separator();

            // ---- Filter mode ----
            if state.date_column.is_some() {
                ui.strong("Filter by");
                egui::ComboBox::from_id_salt("filter_mode")
                    .selected_text(state.filter_mode.label())
                    .show_ui(ui, |ui: &mut Ui| {
                        for mode in FilterMode::ALL {
                            if ui
                                .selectable_label(state.filter_mode == mode, mode.label())
                                .clicked()
                            {
                                state.filter_mode = mode;
                                state.refilter();
                            }
                        }
                    });

                let picker_label = match state.filter_mode {
                    FilterMode::All => None,
                    FilterMode::Day => Some("Select day"),
                    FilterMode::Week => Some("Week starting"),
                    FilterMode::Month => Some("Month starting"),
                };
                if let Some(label) = picker_label {
                    ui.label(label);
                    if ui
                        .add(DatePickerButton::new(&mut state.picked_date).id_salt("filter_date"))
                        .changed()
                    {
                        state.refilter();
                    }
                }
                ui.separator();
            }

            // ---- Chart ----
            ui.strong("Chart");
            egui::ComboBox::from_id_salt("chart_kind")
                .selected_text(state.chart_kind.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for kind in ChartKind::available(state.config.extended_charts) {
                        if ui
                            .selectable_label(state.chart_kind == *kind, kind.label())
                            .clicked()
                        {
                            state.chart_kind = *kind;
                        }
                    }
                });

            axis_combo(ui, "x_axis", "X axis", &columns, &mut state.x_column);
            axis_combo(ui, "y_axis", "Y axis", &columns, &mut state.y_column);
        });
}

fn axis_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    selection: &mut Option<String>,
) {
    ui.label(label);
    let current = selection.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    *selection = Some(col.clone());
                }
            }
        });
}

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut SessionState) {
    ui.heading("Data & filters");
    ui.separator();
    controls(ui, state);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut SessionState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows × {} columns, {} visible",
                table.n_rows(),
                table.n_cols(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut SessionState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tabular data")
        .add_filter("Supported files", &["csv", "xls", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load a file into the session, surfacing any failure in the status line.
pub fn load_into(state: &mut SessionState, path: &Path) {
    let loaded = crate::data::loader::load_file(path)
        .with_context(|| format!("loading {}", path.display()));
    match loaded {
        Ok(table) => {
            log::info!(
                "Loaded {} rows with columns {:?}",
                table.n_rows(),
                table.column_names()
            );
            state.set_table(table);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
