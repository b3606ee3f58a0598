use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::LoadStatus;
use crate::data::model::CITY;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – city filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Data Filters");
    ui.separator();

    if state.table.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    if !state.table.schema().contains(CITY) {
        ui.label("No 'City' column in data");
        return;
    }

    ui.strong("Select Cities:");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
        if ui.small_button("Defaults").clicked() {
            state.select_defaults();
        }
    });

    let n_selected = state.selection.len();
    let n_total = state.city_options.len();
    if n_selected == 0 {
        ui.weak(format!("No city selected, showing all {n_total}"));
    } else {
        ui.weak(format!("{n_selected}/{n_total} selected"));
    }
    ui.separator();

    // Collect toggles first; the loop borrows the options immutably.
    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for city in &state.city_options {
                let mut checked = state.selection.contains(city);
                let text = RichText::new(city.to_string()).color(state.color_map.color_for(city));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(city.clone());
                }
            }
        });

    if let Some(city) = toggled {
        state.toggle_city(&city);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.table.is_empty() {
            ui.label(format!(
                "{} restaurants loaded, {} visible",
                state.table.len(),
                state.pass.row_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Header – title and load status
// ---------------------------------------------------------------------------

/// Title, load status and dataset summary above the tabs.
pub fn header(ui: &mut Ui, state: &AppState) {
    ui.heading("🍽️ Restaurant Insights");
    ui.label(RichText::new("TripAdvisor European Restaurants Analysis").size(16.0));
    ui.add_space(4.0);

    match &state.load_status {
        Some(LoadStatus::Loaded { rows }) => {
            ui.colored_label(Color32::from_rgb(40, 160, 80), "Data loaded successfully!")
                .on_hover_text(format!("{rows} rows from {}", state.cache.path().display()));
        }
        Some(LoadStatus::Missing(e)) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
        None => {}
    }

    if state.table.is_empty() {
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Dataset contains");
        ui.label(RichText::new(state.table.len().to_string()).strong());
        ui.label("restaurants");
    });
    ui.label(format!("Data columns: {:?}", state.table.schema().columns()));
    for notice in &state.pass.notices {
        ui.weak(notice.to_string());
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(path);
    }
}
