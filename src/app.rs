use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::{AppState, Tab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RestaurantInsightsApp {
    pub state: AppState,
}

impl RestaurantInsightsApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RestaurantInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Picks up edits to the CSV between interactions.
        self.state.sync_with_disk();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, charts, preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::header(ui, &self.state);

                    if self.state.table.is_empty() {
                        ui.add_space(8.0);
                        ui.label("Please place TripAdvisor restaurant data CSV file in the data folder");
                        return;
                    }

                    ui.separator();
                    ui.horizontal(|ui: &mut Ui| {
                        let tab = &mut self.state.active_tab;
                        ui.selectable_value(&mut *tab, Tab::CityAnalysis, "📊 City Analysis");
                        ui.selectable_value(&mut *tab, Tab::PriceRelationship, "📈 Price Relationship");
                        ui.selectable_value(tab, Tab::CuisineDistribution, "🥧 Cuisine Distribution");
                    });
                    ui.separator();

                    match self.state.active_tab {
                        Tab::CityAnalysis => charts::city_ratings_chart(ui, &self.state),
                        Tab::PriceRelationship => charts::price_rating_chart(ui, &self.state),
                        Tab::CuisineDistribution => charts::cuisine_pie(ui, &self.state),
                    }

                    ui.add_space(12.0);
                    table::preview_table(ui, &self.state);
                });
        });
    }
}
