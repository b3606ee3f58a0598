use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::color::generate_palette;
use crate::data::model::CellValue;
use crate::data::views::PriceAxis;
use crate::error::DashboardError;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 380.0;

fn missing_data(ui: &mut Ui, err: &DashboardError) {
    ui.label(RichText::new(err.to_string()).italics());
}

/// Axis formatter showing `labels[i]` at integer position `i`.
fn category_labels(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar chart – average rating per city
// ---------------------------------------------------------------------------

pub fn city_ratings_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Average Ratings by City");

    let view = match &state.pass.city_ratings {
        Ok(view) => view,
        Err(e) => return missing_data(ui, e),
    };

    let bars: Vec<Bar> = view
        .entries
        .iter()
        .enumerate()
        .map(|(i, (city, mean))| {
            Bar::new(i as f64, *mean)
                .name(city.to_string())
                .fill(state.color_map.color_for(city))
                .width(0.7)
        })
        .collect();
    let labels = view.entries.iter().map(|(city, _)| city.to_string()).collect();

    Plot::new("city_ratings")
        .height(PLOT_HEIGHT)
        .x_axis_label("City")
        .y_axis_label("Average Rating")
        .x_axis_formatter(category_labels(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("City Ratings Comparison"));
        });
}

// ---------------------------------------------------------------------------
// Scatter – price range against rating, coloured by city
// ---------------------------------------------------------------------------

pub fn price_rating_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Price vs Rating Relationship");

    let view = match &state.pass.price_rating {
        Ok(view) => view,
        Err(e) => return missing_data(ui, e),
    };

    let axis = view.price_axis();

    // One series per city, in first-appearance order.
    let mut series: Vec<(Option<CellValue>, Vec<[f64; 2]>)> = Vec::new();
    for point in &view.points {
        let (Some(x), Some(y)) = (axis.position(&point.price), point.rating) else {
            continue;
        };
        match series.iter_mut().find(|(city, _)| *city == point.city) {
            Some((_, pts)) => pts.push([x, y]),
            None => series.push((point.city.clone(), vec![[x, y]])),
        }
    }

    let mut plot = Plot::new("price_rating")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Price Range")
        .y_axis_label("Rating")
        .allow_boxed_zoom(true);
    if let PriceAxis::Categorical(categories) = axis {
        plot = plot.x_axis_formatter(category_labels(
            categories.iter().map(|c| c.to_string()).collect(),
        ));
    }

    plot.show(ui, |plot_ui| {
        for (city, pts) in series {
            let (name, color) = match &city {
                Some(city) => (city.to_string(), state.color_map.color_for(city)),
                None => ("Rating".to_string(), Color32::LIGHT_BLUE),
            };
            let points: PlotPoints = pts.into_iter().collect();
            plot_ui.points(Points::new(points).name(name).color(color).radius(3.0));
        }
    });
}

// ---------------------------------------------------------------------------
// Pie – most common cuisine styles
// ---------------------------------------------------------------------------

pub fn cuisine_pie(ui: &mut Ui, state: &AppState) {
    ui.heading("Cuisine Distribution");

    let view = match &state.pass.cuisines {
        Ok(view) => view,
        Err(e) => return missing_data(ui, e),
    };
    if view.entries.is_empty() {
        ui.label("No cuisine data for the selected cities");
        return;
    }

    ui.strong(format!("Top {} Cuisine Distribution", state.config.top_cuisines));

    let palette = generate_palette(view.entries.len());
    let total = view.total() as f32;

    ui.horizontal_top(|ui: &mut Ui| {
        let size = (ui.available_width() * 0.5).clamp(160.0, PLOT_HEIGHT);
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = size * 0.45;

        // Triangle fans keep every shape convex, including slices over 180°.
        let mut start = -FRAC_PI_2;
        let mut slices = Vec::with_capacity(view.entries.len());
        for ((_, count), color) in view.entries.iter().zip(&palette) {
            let sweep = *count as f32 / total * TAU;
            let steps = ((sweep / TAU) * 128.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![
                        center,
                        center + radius * Vec2::angled(a0),
                        center + radius * Vec2::angled(a1),
                    ],
                    *color,
                    Stroke::NONE,
                ));
            }
            slices.push((start, start + sweep));
            start += sweep;
        }

        let hovered = response.hover_pos().and_then(|pos| {
            let d = pos - center;
            if d.length() > radius {
                return None;
            }
            let mut angle = d.angle();
            if angle < -FRAC_PI_2 {
                angle += TAU;
            }
            slices.iter().position(|(a0, a1)| angle >= *a0 && angle < *a1)
        });

        ui.vertical(|ui: &mut Ui| {
            for (i, ((cuisine, count), color)) in view.entries.iter().zip(&palette).enumerate() {
                ui.horizontal(|ui: &mut Ui| {
                    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, *color);
                    let text = format!(
                        "{cuisine}  {count} ({:.1}%)",
                        *count as f32 / total * 100.0
                    );
                    let text = if hovered == Some(i) {
                        RichText::new(text).strong()
                    } else {
                        RichText::new(text)
                    };
                    ui.label(text);
                });
            }
        });

        if let Some(i) = hovered {
            let (cuisine, count) = &view.entries[i];
            response.on_hover_text(format!("{cuisine}: {count}"));
        }
    });
}
