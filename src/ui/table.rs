use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// The first rows of the filtered table, every column.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Restaurant Data");

    let preview = &state.pass.preview.table;
    let columns = preview.schema().columns();
    if columns.is_empty() {
        ui.label("No rows to show.");
        return;
    }

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0).resizable(true), columns.len())
                .header(20.0, |mut header| {
                    for name in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for record in preview.rows() {
                        body.row(18.0, |mut row| {
                            for i in 0..columns.len() {
                                row.col(|ui: &mut Ui| {
                                    ui.label(record.text(i));
                                });
                            }
                        });
                    }
                });
        });
}
