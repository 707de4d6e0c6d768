use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::EntityFilter;
use crate::playback::{Phase, PlaybackError};
use crate::state::{AppState, ChartView};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – legends and current-year values
// ---------------------------------------------------------------------------

/// Render the left panel: one legend + value table per chart.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Airlines");
    ui.separator();

    if state.charts.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut errors = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for chart in &mut state.charts {
                egui::CollapsingHeader::new(RichText::new(chart.metric.to_string()).strong())
                    .id_salt(chart.metric)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if !chart.visible {
                            ui.weak("Chart hidden.");
                            return;
                        }
                        if let Err(e) = legend(ui, chart) {
                            errors.push((chart.metric, e));
                        }
                        ui.add_space(4.0);
                        value_table(ui, chart);
                    });
            }
        });

    for (metric, e) in errors {
        state.report(metric, e);
    }
}

/// Legend entries: hover previews an airline, click pins it.
fn legend(ui: &mut Ui, chart: &mut ChartView) -> Result<(), PlaybackError> {
    let Some(frame) = chart.animator.renderer().frame() else {
        return Ok(());
    };
    let entries = frame.legend.clone();

    let mut hovered: Option<String> = None;
    let mut clicked: Option<String> = None;

    for entry in &entries {
        let response = ui
            .horizontal(|ui: &mut Ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
                let swatch = if entry.active {
                    entry.color
                } else {
                    entry.color.gamma_multiply(0.3)
                };
                ui.painter().rect_filled(rect, 2.0, swatch);

                let mut text = RichText::new(&entry.entity);
                if !entry.active {
                    text = text.weak();
                }
                if matches!(&chart.legend.sticky, EntityFilter::Only(e) if *e == entry.entity) {
                    text = text.strong();
                }
                ui.add(egui::Label::new(text).sense(Sense::click()))
            })
            .inner;

        if response.hovered() {
            hovered = Some(entry.entity.clone());
        }
        if response.clicked() {
            clicked = Some(entry.entity.clone());
        }
    }

    chart.legend.hover(&mut chart.animator, hovered.as_deref())?;
    if let Some(entity) = clicked {
        chart.legend.click(&mut chart.animator, &entity)?;
    }
    Ok(())
}

/// Values of the visible airlines at the current year.
fn value_table(ui: &mut Ui, chart: &ChartView) {
    let Some(frame) = chart.animator.renderer().frame() else {
        return;
    };
    let rows: Vec<(String, Color32, Option<f64>)> = frame
        .current_markers()
        .map(|m| (m.entity.clone(), m.color, m.observed.then_some(m.point[1])))
        .collect();

    ui.push_id(("values", chart.metric), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Airline");
                });
                header.col(|ui| {
                    ui.strong(frame.year.to_string());
                });
            })
            .body(|mut body| {
                for (entity, color, value) in &rows {
                    body.row(16.0, |mut row| {
                        row.col(|ui| {
                            ui.colored_label(*color, entity.as_str());
                        });
                        row.col(|ui| {
                            match value {
                                Some(v) => ui.label(format!("{v:.2}")),
                                None => ui.weak("no data"),
                            };
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Central panel – the animated charts
// ---------------------------------------------------------------------------

pub fn chart_panel(ui: &mut Ui, state: &mut AppState) {
    if state.charts.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a review file to start playback  (File → Open…)");
        });
        return;
    }

    let visible = state.charts.iter().filter(|c| c.visible).count().max(1);
    let height = (ui.available_height() / visible as f32 - 36.0).max(120.0);

    let mut errors = Vec::new();
    for chart in &mut state.charts {
        if !chart.visible {
            plot::hidden_chart(ui, chart);
            continue;
        }
        let phase = match chart.animator.phase() {
            Phase::Running => "▶",
            Phase::Paused => "⏸",
            Phase::Idle => "■",
        };
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(chart.metric.to_string());
            ui.label(format!("{phase} {}", chart.animator.current_year()));
            ui.weak("(click the chart to pause / resume)");
        });
        if let Err(e) = plot::animated_chart(ui, chart, height) {
            errors.push((chart.metric, e));
        }
    }

    for (metric, e) in errors {
        state.report(metric, e);
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
        });

        ui.separator();

        if let Some(path) = &state.source {
            ui.label(format!(
                "{} reviews from {}",
                state.reviews.len(),
                path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
            ));
            ui.separator();
        }

        if ui.button("▶ Play").clicked() {
            state.play_all();
        }
        if ui.button("⏸ Pause").clicked() {
            state.pause_all();
        }

        ui.separator();

        let mut errors = Vec::new();
        for chart in &mut state.charts {
            let mut visible = chart.visible;
            if ui.checkbox(&mut visible, chart.metric.to_string()).changed() {
                if let Err(e) = chart.set_visible(visible) {
                    errors.push((chart.metric, e));
                }
            }
        }
        for (metric, e) in errors {
            state.report(metric, e);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open airline reviews")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
