/// Drill-down Chart Panel
///
/// Dual-axis daily chart for the expanded period row, drawn with
/// egui::Painter in the same way as the dashboard sparklines:
/// - Count bars per visible series on the left axis
/// - Subscriber rate line on the right axis
/// - Day ticks along the x-axis, peak days marked in red
/// - Hover tooltip for the day under the pointer
/// - Clickable legend toggling each series

use super::theme;
use crate::matrix::chart::ChartModel;
use crate::matrix::{MatrixState, SeriesKey};
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use egui_extras::{Size, StripBuilder};

const LEGEND_HEIGHT: f32 = 28.0;
const CHART_HEIGHT: f32 = 280.0;
const LEFT_MARGIN: f32 = 56.0;
const RIGHT_MARGIN: f32 = 64.0;
const TOP_MARGIN: f32 = 22.0;
const BOTTOM_MARGIN: f32 = 30.0;
/// Minimum horizontal pixels per labelled day tick
const MIN_TICK_SPACING: f32 = 18.0;

/// Color of a series: the rate line is fixed, everything else cycles the
/// palette in legend order.
fn series_color(model: &ChartModel, key: &SeriesKey) -> Color32 {
    if key == &SeriesKey::SubscriberRate {
        return theme::RATE_LINE;
    }
    let index = model.legend.iter().position(|e| &e.key == key).unwrap_or(0);
    theme::series_color(index)
}

/// Render legend and chart for the expanded row. Draws nothing when the
/// row has no daily breakdown (its label is not a `Mon'YY` period).
pub fn render_chart_panel(ui: &mut egui::Ui, state: &mut MatrixState) {
    let model = match state.chart_model() {
        Some(model) => model,
        None => return,
    };

    egui::Frame::group(ui.style()).show(ui, |ui| {
        StripBuilder::new(ui)
            .size(Size::exact(LEGEND_HEIGHT))
            .size(Size::exact(CHART_HEIGHT))
            .vertical(|mut strip| {
                strip.cell(|ui| render_legend(ui, state, &model));
                strip.cell(|ui| render_chart(ui, state, &model));
            });
    });
}

fn render_legend(ui: &mut egui::Ui, state: &mut MatrixState, model: &ChartModel) {
    ui.horizontal_wrapped(|ui| {
        for entry in &model.legend {
            let color = series_color(model, &entry.key);
            let swatch = if entry.visible {
                color
            } else {
                color.gamma_multiply(0.3)
            };
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, swatch);

            if ui.selectable_label(entry.visible, &entry.label).clicked() {
                state.toggle_series(&entry.key);
            }
            ui.add_space(8.0);
        }
    });
}

fn render_chart(ui: &mut egui::Ui, state: &mut MatrixState, model: &ChartModel) {
    let (response, painter) = ui.allocate_painter(
        Vec2::new(ui.available_width(), CHART_HEIGHT),
        Sense::hover(),
    );
    let rect = response.rect;
    let plot = Rect::from_min_max(
        Pos2::new(rect.left() + LEFT_MARGIN, rect.top() + TOP_MARGIN),
        Pos2::new(rect.right() - RIGHT_MARGIN, rect.bottom() - BOTTOM_MARGIN),
    );

    painter.rect_filled(rect, 0.0, Color32::from_rgb(46, 52, 64));
    painter.text(
        Pos2::new(rect.left() + 8.0, rect.top() + 4.0),
        Align2::LEFT_TOP,
        &model.title,
        FontId::proportional(12.0),
        Color32::LIGHT_GRAY,
    );

    // Left axis: counts
    for tick in &model.count_axis.ticks {
        let y = plot.bottom() - model.count_axis.normalize(tick.value) as f32 * plot.height();
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            &tick.label,
            FontId::monospace(10.0),
            Color32::LIGHT_GRAY,
        );
    }

    // Right axis: rates, only while the rate line is shown
    if model.rate_line.is_some() {
        for tick in &model.rate_axis.ticks {
            let y = plot.bottom() - model.rate_axis.normalize(tick.value) as f32 * plot.height();
            painter.text(
                Pos2::new(plot.right() + 6.0, y),
                Align2::LEFT_CENTER,
                &tick.label,
                FontId::monospace(10.0),
                theme::RATE_LINE,
            );
        }
    }

    let days = model.day_ticks.len().max(1);
    let slot_width = plot.width() / days as f32;
    let group_width = slot_width * 0.8;
    let bar_width = group_width / model.bars.len().max(1) as f32;

    // Bars
    for (bar_index, bar) in model.bars.iter().enumerate() {
        let color = series_color(model, &bar.key);
        for (day_index, value) in bar.values.iter().enumerate() {
            if *value == 0 {
                continue;
            }
            let height = model.count_axis.normalize(*value as f64) as f32 * plot.height();
            let x = plot.left() + day_index as f32 * slot_width + slot_width * 0.1
                + bar_index as f32 * bar_width;
            let bar_rect = Rect::from_min_max(
                Pos2::new(x, plot.bottom() - height),
                Pos2::new(x + bar_width.max(1.0), plot.bottom()),
            );
            painter.rect_filled(bar_rect, 1.0, color);
        }
    }

    // Rate line
    if let Some(rates) = &model.rate_line {
        let points: Vec<Pos2> = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| {
                Pos2::new(
                    plot.left() + (i as f32 + 0.5) * slot_width,
                    plot.bottom() - model.rate_axis.normalize(*rate) as f32 * plot.height(),
                )
            })
            .collect();
        painter.add(Shape::line(points, Stroke::new(2.0, theme::RATE_LINE)));
    }

    // Day ticks; peak days are always labelled
    let label_every = (MIN_TICK_SPACING / slot_width).ceil().max(1.0) as usize;
    for (i, tick) in model.day_ticks.iter().enumerate() {
        if !tick.peak && i % label_every != 0 {
            continue;
        }
        let x = plot.left() + (i as f32 + 0.5) * slot_width;
        let color = if tick.peak {
            theme::PEAK_MARKER
        } else {
            Color32::LIGHT_GRAY
        };
        painter.text(
            Pos2::new(x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            &tick.label,
            FontId::monospace(10.0),
            color,
        );
        if tick.peak {
            painter.text(
                Pos2::new(x, plot.bottom() + 16.0),
                Align2::CENTER_TOP,
                "▲",
                FontId::proportional(8.0),
                theme::PEAK_MARKER,
            );
        }
    }

    painter.rect_stroke(plot, 0.0, Stroke::new(1.0, Color32::from_gray(90)));

    // Hover: highlight the day column and show its tooltip
    let hovered_day = response
        .hover_pos()
        .filter(|pos| plot.contains(*pos))
        .and_then(|pos| {
            let index = ((pos.x - plot.left()) / slot_width) as usize;
            model.day_ticks.get(index).map(|t| (index, t.day))
        });

    if let Some((index, day)) = hovered_day {
        let column = Rect::from_min_max(
            Pos2::new(plot.left() + index as f32 * slot_width, plot.top()),
            Pos2::new(plot.left() + (index + 1) as f32 * slot_width, plot.bottom()),
        );
        painter.rect_filled(column, 0.0, Color32::from_white_alpha(12));

        let lines = state.tooltip(day);
        response.on_hover_ui_at_pointer(|ui| {
            for (i, line) in lines.iter().enumerate() {
                if i == 0 {
                    ui.strong(&line.label);
                } else {
                    ui.horizontal(|ui| {
                        ui.label(&line.label);
                        ui.label(egui::RichText::new(&line.value).monospace());
                    });
                }
            }
        });
    }
}
