/// Comparison Matrix View
///
/// Draws the period x hotel grid: the subscriber column pinned first, one
/// page of competitor columns padded with placeholders, bracket-colored
/// cells, page controls and the drill-down panel under the expanded row.

use super::chart_view;
use super::theme;
use crate::matrix::format;
use crate::matrix::{MatrixState, Slot};
use crate::models::EntityId;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};

const PERIOD_COL_WIDTH: f32 = 96.0;
const ROW_HEIGHT: f32 = 28.0;
const HEADER_HEIGHT: f32 = 40.0;
const CELL_GAP: f32 = 2.0;

/// Owned copy of one header column, so the grid can be drawn while the
/// state stays free for mutation.
struct Column {
    id: Option<EntityId>,
    name: String,
    hint: String,
}

enum MatrixAction {
    PrevPage,
    NextPage,
    ToggleRow(String),
}

pub fn render_matrix(ui: &mut egui::Ui, state: &mut MatrixState) {
    let mut actions = Vec::new();

    render_page_controls(ui, state, &mut actions);
    ui.add_space(6.0);

    let columns: Vec<Column> = state
        .page_slots()
        .into_iter()
        .map(|slot| match slot {
            Slot::Entity(e) => Column {
                id: Some(e.id.clone()),
                name: e.name.clone(),
                hint: e.price_range.clone(),
            },
            Slot::Placeholder => Column {
                id: None,
                name: String::new(),
                hint: String::new(),
            },
        })
        .collect();

    let cell_width = ((ui.available_width() - PERIOD_COL_WIDTH) / (columns.len() + 1) as f32
        - CELL_GAP)
        .max(48.0);

    render_header(ui, state.subscriber().name.as_str(), &columns, cell_width);

    let rows = state.rows().to_vec();
    if rows.is_empty() {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("No rate changes recorded yet").color(Color32::LIGHT_GRAY));
    }

    for row in &rows {
        let expanded = state.is_expanded(&row.label);
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = CELL_GAP;

            let arrow = if expanded { "▼" } else { "▶" };
            let toggle = ui.add_sized(
                [PERIOD_COL_WIDTH, ROW_HEIGHT],
                egui::Button::new(format!("{} {}", arrow, row.label)).frame(false),
            );
            if toggle.clicked() {
                actions.push(MatrixAction::ToggleRow(row.label.clone()));
            }

            value_cell(ui, state, row.subscriber, cell_width);
            for column in &columns {
                match &column.id {
                    Some(id) => value_cell(ui, state, row.value_for(id), cell_width),
                    None => placeholder_cell(ui, cell_width),
                }
            }
        });

        if expanded {
            ui.add_space(4.0);
            chart_view::render_chart_panel(ui, state);
            ui.add_space(8.0);
        }
    }

    for action in actions {
        match action {
            MatrixAction::PrevPage => state.prev_page(),
            MatrixAction::NextPage => state.next_page(),
            MatrixAction::ToggleRow(label) => state.toggle_row(&label),
        }
    }
}

fn render_page_controls(ui: &mut egui::Ui, state: &MatrixState, actions: &mut Vec<MatrixAction>) {
    let pager = state.paginator();
    let range = pager.visible_range();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(pager.has_prev(), egui::Button::new("◀ Prev"))
            .clicked()
        {
            actions.push(MatrixAction::PrevPage);
        }
        let shown = if range.is_empty() {
            "No competitors selected".to_string()
        } else {
            format!(
                "Competitors {}-{} of {}",
                range.start + 1,
                range.end,
                pager.total()
            )
        };
        ui.label(
            egui::RichText::new(format!(
                "{}  |  page {} / {}",
                shown,
                pager.page() + 1,
                pager.total_pages()
            ))
            .monospace(),
        );
        if ui
            .add_enabled(pager.has_next(), egui::Button::new("Next ▶"))
            .clicked()
        {
            actions.push(MatrixAction::NextPage);
        }
    });
}

fn render_header(ui: &mut egui::Ui, subscriber: &str, columns: &[Column], cell_width: f32) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = CELL_GAP;
        header_cell(ui, "Period", PERIOD_COL_WIDTH, None, true);
        header_cell(ui, subscriber, cell_width, Some("Subscriber"), true);
        for column in columns {
            let hint = (!column.hint.is_empty()).then_some(column.hint.as_str());
            header_cell(ui, &column.name, cell_width, hint, column.id.is_some());
        }
    });
}

fn header_cell(ui: &mut egui::Ui, text: &str, width: f32, hint: Option<&str>, filled: bool) {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, HEADER_HEIGHT), Sense::hover());
    let bg = if filled { theme::HEADER_BG } else { theme::PLACEHOLDER_BG };
    ui.painter().rect_filled(rect, 2.0, bg);

    let galley = ui.painter().layout(
        text.to_string(),
        FontId::proportional(11.0),
        Color32::WHITE,
        width - 8.0,
    );
    let pos = Pos2::new(
        rect.center().x - galley.size().x / 2.0,
        rect.center().y - galley.size().y / 2.0,
    );
    ui.painter().galley(pos, galley, Color32::WHITE);

    if let Some(hint) = hint {
        response.on_hover_text(hint);
    }
}

fn value_cell(ui: &mut egui::Ui, state: &MatrixState, value: u64, width: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(width, ROW_HEIGHT), Sense::hover());
    let style = state.cell_style(value);
    ui.painter().rect_filled(rect, 2.0, theme::bracket_fill(style.bracket));
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        format::grouped(value),
        FontId::monospace(12.0),
        theme::text_color(style.text),
    );
}

fn placeholder_cell(ui: &mut egui::Ui, width: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(width, ROW_HEIGHT), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, theme::PLACEHOLDER_BG);
    ui.painter()
        .rect_stroke(rect, 2.0, Stroke::new(1.0, theme::GRID_LINE));
}
