/// Main App and eframe::App implementation
///
/// Hosts one comparison matrix. Every frame reports the viewport width to
/// the matrix state, then renders the top bar (competitor picker), transient
/// messages, the matrix itself and a status bar.

use super::matrix_view;
use super::theme;
use crate::config::{AppSettings, SettingsManager};
use crate::matrix::{Bracket, MatrixState};
use crate::models::EntityId;
use eframe::egui;
use std::path::PathBuf;

pub struct MatrixApp {
    state: MatrixState,
    settings: AppSettings,
    /// Where settings are persisted; `None` means the global settings file
    settings_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    error_message: Option<String>,
    info_message: Option<String>,
}

impl MatrixApp {
    pub fn new(state: MatrixState, settings: AppSettings) -> Self {
        MatrixApp {
            state,
            settings,
            settings_path: None,
            log_path: None,
            error_message: None,
            info_message: None,
        }
    }

    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn with_log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }

    /// Show an error banner until dismissed.
    pub fn with_error(mut self, message: String) -> Self {
        self.error_message = Some(message);
        self
    }

    /// Apply a new competitor selection and remember it for the next start.
    fn apply_selection(&mut self, ids: Vec<EntityId>) {
        self.state.set_selection(ids.clone());
        self.settings.initial_selection = ids;

        let saved = match &self.settings_path {
            Some(path) => SettingsManager::save_to(path, &self.settings),
            None => SettingsManager::save(&self.settings),
        };
        match saved {
            Ok(()) => {
                self.info_message = Some(format!(
                    "Showing {} competitor(s)",
                    self.state.selection().len()
                ));
            }
            Err(e) => {
                log::warn!("[App] failed to persist selection: {}", e);
                self.error_message = Some(format!("Could not save selection: {}", e));
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let mut requested: Option<Vec<EntityId>> = None;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Rate Parity");
                ui.separator();
                ui.label(format!("Subscriber: {}", self.state.subscriber().name));
                ui.separator();

                ui.menu_button("Competitors", |ui| {
                    let selected = self.state.selection().to_vec();
                    for entity in self.state.catalogue() {
                        let mut checked = selected.contains(&entity.id);
                        if ui.checkbox(&mut checked, &entity.name).changed() {
                            // Keep catalogue order so the columns don't reshuffle
                            let next = self
                                .state
                                .catalogue()
                                .iter()
                                .filter(|e| {
                                    if e.id == entity.id {
                                        checked
                                    } else {
                                        selected.contains(&e.id)
                                    }
                                })
                                .map(|e| e.id.clone())
                                .collect();
                            requested = Some(next);
                        }
                    }
                    ui.separator();
                    if ui
                        .add_enabled(
                            !self.state.is_default_selection(),
                            egui::Button::new("Reset to default"),
                        )
                        .clicked()
                    {
                        requested = Some(Vec::new());
                        ui.close_menu();
                    }
                });

                if self.state.expanded_row().is_some() && ui.button("Collapse").clicked() {
                    self.state.collapse();
                }
            });
        });

        if let Some(ids) = requested {
            self.apply_selection(ids);
        }
    }

    fn render_messages(&mut self, ctx: &egui::Context) {
        if let Some(msg) = self.error_message.clone() {
            egui::TopBottomPanel::top("error_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(255, 100, 100), format!("Error: {}", msg));
                    if ui.button("Dismiss").clicked() {
                        self.error_message = None;
                    }
                });
            });
        }

        if let Some(msg) = self.info_message.clone() {
            egui::TopBottomPanel::top("info_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(100, 150, 255), msg);
                    if ui.button("Dismiss").clicked() {
                        self.info_message = None;
                    }
                });
            });
        }
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (bracket, label) in [
                    (Bracket::Light, "low"),
                    (Bracket::Medium, "medium"),
                    (Bracket::Dark, "high"),
                    (Bracket::Empty, "none"),
                ] {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, theme::bracket_fill(bracket));
                    ui.label(label);
                }
                ui.separator();
                match self.state.value_range() {
                    Some(range) => ui.label(format!(
                        "Rate changes: {} - {}",
                        crate::matrix::format::grouped(range.min),
                        crate::matrix::format::grouped(range.max)
                    )),
                    None => ui.label("Rate changes: no data"),
                };
                if let Some(path) = &self.log_path {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Log: {}", path.display()))
                            .small()
                            .color(egui::Color32::GRAY),
                    );
                }
            });
        });
    }
}

impl eframe::App for MatrixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.set_viewport_width(ctx.screen_rect().width());

        self.render_top_bar(ctx);
        self.render_messages(ctx);
        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    matrix_view::render_matrix(ui, &mut self.state);
                });
        });
    }
}
