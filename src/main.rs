use anyhow::{anyhow, Context};
use eframe::egui;
use std::path::{Path, PathBuf};

use parity_matrix::config::{AppSettings, SettingsManager};
use parity_matrix::dataset::{demo_dataset, load_dataset};
use parity_matrix::log_collector::resolve_logs_path;
use parity_matrix::ui::MatrixApp;
use parity_matrix::{AppError, ConfigError, LogCollector, MatrixOptions, MatrixState};

/// Settings from `--settings <path>` (or the first bare argument), else the
/// global settings file. A missing explicit file is created on first save.
fn load_settings(explicit: Option<&Path>) -> anyhow::Result<AppSettings> {
    match explicit {
        Some(path) => match SettingsManager::load_from(path) {
            Ok(settings) => Ok(settings),
            Err(ConfigError::FileNotFound(_)) => Ok(AppSettings::default()),
            Err(e) => Err(e).with_context(|| format!("loading {}", path.display())),
        },
        None => Ok(SettingsManager::load()?),
    }
}

fn settings_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(flag) if flag == "--settings" => args.next().map(PathBuf::from),
        Some(path) => Some(PathBuf::from(path)),
        None => None,
    }
}

fn main() -> anyhow::Result<()> {
    // =========================================================================
    // SETTINGS
    // =========================================================================
    let settings_path = settings_arg();
    let settings = load_settings(settings_path.as_deref())?;

    // =========================================================================
    // LOGGING
    // =========================================================================
    let log_dir = resolve_logs_path(&settings.log_dir)?;
    let log_collector = LogCollector::new(&log_dir, settings.log_level())?;
    if let Err(e) = log_collector.install() {
        eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
    }
    log::info!("Parity Matrix {} starting", parity_matrix::VERSION);

    // =========================================================================
    // DATASET
    // =========================================================================
    let mut startup_error = None;
    let dataset = if settings.dataset_path.is_empty() {
        log::info!("[Main] no dataset configured, using demo data");
        demo_dataset()
    } else {
        match load_dataset(Path::new(&settings.dataset_path)) {
            Ok(dataset) => dataset,
            Err(e) => {
                let err = AppError::from(e);
                log::error!("[Main] {}, falling back to demo data", err);
                startup_error = Some(err.user_message());
                demo_dataset()
            }
        }
    };

    let mut state = MatrixState::new(dataset, MatrixOptions::from(&settings));
    if !settings.initial_selection.is_empty() {
        state.set_selection(settings.initial_selection.clone());
    }

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };

    let mut app = MatrixApp::new(state, settings).with_log_path(log_collector.log_path().to_path_buf());
    if let Some(path) = settings_path {
        app = app.with_settings_path(path);
    }
    if let Some(message) = startup_error {
        app = app.with_error(message);
    }

    let result = eframe::run_native("Parity Matrix", options, Box::new(move |_cc| Box::new(app)));

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    log::info!("Parity Matrix shutting down");
    if let Err(e) = log_collector.wait_for_empty() {
        eprintln!("[Main] WARNING: Failed to wait for log collector to empty: {}", e);
    }

    result.map_err(|e| anyhow!("UI terminated with error: {}", e))
}
