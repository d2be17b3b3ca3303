//! Parity Matrix
//!
//! Rate-parity comparison matrix for a subscriber hotel and its competitors:
//! one row per period, one column per competitor, cells colored by how many
//! rate changes were observed. Expanding a row opens a daily drill-down
//! chart synthesized from the monthly aggregate.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Entities, period rows and datasets
//! - **dataset**: Dataset loading, validation and demo data
//! - **config**: Settings persistence
//! - **matrix**: Toolkit-independent matrix state and view-model
//! - **ui**: egui rendering of the matrix and chart
//! - **log_collector**: File logging behind the `log` facade

// Core foundational modules
pub mod error;
pub mod models;

pub mod dataset;
pub mod config;
pub mod matrix;
pub mod ui;

// Decoupled file logging
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AppError, ConfigError, DatasetError, Result};

pub use models::{Dataset, Entity, EntityId, EntityKind, PeriodRow, RateBand};

pub use config::{AppSettings, SettingsManager};

pub use matrix::{MatrixOptions, MatrixState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_demo_matrix_builds() {
        let state = MatrixState::new(dataset::demo_dataset(), MatrixOptions::default());
        assert_eq!(state.selection().len(), 5);
        assert!(state.value_range().is_some());
    }
}
