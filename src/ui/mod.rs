//! UI Module - egui integration
//!
//! Thin rendering layer over [`crate::matrix::MatrixState`]. Views read the
//! state, collect user actions and feed them back after drawing.

pub mod app;
pub mod chart_view;
pub mod matrix_view;
pub mod theme;

pub use app::MatrixApp;
