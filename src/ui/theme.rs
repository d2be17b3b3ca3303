//! Palette for the matrix and the drill-down chart.

use crate::matrix::{Bracket, TextTone};
use eframe::egui::Color32;

pub const HEADER_BG: Color32 = Color32::from_rgb(0x2e, 0x34, 0x40);
pub const PLACEHOLDER_BG: Color32 = Color32::from_rgb(0x3b, 0x42, 0x52);
pub const GRID_LINE: Color32 = Color32::from_gray(70);
pub const PEAK_MARKER: Color32 = Color32::from_rgb(0xff, 0x64, 0x64);

/// Cell fill per bracket
pub fn bracket_fill(bracket: Bracket) -> Color32 {
    match bracket {
        Bracket::Empty => Color32::from_rgb(0xf2, 0xf2, 0xf2),
        Bracket::Uniform => Color32::from_rgb(0x88, 0xc0, 0xd0),
        Bracket::Light => Color32::from_rgb(0xd8, 0xea, 0xf4),
        Bracket::Medium => Color32::from_rgb(0x88, 0xc0, 0xd0),
        Bracket::Dark => Color32::from_rgb(0x2b, 0x5f, 0x8a),
    }
}

pub fn text_color(tone: TextTone) -> Color32 {
    match tone {
        TextTone::Normal => Color32::from_rgb(0x2e, 0x34, 0x40),
        TextTone::Contrast => Color32::WHITE,
    }
}

/// Colors cycled through by chart series (subscriber first)
const SERIES: [Color32; 8] = [
    Color32::from_rgb(0x51, 0xaf, 0xef),
    Color32::from_rgb(0xff, 0xaa, 0x00),
    Color32::from_rgb(0x98, 0xbe, 0x65),
    Color32::from_rgb(0xc6, 0x78, 0xdd),
    Color32::from_rgb(0xda, 0x85, 0x48),
    Color32::from_rgb(0x46, 0xd9, 0xa8),
    Color32::from_rgb(0xec, 0xbe, 0x7b),
    Color32::from_rgb(0xff, 0x6c, 0x6b),
];

pub const RATE_LINE: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);

pub fn series_color(index: usize) -> Color32 {
    SERIES[index % SERIES.len()]
}
