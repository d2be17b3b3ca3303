//! Comparison matrix core.
//!
//! Everything here is UI-toolkit independent: the egui layer in `crate::ui`
//! only reads from [`MatrixState`] and forwards user input to it.
//!
//! # Module Structure
//!
//! - `pagination`: viewport breakpoints and the competitor page cursor
//! - `color`: dataset value range and cell brackets
//! - `period`: `Mon'YY` labels and calendar facts
//! - `series`: seeded daily series synthesis, peak days and the series memo
//! - `legend`: per-(row, selection) series visibility
//! - `chart`: axis/tick/tooltip shaping for the drill-down chart
//! - `format`: number abbreviation for cells, ticks and tooltips
//! - `state`: the component instance tying all of the above together

pub mod chart;
pub mod color;
pub mod format;
pub mod legend;
pub mod pagination;
pub mod period;
pub mod series;
pub mod state;

pub use chart::{ChartModel, TooltipLine};
pub use color::{classify, Bracket, CellStyle, TextTone, ValueRange};
pub use legend::{LegendBook, LegendKey, SelectionSignature, SeriesKey};
pub use pagination::{columns_per_page, Paginator, Slot};
pub use period::PeriodMonth;
pub use series::{peak_days, synthesize, DailySeries, DailySeriesPoint, SeededRng, SeriesCache};
pub use state::{MatrixOptions, MatrixState};
