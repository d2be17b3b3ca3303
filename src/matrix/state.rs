//! MatrixState - the comparison matrix component instance
//!
//! Owns every piece of derived and interactive state of one matrix: the
//! effective competitor selection, the page cursor, the dataset value range,
//! the expanded row with its memoized daily series, and the legend flags.
//!
//! All operations are synchronous and total. Derived state is recomputed
//! inside the mutating call that invalidates it, so a renderer reading the
//! state afterwards always sees consistent values.

use super::chart::{tooltip_lines, ChartModel, TooltipLine};
use super::color::{classify, CellStyle, ValueRange};
use super::legend::{LegendBook, LegendKey, SelectionSignature, SeriesKey};
use super::pagination::{columns_per_page, Paginator, Slot};
use super::series::{peak_days, synthesize, DailySeries, SeriesCache};
use crate::config::AppSettings;
use crate::models::{Dataset, Entity, EntityId, PeriodRow};

/// Viewport width assumed until the host reports one.
pub const INITIAL_VIEWPORT_WIDTH: f32 = 1280.0;

/// Knobs of a matrix instance, usually taken from [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixOptions {
    /// Competitors shown when the selection is empty
    pub default_selection_len: usize,
    /// Competitor series visible by default in a drill-down chart
    pub legend_default_visible: usize,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        MatrixOptions {
            default_selection_len: 5,
            legend_default_visible: 3,
        }
    }
}

impl From<&AppSettings> for MatrixOptions {
    fn from(settings: &AppSettings) -> Self {
        MatrixOptions {
            default_selection_len: settings.default_selection_len,
            legend_default_visible: settings.legend_default_visible,
        }
    }
}

pub struct MatrixState {
    subscriber: Entity,
    catalogue: Vec<Entity>,
    rows: Vec<PeriodRow>,
    options: MatrixOptions,
    /// Ids as requested by the selection UI
    requested: Vec<EntityId>,
    /// Ids actually shown, after fallback and filtering
    selection: Vec<EntityId>,
    signature: SelectionSignature,
    paginator: Paginator,
    range: Option<ValueRange>,
    expanded: Option<String>,
    cache: SeriesCache,
    legends: LegendBook,
}

impl MatrixState {
    pub fn new(dataset: Dataset, options: MatrixOptions) -> Self {
        let range = ValueRange::from_rows(&dataset.rows);
        let mut state = MatrixState {
            subscriber: dataset.subscriber,
            catalogue: dataset.competitors,
            rows: dataset.rows,
            options,
            requested: Vec::new(),
            selection: Vec::new(),
            signature: SelectionSignature::default(),
            paginator: Paginator::new(columns_per_page(INITIAL_VIEWPORT_WIDTH), 0),
            range,
            expanded: None,
            cache: SeriesCache::new(),
            legends: LegendBook::new(),
        };
        state.apply_selection();
        log::info!(
            "[Matrix] initialized: {} rows, {} competitors, {} selected",
            state.rows.len(),
            state.catalogue.len(),
            state.selection.len()
        );
        state
    }

    pub fn subscriber(&self) -> &Entity {
        &self.subscriber
    }

    pub fn catalogue(&self) -> &[Entity] {
        &self.catalogue
    }

    pub fn rows(&self) -> &[PeriodRow] {
        &self.rows
    }

    pub fn options(&self) -> &MatrixOptions {
        &self.options
    }

    pub fn value_range(&self) -> Option<ValueRange> {
        self.range
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Replace the period rows. Recomputes the value range and drops the
    /// expansion if its row is gone.
    pub fn set_rows(&mut self, rows: Vec<PeriodRow>) {
        self.rows = rows;
        self.range = ValueRange::from_rows(&self.rows);
        self.cache.invalidate();
        if let Some(label) = &self.expanded {
            if !self.rows.iter().any(|r| &r.label == label) {
                log::info!("[Matrix] expanded row {} no longer present, collapsing", label);
                self.expanded = None;
            }
        }
    }

    /// Replace the whole dataset, keeping the requested selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.subscriber = dataset.subscriber;
        self.catalogue = dataset.competitors;
        self.legends.clear();
        self.set_rows(dataset.rows);
        self.apply_selection();
    }

    /// Set the competitor selection. Unknown and repeated ids are dropped;
    /// an empty result falls back to the first
    /// [`MatrixOptions::default_selection_len`] competitors.
    pub fn set_selection(&mut self, ids: Vec<EntityId>) {
        self.requested = ids;
        self.apply_selection();
    }

    fn apply_selection(&mut self) {
        let mut effective: Vec<EntityId> = Vec::new();
        for id in &self.requested {
            let known = self.catalogue.iter().any(|c| &c.id == id);
            if known && !effective.contains(id) {
                effective.push(id.clone());
            } else if !known {
                log::warn!("[Matrix] ignoring unknown competitor id {}", id);
            }
        }
        if effective.is_empty() {
            effective = self
                .catalogue
                .iter()
                .take(self.options.default_selection_len)
                .map(|c| c.id.clone())
                .collect();
        }

        self.signature = SelectionSignature::from_ids(&effective);
        self.selection = effective;
        self.paginator.set_total(self.selection.len());
        self.init_legend();
        log::debug!("[Matrix] selection now {}", self.signature);
    }

    /// True when the shown competitors come from the fallback subset.
    pub fn is_default_selection(&self) -> bool {
        !self.requested.iter().any(|id| self.selection.contains(id))
    }

    pub fn selection(&self) -> &[EntityId] {
        &self.selection
    }

    pub fn selection_signature(&self) -> &SelectionSignature {
        &self.signature
    }

    /// Selected competitors in selection order.
    pub fn selected_entities(&self) -> Vec<&Entity> {
        self.selection
            .iter()
            .filter_map(|id| self.catalogue.iter().find(|c| &c.id == id))
            .collect()
    }

    /// Report the host viewport width.
    pub fn set_viewport_width(&mut self, width: f32) {
        let columns = columns_per_page(width);
        if columns != self.paginator.columns_per_page() {
            log::debug!("[Matrix] viewport {:.0}px -> {} columns per page", width, columns);
            self.paginator.set_columns_per_page(columns);
        }
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) {
        self.paginator.next();
    }

    pub fn prev_page(&mut self) {
        self.paginator.prev();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.paginator.go_to(page);
    }

    /// Competitor columns of the current page, padded with placeholders.
    pub fn page_slots(&self) -> Vec<Slot<&Entity>> {
        let selected = self.selected_entities();
        self.paginator
            .page_slots(&selected)
            .into_iter()
            .map(Slot::copied)
            .collect()
    }

    // ------------------------------------------------------------------
    // Cells
    // ------------------------------------------------------------------

    pub fn cell_style(&self, value: u64) -> CellStyle {
        classify(value, self.range)
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    pub fn expanded_row(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn is_expanded(&self, label: &str) -> bool {
        self.expanded.as_deref() == Some(label)
    }

    /// Expand a row, or collapse it when it is the expanded one. Expanding
    /// a row collapses any other. Unknown labels are ignored.
    pub fn toggle_row(&mut self, label: &str) {
        if self.is_expanded(label) {
            log::debug!("[Matrix] collapse {}", label);
            self.expanded = None;
            self.cache.invalidate();
            return;
        }
        if !self.rows.iter().any(|r| r.label == label) {
            log::warn!("[Matrix] cannot expand unknown row {}", label);
            return;
        }
        log::debug!("[Matrix] expand {}", label);
        self.expanded = Some(label.to_string());
        self.init_legend();
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
        self.cache.invalidate();
    }

    fn series_keys(&self) -> Vec<SeriesKey> {
        let mut keys = vec![SeriesKey::SubscriberCount, SeriesKey::SubscriberRate];
        keys.extend(self.selection.iter().cloned().map(SeriesKey::Competitor));
        keys
    }

    fn init_legend(&mut self) {
        if let Some(key) = self.legend_key() {
            let series = self.series_keys();
            self.legends
                .initialize(&key, &series, self.options.legend_default_visible);
        }
    }

    /// Key of the legend flags in effect for the expanded row.
    pub fn legend_key(&self) -> Option<LegendKey> {
        self.expanded
            .as_ref()
            .map(|row| LegendKey::new(row.clone(), self.signature.clone()))
    }

    /// Daily series of the expanded row. Recomputed only when the expanded
    /// row or the selection changed since the last call. `None` when nothing
    /// is expanded or the row label is not a `Mon'YY` period.
    pub fn expanded_series(&mut self) -> Option<&DailySeries> {
        let label = self.expanded.as_deref()?;
        let row = self.rows.iter().find(|r| r.label == label)?;
        let subscriber = &self.subscriber;
        let selected: Vec<&Entity> = self
            .selection
            .iter()
            .filter_map(|id| self.catalogue.iter().find(|c| &c.id == id))
            .collect();
        self.cache
            .get_or_compute(label, &self.signature, || synthesize(row, subscriber, &selected))
    }

    /// Times the daily series has been synthesized by this instance.
    pub fn series_computations(&self) -> usize {
        self.cache.computations()
    }

    // ------------------------------------------------------------------
    // Legend
    // ------------------------------------------------------------------

    /// Flip one series of the expanded chart. Returns the new flag, or
    /// `None` when no row is expanded.
    pub fn toggle_series(&mut self, series: &SeriesKey) -> Option<bool> {
        let key = self.legend_key()?;
        Some(self.legends.toggle(&key, series))
    }

    pub fn is_series_visible(&self, series: &SeriesKey) -> bool {
        match self.legend_key() {
            Some(key) => self.legends.is_visible(&key, series),
            None => true,
        }
    }

    /// Display name of a series.
    pub fn series_name(&self, series: &SeriesKey) -> String {
        match series {
            SeriesKey::SubscriberCount => self.subscriber.name.clone(),
            SeriesKey::SubscriberRate => format!("{} (rate)", self.subscriber.name),
            SeriesKey::Competitor(id) => self
                .catalogue
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Chart
    // ------------------------------------------------------------------

    /// Peak days of the expanded chart under the current legend flags.
    pub fn peak_days(&mut self) -> Vec<u32> {
        let key = match self.legend_key() {
            Some(k) => k,
            None => return Vec::new(),
        };
        if self.expanded_series().is_none() {
            return Vec::new();
        }
        match self.cache.current() {
            Some(series) => peak_days(series, |s| self.legends.is_visible(&key, s)),
            None => Vec::new(),
        }
    }

    pub fn chart_model(&mut self) -> Option<ChartModel> {
        let key = self.legend_key()?;
        self.expanded_series()?;
        let series = self.cache.current()?;
        Some(ChartModel::build(
            series,
            |s| self.legends.is_visible(&key, s),
            |s| self.series_name(s),
        ))
    }

    pub fn tooltip(&mut self, day: u32) -> Vec<TooltipLine> {
        let key = match self.legend_key() {
            Some(k) => k,
            None => return Vec::new(),
        };
        if self.expanded_series().is_none() {
            return Vec::new();
        }
        match self.cache.current() {
            Some(series) => tooltip_lines(
                series,
                day,
                |s| self.legends.is_visible(&key, s),
                |s| self.series_name(s),
            ),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::color::Bracket;

    fn dataset(competitors: usize) -> Dataset {
        let comps: Vec<Entity> = (0..competitors)
            .map(|i| Entity::competitor(format!("h{}", i), format!("Hotel {}", i), "$100 - $200"))
            .collect();
        let rows = vec![
            PeriodRow::new("Jul'25", 120).with_value("h0", 40).with_value("h1", 0),
            PeriodRow::new("Aug'25", 310).with_value("h0", 90).with_value("h1", 15),
            PeriodRow::new("bogus", 5),
        ];
        Dataset {
            subscriber: Entity::subscriber("sub", "Seaside Resort"),
            competitors: comps,
            rows,
        }
    }

    #[test]
    fn test_empty_selection_uses_defaults() {
        let state = MatrixState::new(dataset(8), MatrixOptions::default());
        assert_eq!(state.selection().len(), 5);
        assert_eq!(state.selection()[0], EntityId::from("h0"));
        assert!(state.is_default_selection());
    }

    #[test]
    fn test_unknown_and_duplicate_ids_dropped() {
        let mut state = MatrixState::new(dataset(8), MatrixOptions::default());
        state.set_selection(vec!["h3".into(), "nope".into(), "h3".into(), "h1".into()]);
        assert_eq!(state.selection(), &[EntityId::from("h3"), EntityId::from("h1")]);
        assert!(!state.is_default_selection());
    }

    #[test]
    fn test_cell_style_uses_dataset_range() {
        let state = MatrixState::new(dataset(2), MatrixOptions::default());
        assert_eq!(state.value_range(), Some(ValueRange { min: 5, max: 310 }));
        assert_eq!(state.cell_style(0).bracket, Bracket::Empty);
        assert_eq!(state.cell_style(310).bracket, Bracket::Dark);
    }

    #[test]
    fn test_malformed_row_expands_without_chart() {
        let mut state = MatrixState::new(dataset(2), MatrixOptions::default());
        state.toggle_row("bogus");
        assert!(state.is_expanded("bogus"));
        assert!(state.expanded_series().is_none());
        assert!(state.chart_model().is_none());
        assert!(state.peak_days().is_empty());
    }

    #[test]
    fn test_set_rows_collapses_missing_row() {
        let mut state = MatrixState::new(dataset(2), MatrixOptions::default());
        state.toggle_row("Aug'25");
        state.set_rows(vec![PeriodRow::new("Sep'25", 500)]);
        assert_eq!(state.expanded_row(), None);
        assert_eq!(state.value_range(), Some(ValueRange { min: 500, max: 500 }));
    }

    #[test]
    fn test_toggle_series_without_expansion() {
        let mut state = MatrixState::new(dataset(2), MatrixOptions::default());
        assert_eq!(state.toggle_series(&SeriesKey::SubscriberCount), None);
        assert!(state.is_series_visible(&SeriesKey::SubscriberCount));
    }

    #[test]
    fn test_series_names() {
        let state = MatrixState::new(dataset(2), MatrixOptions::default());
        assert_eq!(state.series_name(&SeriesKey::SubscriberCount), "Seaside Resort");
        assert_eq!(state.series_name(&SeriesKey::SubscriberRate), "Seaside Resort (rate)");
        assert_eq!(state.series_name(&SeriesKey::Competitor("h1".into())), "Hotel 1");
        assert_eq!(state.series_name(&SeriesKey::Competitor("zz".into())), "zz");
    }
}
