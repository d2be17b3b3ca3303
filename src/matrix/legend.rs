//! Legend visibility state for the drill-down chart.
//!
//! Flags are remembered per (row, selection) pair. Initialization only fills
//! in series that have no flag yet, so collapsing and re-expanding a row keeps
//! whatever the user toggled.

use crate::models::EntityId;
use std::collections::{BTreeMap, HashMap};

/// Identity of one chartable series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesKey {
    SubscriberCount,
    SubscriberRate,
    /// Activity count of a competitor
    Competitor(EntityId),
}

impl SeriesKey {
    /// Count series are drawn as bars on the left axis.
    pub fn is_count(&self) -> bool {
        !matches!(self, SeriesKey::SubscriberRate)
    }
}

/// Order-sensitive fingerprint of a competitor selection. Holds the ids
/// themselves, so no two distinct selections share a signature whatever
/// characters the ids contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectionSignature(Vec<EntityId>);

impl SelectionSignature {
    pub fn from_ids(ids: &[EntityId]) -> Self {
        SelectionSignature(ids.to_vec())
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.0
    }
}

impl std::fmt::Display for SelectionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(EntityId::as_str).collect();
        write!(f, "{:?}", parts)
    }
}

/// Composite key a set of legend flags belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegendKey {
    pub row: String,
    pub selection: SelectionSignature,
}

impl LegendKey {
    pub fn new(row: impl Into<String>, selection: SelectionSignature) -> Self {
        LegendKey {
            row: row.into(),
            selection,
        }
    }
}

/// Default flag for a series: everything is visible except competitors
/// beyond the first `visible_competitors` of the selection.
pub fn default_visibility(
    series: &[SeriesKey],
    visible_competitors: usize,
) -> BTreeMap<SeriesKey, bool> {
    let mut competitor_rank = 0usize;
    series
        .iter()
        .map(|key| {
            let visible = match key {
                SeriesKey::Competitor(_) => {
                    competitor_rank += 1;
                    competitor_rank <= visible_competitors
                }
                _ => true,
            };
            (key.clone(), visible)
        })
        .collect()
}

/// All legend flags of one matrix instance.
#[derive(Debug, Clone, Default)]
pub struct LegendBook {
    flags: HashMap<LegendKey, BTreeMap<SeriesKey, bool>>,
}

impl LegendBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in defaults for the series of `key` that have no flag yet.
    /// Existing flags are never overwritten.
    pub fn initialize(&mut self, key: &LegendKey, series: &[SeriesKey], visible_competitors: usize) {
        let defaults = default_visibility(series, visible_competitors);
        let entry = self.flags.entry(key.clone()).or_default();
        for (series_key, visible) in defaults {
            entry.entry(series_key).or_insert(visible);
        }
    }

    /// Flip one series. Returns the new flag.
    pub fn toggle(&mut self, key: &LegendKey, series: &SeriesKey) -> bool {
        let flag = self
            .flags
            .entry(key.clone())
            .or_default()
            .entry(series.clone())
            .or_insert(true);
        *flag = !*flag;
        log::debug!(
            "[Matrix] [LEGEND] {} {:?} -> {}",
            key.row,
            series,
            if *flag { "shown" } else { "hidden" }
        );
        *flag
    }

    /// Visibility of a series; series never initialized read as visible.
    pub fn is_visible(&self, key: &LegendKey, series: &SeriesKey) -> bool {
        self.flags
            .get(key)
            .and_then(|f| f.get(series))
            .copied()
            .unwrap_or(true)
    }

    pub fn flags(&self, key: &LegendKey) -> Option<&BTreeMap<SeriesKey, bool>> {
        self.flags.get(key)
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}
