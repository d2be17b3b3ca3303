//! Core data types for Parity Matrix.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Matches descriptive price ranges such as "$120 - $180" or "1,200–1,850".
static PRICE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\s*([\d,]+(?:\.\d+)?)\s*[-–]\s*\$?\s*([\d,]+(?:\.\d+)?)")
        .expect("price range pattern is valid")
});

/// Stable identifier of a tracked hotel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

/// Role of a hotel in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// The subscribing property: always shown, always the first column
    Subscriber,
    /// A tracked competitor, paginated
    Competitor,
}

/// Inclusive band the synthesized cheapest rate of an entity falls into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    pub min: f64,
    pub max: f64,
}

impl RateBand {
    pub const DEFAULT: RateBand = RateBand { min: 80.0, max: 250.0 };

    /// Build a band, swapping the bounds if they arrive reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            RateBand { min: a, max: b }
        } else {
            RateBand { min: b, max: a }
        }
    }

    /// Parse a descriptive price range ("$120 - $180").
    ///
    /// Returns `None` when the text carries no recognizable pair of numbers.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = PRICE_RANGE_REGEX.captures(text)?;
        let lo: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
        let hi: f64 = caps.get(2)?.as_str().replace(',', "").parse().ok()?;
        Some(RateBand::new(lo, hi))
    }

    /// Map a unit sample in `[0, 1)` into the band.
    pub fn sample(&self, unit: f64) -> f64 {
        self.min + (self.max - self.min) * unit
    }
}

/// A hotel shown in the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    /// Descriptive price range, e.g. "$120 - $180"
    #[serde(default)]
    pub price_range: String,
    /// Explicit value-range policy; overrides whatever `price_range` says
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_band: Option<RateBand>,
}

impl Entity {
    pub fn subscriber(id: impl Into<String>, name: impl Into<String>) -> Self {
        Entity {
            id: EntityId::new(id),
            name: name.into(),
            kind: EntityKind::Subscriber,
            price_range: String::new(),
            rate_band: None,
        }
    }

    pub fn competitor(
        id: impl Into<String>,
        name: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Entity {
            id: EntityId::new(id),
            name: name.into(),
            kind: EntityKind::Competitor,
            price_range: price_range.into(),
            rate_band: None,
        }
    }

    pub fn with_rate_band(mut self, band: RateBand) -> Self {
        self.rate_band = Some(band);
        self
    }

    /// Band used when synthesizing rates: explicit band, then the parsed
    /// price range, then [`RateBand::DEFAULT`].
    pub fn effective_rate_band(&self) -> RateBand {
        self.rate_band
            .or_else(|| RateBand::parse(&self.price_range))
            .unwrap_or(RateBand::DEFAULT)
    }
}

/// One aggregated reporting period (a month) of activity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Period label in `Mon'YY` form; doubles as the row identity
    pub label: String,
    /// Activity count of the subscriber
    pub subscriber: u64,
    /// Activity counts keyed by competitor; absent keys read as zero
    #[serde(default)]
    pub competitors: BTreeMap<EntityId, u64>,
}

impl PeriodRow {
    pub fn new(label: impl Into<String>, subscriber: u64) -> Self {
        PeriodRow {
            label: label.into(),
            subscriber,
            competitors: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, id: impl Into<String>, count: u64) -> Self {
        self.competitors.insert(EntityId::new(id), count);
        self
    }

    /// Count for a competitor, zero when the row has no entry for it.
    pub fn value_for(&self, id: &EntityId) -> u64 {
        self.competitors.get(id).copied().unwrap_or(0)
    }

    /// Every count carried by the row, subscriber first.
    pub fn all_values(&self) -> impl Iterator<Item = u64> + '_ {
        std::iter::once(self.subscriber).chain(self.competitors.values().copied())
    }
}

/// Everything the matrix renders: the subscriber, the competitor catalogue
/// and the period rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub subscriber: Entity,
    #[serde(default)]
    pub competitors: Vec<Entity>,
    #[serde(default)]
    pub rows: Vec<PeriodRow>,
}

impl Dataset {
    pub fn competitor(&self, id: &EntityId) -> Option<&Entity> {
        self.competitors.iter().find(|c| &c.id == id)
    }
}
