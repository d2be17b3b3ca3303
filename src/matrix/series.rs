//! Daily series synthesis for an expanded period row.
//!
//! The backend only delivers monthly aggregates, so the drill-down chart is
//! filled with a per-day series derived deterministically from the row: the
//! same row, selection and month always produce the same points.

use super::legend::{SelectionSignature, SeriesKey};
use super::period::PeriodMonth;
use crate::models::{Entity, EntityId, PeriodRow};

/// Relative amplitude of the per-day count jitter.
const COUNT_JITTER: f64 = 0.2;
/// Number of days flagged as peaks on the x-axis.
pub const PEAK_DAY_COUNT: usize = 3;

/// Linear congruential generator (Numerical Recipes constants).
///
/// Not suitable for anything but presentation filler.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        SeededRng { state: seed }
    }

    /// Seed from an FNV-1a hash over the little-endian bytes of `parts`.
    pub fn from_parts(parts: &[u64]) -> Self {
        let mut hash: u32 = 0x811c_9dc5;
        for part in parts {
            for byte in part.to_le_bytes() {
                hash ^= byte as u32;
                hash = hash.wrapping_mul(0x0100_0193);
            }
        }
        SeededRng::new(hash)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform sample in `[0, 1)` from the high 24 bits.
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / (1u32 << 24) as f64
    }

    /// Uniform sample in `[-amplitude, amplitude)`.
    pub fn next_jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() * 2.0 - 1.0) * amplitude
    }
}

/// One competitor's synthesized day.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorDay {
    pub id: EntityId,
    pub count: u64,
    /// Cheapest rate found that day
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySeriesPoint {
    /// 1-based day of month
    pub day: u32,
    pub subscriber_count: u64,
    pub subscriber_rate: f64,
    /// One entry per selected competitor, in selection order
    pub competitors: Vec<CompetitorDay>,
}

impl DailySeriesPoint {
    pub fn competitor(&self, id: &EntityId) -> Option<&CompetitorDay> {
        self.competitors.iter().find(|c| &c.id == id)
    }

    /// Count carried by a series key; `None` for the rate series.
    pub fn count_for(&self, key: &SeriesKey) -> Option<u64> {
        match key {
            SeriesKey::SubscriberCount => Some(self.subscriber_count),
            SeriesKey::SubscriberRate => None,
            SeriesKey::Competitor(id) => self.competitor(id).map(|c| c.count),
        }
    }
}

/// A full calendar month of synthesized points.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub period: PeriodMonth,
    pub points: Vec<DailySeriesPoint>,
    /// Competitors present in every point, in selection order
    pub competitors: Vec<EntityId>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, day: u32) -> Option<&DailySeriesPoint> {
        self.points.iter().find(|p| p.day == day)
    }

    /// Every chartable series of this expansion, subscriber series first.
    pub fn series_keys(&self) -> Vec<SeriesKey> {
        let mut keys = vec![SeriesKey::SubscriberCount, SeriesKey::SubscriberRate];
        keys.extend(self.competitors.iter().cloned().map(SeriesKey::Competitor));
        keys
    }
}

fn daily_count(monthly: u64, days: u32, jitter: f64) -> u64 {
    if monthly == 0 || days == 0 {
        return 0;
    }
    let base = monthly as f64 / days as f64;
    (base * (1.0 + jitter)).round().max(0.0) as u64
}

/// Expand a period row into one point per calendar day.
///
/// Returns `None` when the row label is not a `Mon'YY` period; the caller
/// renders no chart in that case.
pub fn synthesize(
    row: &PeriodRow,
    subscriber: &Entity,
    selected: &[&Entity],
) -> Option<DailySeries> {
    let period = PeriodMonth::parse(&row.label)?;
    let days = period.days_in_month();

    let secondary = selected.first().map(|c| row.value_for(&c.id)).unwrap_or(0);
    let mut rng = SeededRng::from_parts(&[row.subscriber, secondary, period.month_index() as u64]);

    let subscriber_band = subscriber.effective_rate_band();
    let bands: Vec<_> = selected.iter().map(|c| c.effective_rate_band()).collect();

    let points = (1..=days)
        .map(|day| {
            let subscriber_count = daily_count(row.subscriber, days, rng.next_jitter(COUNT_JITTER));
            let subscriber_rate = subscriber_band.sample(rng.next_unit()).round();
            let competitors = selected
                .iter()
                .zip(&bands)
                .map(|(entity, band)| CompetitorDay {
                    id: entity.id.clone(),
                    count: daily_count(row.value_for(&entity.id), days, rng.next_jitter(COUNT_JITTER)),
                    rate: band.sample(rng.next_unit()).round(),
                })
                .collect();
            DailySeriesPoint {
                day,
                subscriber_count,
                subscriber_rate,
                competitors,
            }
        })
        .collect();

    log::debug!(
        "[Matrix] [SERIES] synthesized {} days for {} ({} competitors)",
        days,
        row.label,
        selected.len()
    );

    Some(DailySeries {
        period,
        points,
        competitors: selected.iter().map(|c| c.id.clone()).collect(),
    })
}

/// Days with the highest combined activity across the visible count series.
///
/// At most [`PEAK_DAY_COUNT`] days, ties broken by the earlier day, returned
/// in ascending day order. Days with no visible activity are never peaks.
pub fn peak_days(series: &DailySeries, visible: impl Fn(&SeriesKey) -> bool) -> Vec<u32> {
    let keys: Vec<SeriesKey> = series
        .series_keys()
        .into_iter()
        .filter(|k| k.is_count() && visible(k))
        .collect();

    let mut totals: Vec<(u32, u64)> = series
        .points
        .iter()
        .map(|p| (p.day, keys.iter().filter_map(|k| p.count_for(k)).sum::<u64>()))
        .filter(|(_, total)| *total > 0)
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut days: Vec<u32> = totals.into_iter().take(PEAK_DAY_COUNT).map(|(d, _)| d).collect();
    days.sort_unstable();
    days
}

#[derive(Debug, Clone)]
struct CacheEntry {
    row: String,
    selection: SelectionSignature,
    series: Option<DailySeries>,
}

/// Memo for the series of the currently expanded row.
///
/// Holds one entry keyed on (row label, selection signature). A lookup with
/// the same key reuses the stored result, including a stored `None` for a
/// label that failed to parse.
#[derive(Debug, Clone, Default)]
pub struct SeriesCache {
    entry: Option<CacheEntry>,
    computations: usize,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(
        &mut self,
        row: &str,
        selection: &SelectionSignature,
        compute: impl FnOnce() -> Option<DailySeries>,
    ) -> Option<&DailySeries> {
        let hit = matches!(&self.entry, Some(e) if e.row == row && &e.selection == selection);
        if !hit {
            self.computations += 1;
            self.entry = Some(CacheEntry {
                row: row.to_string(),
                selection: selection.clone(),
                series: compute(),
            });
        }
        self.entry.as_ref().and_then(|e| e.series.as_ref())
    }

    /// The stored series, if any, without touching the key.
    pub fn current(&self) -> Option<&DailySeries> {
        self.entry.as_ref().and_then(|e| e.series.as_ref())
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// How many times the compute closure has run.
    pub fn computations(&self) -> usize {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RateBand;

    fn subscriber() -> Entity {
        Entity::subscriber("sub", "Seaside Resort").with_rate_band(RateBand::new(150.0, 220.0))
    }

    fn competitors() -> Vec<Entity> {
        vec![
            Entity::competitor("h1", "Harbor Inn", "$90 - $140"),
            Entity::competitor("h2", "Grand Plaza", "").with_rate_band(RateBand::new(1e9, 9.99e9)),
        ]
    }

    #[test]
    fn test_rng_is_reproducible() {
        let mut a = SeededRng::from_parts(&[1, 2, 3]);
        let mut b = SeededRng::from_parts(&[1, 2, 3]);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut c = SeededRng::from_parts(&[1, 2, 4]);
        assert_ne!(SeededRng::from_parts(&[1, 2, 3]).next_u32(), c.next_u32());
    }

    #[test]
    fn test_unit_samples_stay_in_range() {
        let mut rng = SeededRng::new(42);
        for _ in 0..10_000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_length_follows_calendar() {
        let comps = competitors();
        let selected: Vec<&Entity> = comps.iter().collect();
        let feb24 = synthesize(&PeriodRow::new("Feb'24", 300), &subscriber(), &selected).unwrap();
        let feb25 = synthesize(&PeriodRow::new("Feb'25", 300), &subscriber(), &selected).unwrap();
        assert_eq!(feb24.len(), 29);
        assert_eq!(feb25.len(), 28);
        assert_eq!(feb24.points.first().unwrap().day, 1);
        assert_eq!(feb24.points.last().unwrap().day, 29);
    }

    #[test]
    fn test_malformed_label_yields_none() {
        assert!(synthesize(&PeriodRow::new("Q3 2025", 10), &subscriber(), &[]).is_none());
    }

    #[test]
    fn test_rates_respect_bands() {
        let comps = competitors();
        let selected: Vec<&Entity> = comps.iter().collect();
        let row = PeriodRow::new("Aug'25", 310).with_value("h1", 90).with_value("h2", 45);
        let series = synthesize(&row, &subscriber(), &selected).unwrap();
        for p in &series.points {
            assert!((150.0..=220.0).contains(&p.subscriber_rate));
            let h1 = p.competitor(&EntityId::from("h1")).unwrap();
            assert!((90.0..=140.0).contains(&h1.rate));
            let h2 = p.competitor(&EntityId::from("h2")).unwrap();
            assert!(h2.rate >= 1e9, "large band rate {} should be 10 digits", h2.rate);
        }
    }

    #[test]
    fn test_zero_month_gives_zero_days() {
        let comps = competitors();
        let selected: Vec<&Entity> = comps.iter().collect();
        let row = PeriodRow::new("Aug'25", 0);
        let series = synthesize(&row, &subscriber(), &selected).unwrap();
        assert!(series.points.iter().all(|p| p.subscriber_count == 0));
        assert!(series.points.iter().all(|p| p.competitors.iter().all(|c| c.count == 0)));
        assert!(peak_days(&series, |_| true).is_empty());
    }

    #[test]
    fn test_peak_days_sorted_and_bounded() {
        let comps = competitors();
        let selected: Vec<&Entity> = comps.iter().collect();
        let row = PeriodRow::new("Aug'25", 3100).with_value("h1", 900);
        let series = synthesize(&row, &subscriber(), &selected).unwrap();
        let peaks = peak_days(&series, |_| true);
        assert_eq!(peaks.len(), PEAK_DAY_COUNT);
        assert!(peaks.windows(2).all(|w| w[0] < w[1]));

        let best = |day: u32| {
            let p = series.point(day).unwrap();
            p.subscriber_count + p.competitors.iter().map(|c| c.count).sum::<u64>()
        };
        let min_peak = peaks.iter().map(|d| best(*d)).min().unwrap();
        for p in &series.points {
            if !peaks.contains(&p.day) {
                assert!(best(p.day) <= min_peak);
            }
        }
    }

    #[test]
    fn test_cache_reuses_until_key_changes() {
        let mut cache = SeriesCache::new();
        let sel_a = SelectionSignature::from_ids(&[EntityId::from("h1")]);
        let sel_b = SelectionSignature::from_ids(&[EntityId::from("h2")]);
        let row = PeriodRow::new("Aug'25", 10);
        let sub = subscriber();

        cache.get_or_compute("Aug'25", &sel_a, || synthesize(&row, &sub, &[]));
        cache.get_or_compute("Aug'25", &sel_a, || synthesize(&row, &sub, &[]));
        assert_eq!(cache.computations(), 1);

        cache.get_or_compute("Aug'25", &sel_b, || synthesize(&row, &sub, &[]));
        assert_eq!(cache.computations(), 2);

        cache.invalidate();
        cache.get_or_compute("Aug'25", &sel_b, || synthesize(&row, &sub, &[]));
        assert_eq!(cache.computations(), 3);
    }
}
