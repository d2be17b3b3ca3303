//! Chart shaping for the drill-down panel.
//!
//! Turns a [`DailySeries`] plus legend visibility into everything the
//! renderer draws: count bars on the left axis, the subscriber rate line on
//! the right axis, tick labels for both axes, per-day x ticks with peak-day
//! flags, legend entries and tooltip text. No egui types leak in here.

use super::format;
use super::legend::SeriesKey;
use super::series::{peak_days, DailySeries};

/// Ticks requested per value axis.
pub const AXIS_TICK_TARGET: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

/// Scale of one value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<AxisTick>,
}

impl Axis {
    fn new(lo: f64, hi: f64, label: impl Fn(f64) -> String) -> Self {
        let values = nice_ticks(lo, hi, AXIS_TICK_TARGET);
        let min = values.first().copied().unwrap_or(lo);
        let max = values.last().copied().unwrap_or(hi);
        Axis {
            min,
            max,
            ticks: values
                .into_iter()
                .map(|value| AxisTick {
                    value,
                    label: label(value),
                })
                .collect(),
        }
    }

    /// Position of `value` on the axis in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTick {
    pub day: u32,
    pub label: String,
    /// Day is one of the top combined-activity days
    pub peak: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub key: SeriesKey,
    pub label: String,
    /// One value per day, aligned with [`ChartModel::day_ticks`]
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub key: SeriesKey,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub day_ticks: Vec<DayTick>,
    pub bars: Vec<BarSeries>,
    /// Subscriber rate per day, when that series is visible
    pub rate_line: Option<Vec<f64>>,
    pub count_axis: Axis,
    pub rate_axis: Axis,
    pub legend: Vec<LegendEntry>,
}

impl ChartModel {
    /// Shape a series for drawing. `name` labels each series key.
    pub fn build(
        series: &DailySeries,
        visible: impl Fn(&SeriesKey) -> bool,
        name: impl Fn(&SeriesKey) -> String,
    ) -> Self {
        let keys = series.series_keys();
        let peaks = peak_days(series, &visible);

        let day_ticks = series
            .points
            .iter()
            .map(|p| DayTick {
                day: p.day,
                label: p.day.to_string(),
                peak: peaks.contains(&p.day),
            })
            .collect();

        let bars: Vec<BarSeries> = keys
            .iter()
            .filter(|k| k.is_count() && visible(k))
            .map(|k| BarSeries {
                key: k.clone(),
                label: name(k),
                values: series
                    .points
                    .iter()
                    .map(|p| p.count_for(k).unwrap_or(0))
                    .collect(),
            })
            .collect();

        let rate_line = visible(&SeriesKey::SubscriberRate)
            .then(|| series.points.iter().map(|p| p.subscriber_rate).collect::<Vec<_>>());

        let count_max = bars
            .iter()
            .flat_map(|b| b.values.iter().copied())
            .max()
            .unwrap_or(0) as f64;
        let count_axis = Axis::new(0.0, count_max, format::abbreviate);

        let (rate_lo, rate_hi) = series
            .points
            .iter()
            .map(|p| p.subscriber_rate)
            .fold(None, |acc: Option<(f64, f64)>, r| match acc {
                None => Some((r, r)),
                Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
            })
            .unwrap_or((0.0, 0.0));
        let rate_axis = Axis::new(rate_lo, rate_hi, format::currency);

        let legend = keys
            .iter()
            .map(|k| LegendEntry {
                key: k.clone(),
                label: name(k),
                visible: visible(k),
            })
            .collect();

        ChartModel {
            title: format!("Daily activity, {}", series.period.label()),
            day_ticks,
            bars,
            rate_line,
            count_axis,
            rate_axis,
            legend,
        }
    }

    pub fn peak_days(&self) -> Vec<u32> {
        self.day_ticks.iter().filter(|t| t.peak).map(|t| t.day).collect()
    }
}

/// Tooltip body for one day: every visible series, competitors with their
/// cheapest rate. Empty when the day is outside the series.
pub fn tooltip_lines(
    series: &DailySeries,
    day: u32,
    visible: impl Fn(&SeriesKey) -> bool,
    name: impl Fn(&SeriesKey) -> String,
) -> Vec<TooltipLine> {
    let point = match series.point(day) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut lines = vec![TooltipLine {
        label: series
            .period
            .weekday_name(day)
            .map(|wd| format!("{} {} {}", wd, day, series.period.label()))
            .unwrap_or_else(|| format!("Day {}", day)),
        value: String::new(),
    }];

    for key in series.series_keys().iter().filter(|k| visible(k)) {
        let value = match key {
            SeriesKey::SubscriberCount => format::grouped(point.subscriber_count),
            SeriesKey::SubscriberRate => format::currency(point.subscriber_rate),
            SeriesKey::Competitor(id) => match point.competitor(id) {
                Some(c) => format!("{} (from {})", format::grouped(c.count), format::currency(c.rate)),
                None => continue,
            },
        };
        lines.push(TooltipLine {
            label: name(key),
            value,
        });
    }
    lines
}

/// "Nice" tick values (1, 2 or 5 times a power of ten) covering `[lo, hi]`.
///
/// A flat range is widened so the axis never collapses to a single value.
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let target = target.max(2);
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let (lo, hi) = if hi - lo <= f64::EPSILON {
        let pad = if lo.abs() > 1.0 { lo.abs() * 0.1 } else { 1.0 };
        ((lo - pad).max(0.0), hi + pad)
    } else {
        (lo, hi)
    };

    let step = nice_number((hi - lo) / (target - 1) as f64);
    let start = (lo / step).floor() * step;
    let end = (hi / step).ceil() * step;
    let count = ((end - start) / step).round() as usize;
    (0..=count).map(|i| start + step * i as f64).collect()
}

fn nice_number(raw: f64) -> f64 {
    let exponent = raw.log10().floor();
    let base = 10f64.powf(exponent);
    let fraction = raw / base;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::series::synthesize;
    use crate::models::{Entity, EntityId, PeriodRow};

    fn label(key: &SeriesKey) -> String {
        match key {
            SeriesKey::SubscriberCount => "Seaside".to_string(),
            SeriesKey::SubscriberRate => "Seaside rate".to_string(),
            SeriesKey::Competitor(id) => id.to_string(),
        }
    }

    fn fixture() -> DailySeries {
        let sub = Entity::subscriber("sub", "Seaside");
        let comps = vec![
            Entity::competitor("h1", "Harbor Inn", "$90 - $140"),
            Entity::competitor("h2", "Bay Lodge", "$100 - $160"),
        ];
        let selected: Vec<&Entity> = comps.iter().collect();
        let row = PeriodRow::new("Sep'25", 600).with_value("h1", 300).with_value("h2", 150);
        synthesize(&row, &sub, &selected).unwrap()
    }

    #[test]
    fn test_nice_ticks_cover_range() {
        let ticks = nice_ticks(0.0, 87.0, 5);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert!(*ticks.last().unwrap() >= 87.0);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_nice_ticks_flat_range() {
        let ticks = nice_ticks(0.0, 0.0, 5);
        assert!(ticks.len() >= 2);
        assert!(ticks.last().unwrap() > ticks.first().unwrap());
    }

    #[test]
    fn test_hidden_series_drop_out() {
        let series = fixture();
        let hidden = SeriesKey::Competitor(EntityId::from("h2"));
        let model = ChartModel::build(&series, |k| k != &hidden && k != &SeriesKey::SubscriberRate, label);
        assert_eq!(model.bars.len(), 2);
        assert!(model.bars.iter().all(|b| b.key != hidden));
        assert!(model.rate_line.is_none());
        assert_eq!(model.legend.len(), 4);
        assert!(!model.legend.iter().find(|e| e.key == hidden).unwrap().visible);
    }

    #[test]
    fn test_day_ticks_flag_peaks() {
        let series = fixture();
        let model = ChartModel::build(&series, |_| true, label);
        assert_eq!(model.day_ticks.len(), 30);
        assert_eq!(model.peak_days().len(), 3);
        assert_eq!(model.peak_days(), peak_days(&series, |_| true));
    }

    #[test]
    fn test_count_axis_covers_bars() {
        let series = fixture();
        let model = ChartModel::build(&series, |_| true, label);
        let max = model.bars.iter().flat_map(|b| b.values.iter()).max().copied().unwrap();
        assert!(model.count_axis.max >= max as f64);
        assert_eq!(model.count_axis.min, 0.0);
    }

    #[test]
    fn test_tooltip_lists_visible_series() {
        let series = fixture();
        let lines = tooltip_lines(&series, 1, |k| k != &SeriesKey::SubscriberRate, label);
        // header + subscriber count + two competitors
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].label, "Mon 1 Sep'25");
        assert!(lines[2].value.contains("(from $"));
        assert!(tooltip_lines(&series, 31, |_| true, label).is_empty());
    }
}
