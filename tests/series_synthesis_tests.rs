//! Drill-down series tests
//!
//! Covers calendar length, determinism across re-expansion, the per-instance
//! memo, peak days, and the handling of rows whose label is not a period.

use parity_matrix::dataset::demo_dataset;
use parity_matrix::matrix::{peak_days, synthesize, SeriesKey};
use parity_matrix::models::{Dataset, Entity, EntityId, PeriodRow, RateBand};
use parity_matrix::{MatrixOptions, MatrixState};

fn small_dataset() -> Dataset {
    let competitors = vec![
        Entity::competitor("a", "Harbor View Inn", "$120 - $180"),
        Entity::competitor("b", "The Meridian", "$210 - $320"),
        Entity::competitor("c", "Grand Plaza", "Group rates")
            .with_rate_band(RateBand::new(1e9, 9.999999999e9)),
    ];
    Dataset {
        subscriber: Entity::subscriber("sub", "Seaside Resort"),
        competitors,
        rows: vec![
            PeriodRow::new("Feb'24", 290).with_value("a", 58).with_value("b", 0).with_value("c", 29),
            PeriodRow::new("Feb'25", 280).with_value("a", 56).with_value("b", 84).with_value("c", 28),
            PeriodRow::new("Sep'25", 300).with_value("a", 90).with_value("b", 60).with_value("c", 30),
            PeriodRow::new("Q3 total", 900),
        ],
    }
}

fn state() -> MatrixState {
    MatrixState::new(small_dataset(), MatrixOptions::default())
}

#[test]
fn test_series_covers_whole_month() {
    let mut state = state();
    state.toggle_row("Feb'24");
    assert_eq!(state.expanded_series().map(|s| s.len()), Some(29));

    state.toggle_row("Feb'25");
    assert_eq!(state.expanded_series().map(|s| s.len()), Some(28));

    state.toggle_row("Sep'25");
    let series = state.expanded_series().unwrap();
    assert_eq!(series.len(), 30);
    let days: Vec<u32> = series.points.iter().map(|p| p.day).collect();
    assert_eq!(days, (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_reexpansion_is_deterministic() {
    let mut state = state();
    state.toggle_row("Sep'25");
    let first = state.expanded_series().cloned().unwrap();

    state.toggle_row("Sep'25");
    assert!(state.expanded_row().is_none());
    state.toggle_row("Sep'25");
    let second = state.expanded_series().cloned().unwrap();

    assert_eq!(first, second);

    // A fresh instance over the same data agrees as well
    let mut other = self::state();
    other.toggle_row("Sep'25");
    assert_eq!(other.expanded_series().cloned().unwrap(), first);
}

#[test]
fn test_series_memoized_until_inputs_change() {
    let mut state = state();
    state.toggle_row("Sep'25");
    for _ in 0..5 {
        state.expanded_series();
        state.chart_model();
        state.peak_days();
        state.tooltip(3);
    }
    assert_eq!(state.series_computations(), 1);

    // Legend toggles reuse the series
    state.toggle_series(&SeriesKey::SubscriberCount);
    state.chart_model();
    assert_eq!(state.series_computations(), 1);

    // A new selection recomputes once
    state.set_selection(vec![EntityId::from("b")]);
    state.chart_model();
    state.chart_model();
    assert_eq!(state.series_computations(), 2);
    assert_eq!(
        state.expanded_series().unwrap().competitors,
        vec![EntityId::from("b")]
    );
}

#[test]
fn test_zero_month_yields_zero_days() {
    let mut state = state();
    state.toggle_row("Feb'24");
    let series = state.expanded_series().unwrap();
    assert!(series
        .points
        .iter()
        .all(|p| p.competitor(&EntityId::from("b")).map(|c| c.count) == Some(0)));
}

#[test]
fn test_rates_stay_inside_bands() {
    let mut state = state();
    state.toggle_row("Sep'25");
    let series = state.expanded_series().unwrap();
    for point in &series.points {
        assert!((80.0..=250.0).contains(&point.subscriber_rate));
        let a = point.competitor(&EntityId::from("a")).unwrap();
        assert!((120.0..=180.0).contains(&a.rate), "rate {} outside band", a.rate);
        let c = point.competitor(&EntityId::from("c")).unwrap();
        assert!(c.rate >= 1e9, "large-band competitor rate {}", c.rate);
    }
}

#[test]
fn test_non_period_label_has_no_chart() {
    let mut state = state();
    state.toggle_row("Q3 total");
    assert!(state.is_expanded("Q3 total"));
    assert!(state.expanded_series().is_none());
    assert!(state.chart_model().is_none());
    assert!(state.peak_days().is_empty());
    assert!(state.tooltip(1).is_empty());
}

#[test]
fn test_peak_days_follow_visible_series() {
    let demo = demo_dataset();
    let row = demo.rows.iter().find(|r| r.label == "Jul'25").unwrap();
    let selected: Vec<&Entity> = demo.competitors.iter().take(3).collect();
    let series = synthesize(row, &demo.subscriber, &selected).unwrap();

    let all = peak_days(&series, |_| true);
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0] < w[1]));

    let none = peak_days(&series, |_| false);
    assert!(none.is_empty());

    // Only the rate line visible: no counts, no peaks
    let rate_only = peak_days(&series, |k| *k == SeriesKey::SubscriberRate);
    assert!(rate_only.is_empty());
}

#[test]
fn test_chart_marks_peaks_and_tooltips() {
    let mut state = state();
    state.toggle_row("Sep'25");
    let model = state.chart_model().unwrap();
    assert_eq!(model.day_ticks.len(), 30);
    assert_eq!(model.peak_days(), state.peak_days());
    assert!(model.rate_line.is_some());

    // Sep 1 2025 was a Monday
    let lines = state.tooltip(1);
    assert_eq!(lines[0].label, "Mon 1 Sep'25");
    assert!(lines.iter().any(|l| l.label == "Seaside Resort"));
    assert!(lines.iter().any(|l| l.label == "Seaside Resort (rate)" && l.value.starts_with('$')));
    assert!(state.tooltip(31).is_empty());
}

#[test]
fn test_ids_containing_separator_do_not_share_memo() {
    let dataset = Dataset {
        subscriber: Entity::subscriber("sub", "Seaside Resort"),
        competitors: vec![
            Entity::competitor("a", "Alpha", "$100 - $150"),
            Entity::competitor("b", "Beta", "$100 - $150"),
            Entity::competitor("a|b", "Alpha Beta", "$100 - $150"),
        ],
        rows: vec![PeriodRow::new("Aug'25", 310)
            .with_value("a", 40)
            .with_value("b", 60)
            .with_value("a|b", 90)],
    };
    let mut state = MatrixState::new(dataset, MatrixOptions::default());
    state.set_selection(vec![EntityId::from("a"), EntityId::from("b")]);
    state.toggle_row("Aug'25");
    state.expanded_series();
    state.toggle_series(&SeriesKey::SubscriberCount);

    state.set_selection(vec![EntityId::from("a|b")]);
    assert_eq!(
        state.expanded_series().unwrap().competitors,
        vec![EntityId::from("a|b")]
    );
    assert_eq!(state.series_computations(), 2);
    assert!(state.is_series_visible(&SeriesKey::SubscriberCount));
}

#[test]
fn test_replacing_dataset_refreshes_derived_state() {
    let mut state = state();
    state.toggle_row("Sep'25");
    state.expanded_series();
    state.toggle_series(&SeriesKey::SubscriberCount);
    assert_eq!(state.series_computations(), 1);
    let old_range = state.value_range();

    let mut replacement = small_dataset();
    replacement.competitors[0] = Entity::competitor("a", "Harbor View Inn", "$500 - $600");
    replacement.rows[2] = PeriodRow::new("Sep'25", 9_000)
        .with_value("a", 30)
        .with_value("b", 60)
        .with_value("c", 30);
    state.set_dataset(replacement);

    assert!(state.is_expanded("Sep'25"));
    assert_ne!(state.value_range(), old_range);
    assert_eq!(state.value_range().map(|r| r.max), Some(9_000));

    let series = state.expanded_series().unwrap();
    let subscriber_total: u64 = series.points.iter().map(|p| p.subscriber_count).sum();
    assert!(subscriber_total > 5_000, "series still built from old counts: {}", subscriber_total);
    for point in &series.points {
        let a = point.competitor(&EntityId::from("a")).unwrap();
        assert!((500.0..=600.0).contains(&a.rate), "rate {} outside new band", a.rate);
    }
    assert_eq!(state.series_computations(), 2);

    // Legend flags start over
    assert!(state.is_series_visible(&SeriesKey::SubscriberCount));
}

#[test]
fn test_replacing_rows_recomputes_same_label() {
    let mut state = state();
    state.toggle_row("Sep'25");
    let before = state.expanded_series().cloned().unwrap();

    let mut rows = small_dataset().rows;
    rows[2].subscriber = 3_000;
    state.set_rows(rows);

    assert!(state.is_expanded("Sep'25"));
    let after = state.expanded_series().cloned().unwrap();
    assert_ne!(before, after);
    assert_eq!(state.series_computations(), 2);
}

#[test]
fn test_padded_label_has_no_chart() {
    let dataset = Dataset {
        subscriber: Entity::subscriber("sub", "Seaside Resort"),
        competitors: vec![Entity::competitor("a", "Alpha", "$100 - $150")],
        rows: vec![PeriodRow::new(" Aug'25 ", 310).with_value("a", 40)],
    };
    let mut state = MatrixState::new(dataset, MatrixOptions::default());
    state.toggle_row(" Aug'25 ");
    assert!(state.is_expanded(" Aug'25 "));
    assert!(state.expanded_series().is_none());
    assert!(state.chart_model().is_none());
}
