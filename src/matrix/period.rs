//! `Mon'YY` period labels.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static PERIOD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)'(\d{2})$")
        .expect("Invalid period label regex")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month named by a period label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl PeriodMonth {
    /// Parse `Mon'YY` (e.g. `Aug'25`). Two-digit years are taken as 20YY.
    /// The label must match exactly; surrounding whitespace is rejected.
    pub fn parse(label: &str) -> Option<Self> {
        let caps = PERIOD_REGEX.captures(label)?;
        let name = caps.get(1)?.as_str();
        let yy: i32 = caps.get(2)?.as_str().parse().ok()?;
        let month = MONTHS.iter().position(|m| *m == name)? as u32 + 1;
        Some(PeriodMonth {
            year: 2000 + yy,
            month,
        })
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Calendar days in the month (leap years included).
    pub fn days_in_month(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match (self.first_day(), next) {
            (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
            _ => 0,
        }
    }

    /// Months elapsed since Jan 2000; feeds the series seed.
    pub fn month_index(&self) -> u32 {
        ((self.year - 2000).max(0) as u32) * 12 + self.month.saturating_sub(1)
    }

    /// Short weekday name of a day of this month ("Mon", "Tue", ...).
    pub fn weekday_name(&self, day: u32) -> Option<String> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).map(|d| d.weekday().to_string())
    }

    /// `Mon'YY` form. A month outside 1..=12 is rendered numerically
    /// (`M13'25`) instead of panicking.
    pub fn label(&self) -> String {
        let yy = self.year.rem_euclid(100);
        match self
            .month
            .checked_sub(1)
            .and_then(|i| MONTHS.get(i as usize))
        {
            Some(name) => format!("{}'{:02}", name, yy),
            None => format!("M{}'{:02}", self.month, yy),
        }
    }
}
