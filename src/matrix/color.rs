//! Value-to-bracket mapping for matrix cells.

use crate::models::PeriodRow;

/// Lower ratio bound of the medium bracket.
pub const MEDIUM_THRESHOLD: f64 = 0.33;
/// Lower ratio bound of the dark bracket.
pub const DARK_THRESHOLD: f64 = 0.66;

/// Global min/max of every non-zero count in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: u64,
    pub max: u64,
}

impl ValueRange {
    /// Scan subscriber and competitor counts of all rows. `None` when every
    /// count is zero (or there are no rows).
    pub fn from_rows(rows: &[PeriodRow]) -> Option<Self> {
        rows.iter()
            .flat_map(PeriodRow::all_values)
            .filter(|v| *v > 0)
            .fold(None, |acc, v| match acc {
                None => Some(ValueRange { min: v, max: v }),
                Some(r) => Some(ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Categorical color bracket of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// Value is zero: "no activity"
    Empty,
    /// Every non-zero value in the dataset is identical
    Uniform,
    Light,
    Medium,
    Dark,
}

/// Text color paired with a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextTone {
    Normal,
    /// High-contrast text, used on the dark bracket only
    Contrast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub bracket: Bracket,
    pub text: TextTone,
}

impl CellStyle {
    const fn normal(bracket: Bracket) -> Self {
        CellStyle {
            bracket,
            text: TextTone::Normal,
        }
    }
}

/// Classify a cell value against the dataset range.
///
/// Zero is always [`Bracket::Empty`], whatever the range. Values outside the
/// range are clamped into it.
pub fn classify(value: u64, range: Option<ValueRange>) -> CellStyle {
    if value == 0 {
        return CellStyle::normal(Bracket::Empty);
    }
    let range = match range {
        Some(r) => r,
        None => return CellStyle::normal(Bracket::Uniform),
    };
    if range.is_degenerate() {
        return CellStyle::normal(Bracket::Uniform);
    }

    let span = (range.max - range.min) as f64;
    let ratio = (value.saturating_sub(range.min) as f64 / span).clamp(0.0, 1.0);
    if ratio < MEDIUM_THRESHOLD {
        CellStyle::normal(Bracket::Light)
    } else if ratio < DARK_THRESHOLD {
        CellStyle::normal(Bracket::Medium)
    } else {
        CellStyle {
            bracket: Bracket::Dark,
            text: TextTone::Contrast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: u64, max: u64) -> Option<ValueRange> {
        Some(ValueRange { min, max })
    }

    #[test]
    fn test_zero_is_empty() {
        assert_eq!(classify(0, range(1, 10)).bracket, Bracket::Empty);
        assert_eq!(classify(0, None).bracket, Bracket::Empty);
    }

    #[test]
    fn test_brackets_split_at_thresholds() {
        // span 100: ratio == value - 100 / 100
        assert_eq!(classify(100, range(100, 200)).bracket, Bracket::Light);
        assert_eq!(classify(132, range(100, 200)).bracket, Bracket::Light);
        assert_eq!(classify(133, range(100, 200)).bracket, Bracket::Medium);
        assert_eq!(classify(165, range(100, 200)).bracket, Bracket::Medium);
        assert_eq!(classify(166, range(100, 200)).bracket, Bracket::Dark);
        assert_eq!(classify(200, range(100, 200)).bracket, Bracket::Dark);
    }

    #[test]
    fn test_only_dark_flips_text() {
        assert_eq!(classify(200, range(100, 200)).text, TextTone::Contrast);
        assert_eq!(classify(150, range(100, 200)).text, TextTone::Normal);
        assert_eq!(classify(100, range(100, 200)).text, TextTone::Normal);
    }

    #[test]
    fn test_degenerate_range_is_uniform() {
        assert_eq!(classify(500, range(500, 500)).bracket, Bracket::Uniform);
    }

    #[test]
    fn test_range_ignores_zeroes() {
        let rows = vec![
            PeriodRow::new("Jan'25", 0).with_value("a", 40),
            PeriodRow::new("Feb'25", 12).with_value("a", 0),
        ];
        assert_eq!(ValueRange::from_rows(&rows), range(12, 40));
        assert_eq!(ValueRange::from_rows(&[PeriodRow::new("Mar'25", 0)]), None);
    }
}
