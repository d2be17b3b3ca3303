//! Number formatting for cells, axis ticks and tooltips.

/// Abbreviate a magnitude with `K`, `M` or `B`, one decimal, trailing `.0`
/// dropped: `1_260_000.0 -> "1.3M"`, `2_000.0 -> "2K"`, `950.0 -> "950"`.
///
/// The unit is chosen after rounding, so `999_950.0` reads `"1M"` rather
/// than `"1000K"`.
pub fn abbreviate(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let mut unit = UNITS.iter().rposition(|(scale, _)| magnitude >= *scale).unwrap_or(0);
    let mut tenths = (magnitude * 10.0 / UNITS[unit].0).round();
    while tenths >= 10_000.0 && unit + 1 < UNITS.len() {
        unit += 1;
        tenths = (magnitude * 10.0 / UNITS[unit].0).round();
    }
    format!("{}{}{}", sign, format_tenths(tenths), UNITS[unit].1)
}

/// Currency rendering for rates: whole amounts below ten thousand, then the
/// abbreviated form.
pub fn currency(value: f64) -> String {
    if value.abs() < 10_000.0 {
        format!("${:.0}", value)
    } else {
        format!("${}", abbreviate(value))
    }
}

/// Thousands-separated integer for matrix cells.
pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `126.0 -> "12.6"`, `130.0 -> "13"`.
fn format_tenths(tenths: f64) -> String {
    let whole = (tenths / 10.0).trunc();
    let fraction = (tenths - whole * 10.0) as u64;
    if fraction == 0 {
        format!("{:.0}", whole)
    } else {
        format!("{:.0}.{}", whole, fraction)
    }
}
