//! Plain-text sweep report

use solvent_core::model::SweepSummary;

/// Format a dollar amount with thousands separators, e.g. `$1,234,567`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

/// Human-readable summary, one fact per line
pub fn format_summary(summary: &SweepSummary) -> String {
    [
        format!(
            "{:.1}% scenarios succeeded ({} of {})",
            100.0 * summary.success_rate,
            summary.succeeded,
            summary.iterations
        ),
        format!(
            "final value  p5: {}  p50: {}  p95: {}",
            format_currency(summary.final_value_p5),
            format_currency(summary.final_value_p50),
            format_currency(summary.final_value_p95)
        ),
        format!("mean tax paid: {}", format_currency(summary.mean_tax_paid)),
    ]
    .join("\n")
}
