//! Formatting helpers for log output.

use bill_types::RATE_SCALE;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format a 1e8-scaled rate as a percentage with four decimals.
pub fn format_rate(scaled: i64) -> String {
    let basis = scaled as i128 * 100 * 10_000 / RATE_SCALE as i128;
    let sign = if basis < 0 { "-" } else { "" };
    let basis = basis.abs();
    format!("{}{}.{:04}%", sign, basis / 10_000, basis % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pick_the_largest_unit() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(3_661), "1h 1m");
        assert_eq!(format_duration(30 * 86_400 + 7_200), "30d 2h");
    }

    #[test]
    fn rates_render_as_percentages() {
        assert_eq!(format_rate(1_000_000), "1.0000%");
        assert_eq!(format_rate(10_000), "0.0100%");
        assert_eq!(format_rate(-50_000_000), "-50.0000%");
    }
}
