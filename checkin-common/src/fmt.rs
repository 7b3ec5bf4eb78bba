//! Display formatting helpers

use chrono::{DateTime, Utc};

/// Human-readable timestamp for certificates, emails, and the dashboard
/// (e.g. `August 26, 2026 02:15 PM`)
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y %I:%M %p").to_string()
}

/// Truncate long free text for list views, appending an ellipsis
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_len).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_date_with_month_name() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(format_date(ts), "March 7, 2025 02:05 PM");
    }

    #[test]
    fn truncates_only_when_over_limit() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate_text("a longer string", 8), "a longer...");
    }
}
