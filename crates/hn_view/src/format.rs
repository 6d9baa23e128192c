use chrono::{Duration, NaiveDate};
use hn_core::ReportSummary;

pub const TODAY: &str = "今天";
pub const YESTERDAY: &str = "昨天";

/// `999` stays `999`, `1000` becomes `1.0k`.
pub fn format_points(points: u64) -> String {
    if points >= 1000 {
        format!("{:.1}k", points as f64 / 1000.0)
    } else {
        points.to_string()
    }
}

/// Cut titles longer than `max_len` characters down to `max_len - 3` plus `...`.
pub fn truncate_title(title: Option<&str>, max_len: usize) -> String {
    let Some(title) = title else {
        return String::new();
    };
    if title.chars().count() <= max_len {
        return title.to_string();
    }
    let mut out: String = title.chars().take(max_len.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Card date label relative to `today`.
pub fn format_date(report: &ReportSummary, today: NaiveDate) -> String {
    match report.local_date() {
        Some(date) => format_day(date, today),
        None => report.date.clone(),
    }
}

pub fn format_day(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        TODAY.to_string()
    } else if date == today - Duration::days(1) {
        YESTERDAY.to_string()
    } else {
        date.format("%-m/%-d").to_string()
    }
}
