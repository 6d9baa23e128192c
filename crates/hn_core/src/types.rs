use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of `reports.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub file: String,
    #[serde(default)]
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hn_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub points: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: Option<u64>,
}

/// Accepts any JSON number (or numeric string), truncated toward zero.
/// Negative, non-finite and non-numeric values count as missing.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let as_count = |f: f64| (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64);
    Ok(value.and_then(|value| match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(as_count)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(as_count),
        _ => None,
    }))
}

impl ReportSummary {
    /// Calendar day of the report in local time.
    ///
    /// Accepts RFC 3339 timestamps and anything starting with `YYYY-MM-DD`.
    pub fn local_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Local).date_naive());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl ArticleSummary {
    /// Link target: the article itself, then its discussion thread.
    pub fn href(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.hn_url.as_deref().filter(|u| !u.is_empty()))
    }

    pub fn points(&self) -> u64 {
        self.points.unwrap_or(0)
    }

    pub fn comments(&self) -> u64 {
        self.comments.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_index_entry() {
        let json = r#"[{
            "date": "2024-01-01",
            "time": "08:00",
            "summary": "AI agents everywhere",
            "file": "reports/2024-01-01.md",
            "articles": [
                {"title": "Show HN", "url": "https://example.com", "hnUrl": "https://news.ycombinator.com/item?id=1", "points": 1200, "comments": 30},
                {"title": "Ask HN", "hnUrl": "https://news.ycombinator.com/item?id=2", "points": null}
            ]
        }]"#;
        let reports: Vec<ReportSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.file, "reports/2024-01-01.md");
        assert_eq!(report.articles[0].href(), Some("https://example.com"));
        assert_eq!(report.articles[1].href(), Some("https://news.ycombinator.com/item?id=2"));
        assert_eq!(report.articles[1].points(), 0);
        assert_eq!(report.articles[1].comments(), 0);
    }

    #[test]
    fn test_non_integer_counts_do_not_reject_index() {
        let json = r#"[{"date": "2024-01-01", "file": "a.md", "articles": [
            {"title": "a", "points": 12.0, "comments": 3.7},
            {"title": "b", "points": -5, "comments": "42"},
            {"title": "c", "points": "lots", "comments": true},
            {"title": "d", "points": 1500}
        ]}]"#;
        let reports: Vec<ReportSummary> = serde_json::from_str(json).unwrap();
        let articles = &reports[0].articles;
        assert_eq!(articles.len(), 4);
        assert_eq!((articles[0].points(), articles[0].comments()), (12, 3));
        assert_eq!((articles[1].points(), articles[1].comments()), (0, 42));
        assert_eq!((articles[2].points(), articles[2].comments()), (0, 0));
        assert_eq!(articles[3].points(), 1500);
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"{"date": "2024-02-03", "file": "a.md"}"#;
        let report: ReportSummary = serde_json::from_str(json).unwrap();
        assert!(report.time.is_empty());
        assert!(report.articles.is_empty());
        assert_eq!(report.summary_text(), None);
    }

    #[test]
    fn test_local_date() {
        let mut report = ReportSummary {
            date: "2024-03-05".to_string(),
            time: String::new(),
            summary: Some("  ".to_string()),
            file: "x.md".to_string(),
            articles: vec![],
        };
        assert_eq!(report.local_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(report.summary_text(), None);

        report.date = "2024-03-05 10:00".to_string();
        assert_eq!(report.local_date(), NaiveDate::from_ymd_opt(2024, 3, 5));

        report.date = "yesterday-ish".to_string();
        assert_eq!(report.local_date(), None);
    }

    #[test]
    fn test_empty_url_falls_back() {
        let article = ArticleSummary {
            url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(article.href(), None);
    }
}
