//! Static export: every index page and every report as plain HTML files.

use std::path::Path;

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use hn_core::{Error, Result};
use hn_view::templates::{index_document, report_document};
use hn_view::{DetailState, StaticLinks};
use hn_web::AppState;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub reports: usize,
    pub failed: usize,
}

/// Write the site into `out`. Only an index failure aborts the build.
pub async fn build_site(
    state: &AppState,
    out: &Path,
    jobs: usize,
    today: NaiveDate,
) -> Result<BuildSummary> {
    tokio::fs::create_dir_all(out).await?;
    let mut index = state.index.load().await?;
    let mut summary = BuildSummary::default();
    let links = StaticLinks::new(index.reports().iter().map(|report| report.file.as_str()));

    let total_pages = index.pagination().total_pages().max(1);
    for page in 1..=total_pages {
        let view = index.render_page(page, today, &links, &state.config);
        let path = out.join(StaticLinks::index_file_name(page));
        tokio::fs::write(&path, index_document(&view, &state.config)).await?;
        summary.pages += 1;
    }
    info!("📑 Wrote {} index pages", summary.pages);

    let results: Vec<Result<bool>> = stream::iter(links.reports())
        .map(|(file, name)| async move {
            let detail = state.viewer.load(Some(file)).await;
            let html = report_document(&detail, &state.config, &state.highlight_css);
            tokio::fs::write(out.join(name), html).await?;
            if let DetailState::Failed { message, .. } = &detail {
                warn!("Report {} exported as an error page: {}", file, message);
                return Ok(false);
            }
            Ok::<bool, Error>(true)
        })
        .buffer_unordered(jobs.max(1))
        .collect()
        .await;

    for result in results {
        summary.reports += 1;
        if !result? {
            summary.failed += 1;
        }
    }
    info!(
        "✨ Exported {} reports to {} ({} failed)",
        summary.reports,
        out.display(),
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_core::ViewerConfig;
    use hn_sources::FsSource;
    use std::sync::Arc;

    fn state(dir: &Path, page_size: usize) -> AppState {
        let config = ViewerConfig {
            page_size,
            ..Default::default()
        };
        AppState::new(Arc::new(FsSource::new(dir, "reports.json")), config).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
    }

    #[tokio::test]
    async fn test_build_writes_pages_and_reports() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir(src.path().join("reports")).unwrap();
        std::fs::write(
            src.path().join("reports.json"),
            r#"[{"date": "2024-01-02", "file": "reports/a.md"},
                {"date": "2024-01-01", "file": "reports/b.md"},
                {"date": "2023-12-31", "file": "reports/missing.md"}]"#,
        )
        .unwrap();
        std::fs::write(src.path().join("reports/a.md"), "# A\n\nbody").unwrap();
        std::fs::write(src.path().join("reports/b.md"), "# B\n\nbody").unwrap();

        let summary = build_site(&state(src.path(), 2), out.path(), 2, today())
            .await
            .unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                pages: 2,
                reports: 3,
                failed: 1
            }
        );

        let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("report-reports_a.html"));
        assert!(index.contains("page-2.html"));
        assert!(out.path().join("page-2.html").exists());

        let missing =
            std::fs::read_to_string(out.path().join("report-reports_missing.html")).unwrap();
        assert!(missing.contains("HTTP 404"));
        let a = std::fs::read_to_string(out.path().join("report-reports_a.html")).unwrap();
        assert!(a.contains("<h1"));
    }

    #[tokio::test]
    async fn test_build_keeps_reports_with_colliding_names() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir(src.path().join("reports")).unwrap();
        std::fs::write(
            src.path().join("reports.json"),
            r#"[{"date": "2024-01-02", "file": "reports/a.md"},
                {"date": "2024-01-01", "file": "reports_a.md"}]"#,
        )
        .unwrap();
        std::fs::write(src.path().join("reports/a.md"), "# First report").unwrap();
        std::fs::write(src.path().join("reports_a.md"), "# Second report").unwrap();

        let summary = build_site(&state(src.path(), 10), out.path(), 4, today())
            .await
            .unwrap();
        assert_eq!(summary.reports, 2);
        assert_eq!(summary.failed, 0);

        let first = std::fs::read_to_string(out.path().join("report-reports_a.html")).unwrap();
        let second = std::fs::read_to_string(out.path().join("report-reports_a-2.html")).unwrap();
        assert!(first.contains("First report"));
        assert!(second.contains("Second report"));

        let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("href=\"report-reports_a.html\""));
        assert!(index.contains("href=\"report-reports_a-2.html\""));
    }

    #[tokio::test]
    async fn test_build_fails_without_index() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        assert!(build_site(&state(src.path(), 10), out.path(), 4, today())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_build_empty_index() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("reports.json"), "[]").unwrap();
        let summary = build_site(&state(src.path(), 10), out.path(), 4, today())
            .await
            .unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.reports, 0);
        let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("暂无报告"));
    }
}
