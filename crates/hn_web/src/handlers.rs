use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use chrono::Local;
use hn_view::templates::{index_document, report_document};
use hn_view::view::IndexBody;
use hn_view::QueryLinks;
use serde::Deserialize;
use std::sync::Arc;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub page: Option<String>,
}

impl IndexQuery {
    /// Unparseable page numbers fall back to the first page.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub file: Option<String>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IndexQuery>,
) -> impl IntoResponse {
    let today = Local::now().date_naive();
    let page = state
        .index
        .load_page(query.page(), today, &QueryLinks)
        .await;
    let status = match page.body {
        IndexBody::Failed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Html(index_document(&page, &state.config)))
}

pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let detail = state.viewer.load(query.file.as_deref()).await;
    let status = StatusCode::from_u16(detail.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Html(report_document(&detail, &state.config, &state.highlight_css)),
    )
}

pub async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_app;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hn_core::ViewerConfig;
    use hn_sources::FsSource;
    use tower::ServiceExt;

    const INDEX: &str = r#"[
        {"date": "2024-01-02", "time": "08:00", "summary": "Second", "file": "reports/2024-01-02.md",
         "articles": [{"title": "Agents", "url": "https://example.com/a", "points": 1500, "comments": 3}]},
        {"date": "2024-01-01", "time": "08:00", "file": "reports/2024-01-01.md"},
        {"date": "2023-12-31", "file": "reports/2023-12-31.md"}
    ]"#;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("reports")).unwrap();
        std::fs::write(dir.path().join("reports.json"), INDEX).unwrap();
        std::fs::write(
            dir.path().join("reports/2024-01-02.md"),
            "# Daily\n\n**来源:** Hacker News\n\n### 1. Agents\n**HN ID:** 99\n",
        )
        .unwrap();
        dir
    }

    fn app(dir: &tempfile::TempDir, page_size: usize) -> axum::Router {
        let config = ViewerConfig {
            page_size,
            ..Default::default()
        };
        let source = Arc::new(FsSource::new(dir.path(), "reports.json"));
        create_app(AppState::new(source, config).unwrap())
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_pages() {
        let dir = fixture();

        let (status, body) = get(app(&dir, 2), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Second"));
        assert!(body.contains("report.html?file=reports%2F2024-01-02.md"));
        assert!(body.contains("index.html?page=2"));

        let (status, body) = get(app(&dir, 2), "/index.html?page=2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("reports%2F2023-12-31.md"));
        assert!(!body.contains("Second"));

        let (status, body) = get(app(&dir, 2), "/index.html?page=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Second"));
    }

    #[tokio::test]
    async fn test_index_failure_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = get(app(&dir, 10), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("加载失败"));
    }

    #[tokio::test]
    async fn test_report_statuses() {
        let dir = fixture();

        let (status, body) = get(app(&dir, 10), "/report.html?file=reports%2F2024-01-02.md").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("https://news.ycombinator.com/item?id=99"));
        assert!(body.contains("hl-"));

        let (status, _) = get(app(&dir, 10), "/report.html").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(app(&dir, 10), "/report.html?file=reports%2Fnope.md").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_health() {
        let dir = fixture();
        let (status, body) = get(app(&dir, 10), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
