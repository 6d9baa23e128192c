use std::sync::Arc;

use chrono::NaiveDate;
use hn_core::{ReportSource, ReportSummary, Result, ViewerConfig};
use tracing::{debug, error, info};

use crate::format::{format_date, format_points, truncate_title};
use crate::pagination::Pagination;
use crate::view::{ArticleItem, IndexBody, IndexPage, Linker, PaginationView, ReportCard};

const DEFAULT_SUMMARY: &str = "查看完整分析报告";

/// Reports and pagination for one index page instance.
#[derive(Debug, Clone)]
pub struct IndexState {
    reports: Vec<ReportSummary>,
    pagination: Pagination,
}

impl IndexState {
    pub fn new(reports: Vec<ReportSummary>, page_size: usize) -> Self {
        let pagination = Pagination::new(reports.len(), page_size);
        Self { reports, pagination }
    }

    pub fn reports(&self) -> &[ReportSummary] {
        &self.reports
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// `date time` of the newest report, which is the first entry.
    pub fn last_update(&self) -> Option<String> {
        self.reports
            .first()
            .map(|latest| format!("{} {}", latest.date, latest.time).trim().to_string())
    }

    /// Select `page` (clamped) and build its view.
    pub fn render_page(
        &mut self,
        page: usize,
        today: NaiveDate,
        linker: &dyn Linker,
        config: &ViewerConfig,
    ) -> IndexPage {
        if self.reports.is_empty() {
            return IndexPage {
                last_update: None,
                body: IndexBody::Empty,
            };
        }

        let current = self.pagination.go_to(page);
        debug!(
            "Rendering index page {}/{}",
            current,
            self.pagination.total_pages()
        );

        let cards = self
            .pagination
            .slice(&self.reports)
            .iter()
            .map(|report| build_card(report, today, linker, config))
            .collect();
        let pagination = self
            .pagination
            .controls()
            .map(|controls| PaginationView::new(&controls, linker));

        IndexPage {
            last_update: self.last_update(),
            body: IndexBody::Cards {
                cards,
                pagination,
                scroll_to_top: current > 1,
            },
        }
    }
}

pub fn build_card(
    report: &ReportSummary,
    today: NaiveDate,
    linker: &dyn Linker,
    config: &ViewerConfig,
) -> ReportCard {
    let articles = report
        .articles
        .iter()
        .take(config.article_preview)
        .map(|article| ArticleItem {
            title: truncate_title(article.title.as_deref(), config.title_limit),
            full_title: article.title.clone().unwrap_or_default(),
            href: article.href().unwrap_or("#").to_string(),
            points: format_points(article.points()),
            comments: article.comments(),
        })
        .collect();

    ReportCard {
        date_label: format_date(report, today),
        time: report.time.clone(),
        summary: report.summary_text().unwrap_or(DEFAULT_SUMMARY).to_string(),
        articles,
        remaining: report.articles.len().saturating_sub(config.article_preview),
        report_href: linker.report(&report.file),
    }
}

pub struct IndexLoader {
    source: Arc<dyn ReportSource>,
    config: Arc<ViewerConfig>,
}

impl IndexLoader {
    pub fn new(source: Arc<dyn ReportSource>, config: Arc<ViewerConfig>) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Fetch the index and set up page 1.
    pub async fn load(&self) -> Result<IndexState> {
        let reports = self.source.fetch_index().await?;
        info!(
            "📰 Loaded {} reports from {}",
            reports.len(),
            self.source.describe()
        );
        Ok(IndexState::new(reports, self.config.page_size))
    }

    /// Fetch the index and render `page`. Failures become an error view.
    pub async fn load_page(&self, page: usize, today: NaiveDate, linker: &dyn Linker) -> IndexPage {
        match self.load().await {
            Ok(mut state) => state.render_page(page, today, linker, &self.config),
            Err(e) => {
                error!("Failed to load report index: {}", e);
                IndexPage::failed(e.to_string())
            }
        }
    }
}
