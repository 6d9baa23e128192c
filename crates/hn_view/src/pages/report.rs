use std::borrow::Cow;
use std::sync::Arc;

use hn_core::{Error, MarkdownConverter, ReportSource, Result, ViewerConfig};
use tracing::{error, info, warn};

use crate::meta::{extract_meta_info, extract_title, DEFAULT_TITLE};
use crate::postprocess::post_process;
use crate::rewrite::{preprocess, RewriteOptions};
use crate::view::{DetailState, RenderedReport};

/// Lifecycle of one detail page. Only forward transitions are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    state: DetailState,
}

impl Default for ReportPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPage {
    pub fn new() -> Self {
        Self {
            state: DetailState::Idle,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn into_state(self) -> DetailState {
        self.state
    }

    pub fn start_loading(&mut self, file: &str) -> Result<()> {
        match self.state {
            DetailState::Idle => {
                self.state = DetailState::Loading {
                    file: file.to_string(),
                };
                Ok(())
            }
            _ => Err(self.invalid("start loading")),
        }
    }

    pub fn render(&mut self, report: RenderedReport) -> Result<()> {
        match self.state {
            DetailState::Loading { .. } => {
                self.state = DetailState::Rendered(report);
                Ok(())
            }
            _ => Err(self.invalid("render")),
        }
    }

    /// Fail from `Loading`, or straight from `Idle` when the file parameter is missing.
    pub fn fail(&mut self, err: &Error) -> Result<()> {
        let allowed = match self.state {
            DetailState::Loading { .. } => true,
            DetailState::Idle => matches!(err, Error::MissingParameter),
            _ => false,
        };
        if !allowed {
            return Err(self.invalid("fail"));
        }

        let (title, message) = match err {
            Error::MissingParameter => (
                "缺少报告文件参数".to_string(),
                "请从首页访问报告详情页".to_string(),
            ),
            other => ("加载失败".to_string(), other.to_string()),
        };
        self.state = DetailState::Failed {
            title,
            message,
            status: err.http_status(),
        };
        Ok(())
    }

    fn invalid(&self, action: &str) -> Error {
        Error::InvalidState(format!("cannot {} from {}", action, self.state_name()))
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            DetailState::Idle => "Idle",
            DetailState::Loading { .. } => "Loading",
            DetailState::Rendered(_) => "Rendered",
            DetailState::Failed { .. } => "Failed",
        }
    }
}

pub struct ReportViewer {
    source: Arc<dyn ReportSource>,
    converter: Arc<dyn MarkdownConverter>,
    config: Arc<ViewerConfig>,
}

impl ReportViewer {
    pub fn new(
        source: Arc<dyn ReportSource>,
        converter: Arc<dyn MarkdownConverter>,
        config: Arc<ViewerConfig>,
    ) -> Self {
        Self {
            source,
            converter,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Load and render the report named by `file`. Always ends in
    /// `Rendered` or `Failed`.
    pub async fn load(&self, file: Option<&str>) -> DetailState {
        let mut page = ReportPage::new();
        if let Err(e) = self.drive(&mut page, file).await {
            error!("Report page left in an unexpected state: {}", e);
        }
        page.into_state()
    }

    async fn drive(&self, page: &mut ReportPage, file: Option<&str>) -> Result<()> {
        let Some(file) = file.map(str::trim).filter(|f| !f.is_empty()) else {
            warn!("Report requested without a file parameter");
            return page.fail(&Error::MissingParameter);
        };

        page.start_loading(file)?;
        match self.source.fetch_report(file).await {
            Ok(markdown) => {
                info!("📄 Rendering report {} ({} bytes)", file, markdown.len());
                page.render(self.render_markdown(&markdown))
            }
            Err(e) => {
                error!("Failed to load report {}: {}", file, e);
                page.fail(&e)
            }
        }
    }

    /// Markdown to page content: rewrite, extract metadata, convert, post-process.
    pub fn render_markdown(&self, markdown: &str) -> RenderedReport {
        let source: Cow<'_, str> = if self.config.rewrite_links {
            let options = RewriteOptions {
                hn_item_url: self.config.hn_item_url.clone(),
            };
            Cow::Owned(preprocess(markdown, &options))
        } else {
            Cow::Borrowed(markdown)
        };

        let meta = extract_meta_info(&source);
        let body_html = post_process(&self.converter.to_html(&source));
        let title = extract_title(markdown).unwrap_or_else(|| DEFAULT_TITLE.to_string());

        RenderedReport {
            title,
            meta,
            body_html,
        }
    }
}
