use std::sync::Arc;

use hn_core::{ReportSource, Result, ViewerConfig};
use hn_view::{CmarkConverter, IndexLoader, ReportViewer, SyntectHighlighter};

pub struct AppState {
    pub index: IndexLoader,
    pub viewer: ReportViewer,
    pub config: Arc<ViewerConfig>,
    pub highlight_css: String,
}

impl AppState {
    pub fn new(source: Arc<dyn ReportSource>, config: ViewerConfig) -> Result<Self> {
        let config = Arc::new(config);
        let highlight_css = SyntectHighlighter::stylesheet(&config.highlight_theme)?;
        let converter = Arc::new(CmarkConverter::new(Arc::new(SyntectHighlighter::new())));
        Ok(Self {
            index: IndexLoader::new(source.clone(), config.clone()),
            viewer: ReportViewer::new(source, converter, config.clone()),
            config,
            highlight_css,
        })
    }
}
