pub mod escape;
pub mod format;
pub mod highlight;
pub mod markdown;
pub mod meta;
pub mod pages;
pub mod pagination;
pub mod postprocess;
pub mod rewrite;
pub mod templates;
pub mod view;

pub use highlight::SyntectHighlighter;
pub use markdown::{CmarkConverter, CmarkOptions};
pub use pages::index::{IndexLoader, IndexState};
pub use pages::report::{ReportPage, ReportViewer};
pub use pagination::Pagination;
pub use view::{DetailState, IndexPage, Linker, QueryLinks, StaticLinks};

pub mod prelude {
    pub use super::{IndexLoader, ReportViewer, DetailState, IndexPage, Linker};
    pub use hn_core::{Error, Result, ViewerConfig};
}
