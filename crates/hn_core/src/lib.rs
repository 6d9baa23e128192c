pub mod config;
pub mod error;
pub mod render;
pub mod source;
pub mod types;

pub use config::ViewerConfig;
pub use error::{Error, FetchError};
pub use render::{Highlighter, MarkdownConverter};
pub use source::ReportSource;
pub use types::{ArticleSummary, ReportSummary};

pub type Result<T> = std::result::Result<T, Error>;
