pub mod sources;

pub use sources::fs::FsSource;
pub use sources::http::HttpSource;
pub use sources::create_source;

pub mod prelude {
    pub use super::sources::create_source;
    pub use hn_core::{Error, ReportSource, Result};
}
