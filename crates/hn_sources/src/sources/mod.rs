use std::sync::Arc;

use hn_core::{ReportSource, Result};
use tracing::info;

pub mod fs;
pub mod http;

use fs::FsSource;
use http::HttpSource;

/// Pick a source from a location string: `http(s)://` URLs are fetched over
/// HTTP, anything else is a local directory.
pub fn create_source(location: &str, index_path: &str) -> Result<Arc<dyn ReportSource>> {
    let source: Arc<dyn ReportSource> = if utils::is_http(location) {
        Arc::new(HttpSource::new(location, index_path)?)
    } else {
        Arc::new(FsSource::new(location, index_path))
    };
    info!("📂 Report source: {}", source.describe());
    Ok(source)
}

pub(crate) mod utils {
    use std::path::{Component, Path, PathBuf};

    use hn_core::{Error, Result};

    pub fn is_http(location: &str) -> bool {
        let lower = location.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// Strips a leading `./` and rejects paths that could leave the source root.
    pub fn relative_path(path: &str) -> Result<PathBuf> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidPath("empty path".to_string()));
        }
        let mut out = PathBuf::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => out.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::InvalidPath(path.to_string()));
                }
            }
        }
        if out.as_os_str().is_empty() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(out)
    }
}
