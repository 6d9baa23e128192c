use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use hn_core::{FetchError, ReportSource, Result};
use tracing::debug;

use super::utils;

/// Reports served from a local directory, laid out the way a static host
/// would serve them.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    index_path: String,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>, index_path: &str) -> Self {
        Self {
            root: root.into(),
            index_path: index_path.to_string(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ReportSource for FsSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn index_path(&self) -> &str {
        &self.index_path
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full = self.root.join(utils::relative_path(path)?);
        debug!("Reading {}", full.display());

        tokio::fs::read_to_string(&full).await.map_err(|e| {
            let resource = path.to_string();
            let err = match e.kind() {
                ErrorKind::NotFound => FetchError::Status { status: 404, resource },
                ErrorKind::PermissionDenied => FetchError::Status { status: 403, resource },
                ErrorKind::InvalidData => FetchError::Decode {
                    resource,
                    message: e.to_string(),
                },
                _ => FetchError::Transport {
                    resource,
                    message: e.to_string(),
                },
            };
            err.into()
        })
    }
}
