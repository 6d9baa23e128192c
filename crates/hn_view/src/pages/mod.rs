//! Page loaders: fetch, build the view model, never fail past this boundary.

pub mod index;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use hn_core::{FetchError, ReportSource, Result};

    /// In-memory source that answers 404 for unknown paths.
    #[derive(Default)]
    pub struct MemorySource {
        files: HashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl MemorySource {
        pub fn with_file(mut self, path: &str, body: &str) -> Self {
            self.files.insert(path.to_string(), body.to_string());
            self
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportSource for MemorySource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn index_path(&self) -> &str {
            "reports.json"
        }

        async fn fetch_text(&self, path: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.files.get(path).cloned().ok_or_else(|| {
                FetchError::Status {
                    status: 404,
                    resource: path.to_string(),
                }
                .into()
            })
        }
    }
}
