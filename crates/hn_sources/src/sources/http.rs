use async_trait::async_trait;
use hn_core::{Error, FetchError, ReportSource, Result};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Reports fetched from a static host.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
    index_path: String,
}

impl HttpSource {
    pub fn new(base: &str, index_path: &str) -> Result<Self> {
        Self::with_client(Client::new(), base, index_path)
    }

    pub fn with_client(client: Client, base: &str, index_path: &str) -> Result<Self> {
        let mut base = Url::parse(base)?;
        // A base without a file name is a directory.
        let is_file = base
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(|last| last.contains('.'))
            .unwrap_or(false);
        if !is_file && !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base,
            index_path: index_path.to_string(),
        })
    }

    /// Resolve `path` against the base URL, staying on the same origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidPath("empty path".to_string()));
        }
        let url = self.base.join(trimmed)?;
        if url.origin() != self.base.origin() {
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(url)
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    fn index_path(&self) -> &str {
        &self.index_path
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.resolve(path)?;
        let start = std::time::Instant::now();
        debug!("Fetching {}", url);

        let transport = |e: reqwest::Error| FetchError::Transport {
            resource: path.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!("Fetch failed - url={}, status={}", url, status.as_u16());
            return Err(FetchError::Status {
                status: status.as_u16(),
                resource: path.to_string(),
            }
            .into());
        }

        let body = response.text().await.map_err(transport)?;
        debug!(
            "Fetch completed - url={}, bytes={}, duration={:.2}s",
            url,
            body.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a fixed set of paths, one connection at a time.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(p, _, _)| *p == path)
                    .map(|(_, s, b)| (*s, *b))
                    .unwrap_or((404, "not found"));
                let response = format!(
                    "HTTP/1.1 {} X\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}/insights", addr)
    }

    #[test]
    fn test_resolve() {
        let source = HttpSource::new("https://example.com/insights", "reports.json").unwrap();
        assert_eq!(
            source.resolve("reports/a.md").unwrap().as_str(),
            "https://example.com/insights/reports/a.md"
        );
        assert_eq!(
            source.resolve("/other.md").unwrap().as_str(),
            "https://example.com/other.md"
        );
        assert!(matches!(
            source.resolve("https://evil.example/x.md"),
            Err(Error::InvalidPath(_))
        ));

        let page = HttpSource::new("https://example.com/insights/index.html", "reports.json").unwrap();
        assert_eq!(
            page.resolve("reports.json").unwrap().as_str(),
            "https://example.com/insights/reports.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_index_and_report() {
        let base = serve(vec![
            (
                "/insights/reports.json",
                200,
                r#"[{"date": "2024-01-01", "time": "08:00", "file": "reports/a.md", "articles": []}]"#,
            ),
            ("/insights/reports/a.md", 200, "# Daily"),
        ])
        .await;
        let source = HttpSource::new(&base, "reports.json").unwrap();

        let reports = source.fetch_index().await.unwrap();
        assert_eq!(reports[0].file, "reports/a.md");

        let text = source.fetch_report("reports/a.md").await.unwrap();
        assert_eq!(text, "# Daily");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let base = serve(vec![]).await;
        let source = HttpSource::new(&base, "reports.json").unwrap();

        let err = source.fetch_report("reports/missing.md").await.unwrap_err();
        match err {
            Error::Fetch(FetchError::Status { status, resource }) => {
                assert_eq!(status, 404);
                assert_eq!(resource, "reports/missing.md");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpSource::new(&format!("http://{}/", addr), "reports.json").unwrap();
        let err = source.fetch_index().await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Transport { .. })));
    }
}
