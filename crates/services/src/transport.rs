use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use url::Url;

use crate::error::FetchError;

/// Fetches the raw body of a pack resource.
#[async_trait]
pub trait PackTransport: Send + Sync {
    /// GET `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure, a non-success status or an
    /// unreadable file.
    async fn get_text(&self, url: &Url) -> Result<String, FetchError>;
}

/// `http(s)` through `reqwest`, `file` straight from disk.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn get_http(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.text().await?)
    }

    async fn get_file(url: &Url) -> Result<String, FetchError> {
        let path = url.to_file_path().map_err(|()| FetchError::InvalidUrl {
            raw: url.to_string(),
            reason: "not a local file path".to_string(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

#[async_trait]
impl PackTransport for HttpTransport {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        match url.scheme() {
            "http" | "https" => self.get_http(url).await,
            "file" => Self::get_file(url).await,
            other => Err(FetchError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }
}
