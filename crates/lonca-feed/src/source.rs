//! Where the feed document comes from, and how to fetch it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::FeedError;

/// A feed location: a local file or an HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Http(String),
}

impl FeedSource {
    /// Interprets `raw` as an `http(s)://` URL, a `file://` URL, or a plain
    /// filesystem path, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidSource`] if `raw` is blank, is an
    /// unparseable URL, or is a `file://` URL that does not name a local path.
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid(raw, "source is empty"));
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(raw, &e.to_string()))?;
            return Ok(Self::Http(url.to_string()));
        }
        if lower.starts_with("file://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(raw, &e.to_string()))?;
            let path = url
                .to_file_path()
                .map_err(|()| invalid(raw, "file URL does not name a local path"))?;
            return Ok(Self::File(path));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Http(url) => f.write_str(url),
        }
    }
}

fn invalid(raw: &str, reason: &str) -> FeedError {
    FeedError::InvalidSource {
        source_ref: raw.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Fetches the raw feed document.
///
/// 404 and other non-2xx responses are returned as typed errors; the body is
/// read as text and handed to [`crate::parse_feed`] by the caller.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Returns the feed document named by `source`.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Io`] if a file source cannot be read.
    /// - [`FeedError::NotFound`] on HTTP 404.
    /// - [`FeedError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`FeedError::Http`] on network or TLS failure.
    pub async fn fetch(&self, source: &FeedSource) -> Result<String, FeedError> {
        match source {
            FeedSource::File(path) => {
                tracing::debug!(path = %path.display(), "reading feed file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FeedError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            FeedSource::Http(url) => self.fetch_url(url).await,
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, FeedError> {
        tracing::debug!(url, "requesting feed");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/xml,text/xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FeedError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, bytes = body.len(), "feed downloaded");
        Ok(body)
    }
}
