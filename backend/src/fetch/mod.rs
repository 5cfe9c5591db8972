//! Retrieval of CSV sources from HTTP(S) URLs or local paths.
//!
//! Every HTTP request carries a timeout. A transient failure (timeout,
//! connection error, 5xx, 429) is retried exactly once after a short delay.
//! The result is a [`FetchOutcome`] rather than an error so that loaders can
//! decide for themselves how to degrade.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{FetchError, FetchResult};
use crate::logs::{log_info_indent, log_warning_indent};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Delay before the single retry
const RETRY_DELAY_MS: u64 = 1000;

/// Where a CSV comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are URLs, anything else a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<&str> for Source {
    fn from(location: &str) -> Self {
        Source::parse(location)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Result of fetching a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Raw bytes of the source
    Fetched(Vec<u8>),
    /// The source does not exist
    NotFound(String),
    /// The source could not be retrieved right now
    TransientError(String),
}

/// One HTTP attempt
enum Attempt {
    Done(FetchOutcome),
    Retryable(String),
}

/// HTTP/file fetcher with timeout and a single retry
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("faostat-harmonizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Override the delay before the retry
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub async fn fetch(&self, source: &Source) -> FetchOutcome {
        match source {
            Source::Path(path) => match tokio::fs::read(path).await {
                Ok(bytes) => FetchOutcome::Fetched(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    FetchOutcome::NotFound(format!("{}: {}", path.display(), e))
                }
                Err(e) => FetchOutcome::TransientError(format!("{}: {}", path.display(), e)),
            },
            Source::Url(url) => self.fetch_url(url).await,
        }
    }

    async fn fetch_url(&self, url: &str) -> FetchOutcome {
        log_info_indent(format!("GET {}", url), 1);

        match self.attempt(url).await {
            Attempt::Done(outcome) => outcome,
            Attempt::Retryable(reason) => {
                log_warning_indent(format!("Attempt 1/2 failed: {}", reason), 1);
                log_info_indent(format!("Retrying in {}ms...", self.retry_delay.as_millis()), 1);
                tokio::time::sleep(self.retry_delay).await;

                match self.attempt(url).await {
                    Attempt::Done(outcome) => outcome,
                    Attempt::Retryable(reason) => FetchOutcome::TransientError(reason),
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return Attempt::Retryable(e.to_string()),
        };

        let status = response.status();
        if let Some(attempt) = classify_status(status, url) {
            return attempt;
        }

        match response.bytes().await {
            Ok(bytes) => Attempt::Done(FetchOutcome::Fetched(bytes.to_vec())),
            Err(e) => Attempt::Retryable(e.to_string()),
        }
    }
}

/// `None` for success, otherwise how the failure should be handled.
fn classify_status(status: StatusCode, url: &str) -> Option<Attempt> {
    if status.is_success() {
        return None;
    }

    let reason = format!("{} returned HTTP {}", url, status);
    Some(match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Attempt::Done(FetchOutcome::NotFound(reason)),
        StatusCode::TOO_MANY_REQUESTS => Attempt::Retryable(reason),
        s if s.is_server_error() => Attempt::Retryable(reason),
        _ => Attempt::Done(FetchOutcome::TransientError(reason)),
    })
}
