//! Sequential download loop.
//!
//! The loop scrapes the index page once, then works through the link list
//! front to back, one download at a time:
//!
//! 1. Attempt the first URL in the list
//! 2. On success, pop it; on failure, ask the [`RetryPolicy`] whether the
//!    same URL gets another attempt (the default always says yes)
//! 3. After every attempt, successful or not, wait per [`Pacing`]
//! 4. Stop when the list is empty
//!
//! A failure while fetching the index page ends the run before any
//! download starts.
//!
//! # Example
//!
//! ```no_run
//! use gallery_grab::download::{DownloadLoop, HttpClient, LoopConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let download_loop = DownloadLoop::new(LoopConfig::default());
//! let stats = download_loop
//!     .run(&client, "https://example.com/blog/entry-1.html", std::io::stdout())
//!     .await?;
//! println!("Completed: {}", stats.completed());
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use super::constants::DEFAULT_OUTPUT_DIR;
use super::pacing::Pacing;
use super::retry::{RetryDecision, RetryPolicy};
use super::{DownloadError, HttpClient};
use crate::output::Progress;
use crate::scrape::{self, LinkExtractor, SelectorExtractor};

/// Settings for a [`DownloadLoop`].
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Pause after every attempt.
    pub pacing: Pacing,
    /// How many attempts each URL gets.
    pub retry_policy: RetryPolicy,
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            retry_policy: RetryPolicy::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Counters from one run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    completed: usize,
    retried: usize,
    abandoned: usize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successful downloads.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Returns the number of failed attempts that were followed by a retry.
    #[must_use]
    pub fn retried(&self) -> usize {
        self.retried
    }

    /// Returns the number of URLs given up on (bounded retry policy only).
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.abandoned
    }

    /// Returns the number of failed attempts.
    #[must_use]
    pub fn failed_attempts(&self) -> usize {
        self.retried + self.abandoned
    }

    /// Returns the total number of download attempts.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.completed + self.failed_attempts()
    }
}

/// Drives scraping and downloading for one index page.
#[derive(Debug)]
pub struct DownloadLoop {
    config: LoopConfig,
    extractor: Box<dyn LinkExtractor>,
}

impl DownloadLoop {
    /// Creates a loop that extracts links with the gallery selector.
    #[must_use]
    pub fn new(config: LoopConfig) -> Self {
        Self::with_extractor(config, Box::new(SelectorExtractor::gallery()))
    }

    /// Creates a loop with a custom link extractor.
    #[must_use]
    pub fn with_extractor(config: LoopConfig, extractor: Box<dyn LinkExtractor>) -> Self {
        debug!(
            interval_secs = config.pacing.interval_secs(),
            max_attempts = ?config.retry_policy.max_attempts(),
            output_dir = %config.output_dir.display(),
            ?extractor,
            "creating download loop"
        );
        Self { config, extractor }
    }

    /// Scrapes `index_url` and downloads every link found on it.
    ///
    /// Progress lines are written to `out`.
    ///
    /// # Errors
    ///
    /// Returns the error from fetching the index page; it has already been
    /// written to `out`. Per-item download failures never surface here.
    #[instrument(skip(self, client, out))]
    pub async fn run<W: Write>(
        &self,
        client: &HttpClient,
        index_url: &str,
        out: W,
    ) -> Result<DownloadStats, DownloadError> {
        let mut progress = Progress::new(out);

        progress.partial(format_args!("Scraping {index_url}..."));
        let urls = match scrape::fetch_link_list(client, index_url, &*self.extractor).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, "failed to fetch link list");
                progress.line(&e);
                return Err(e);
            }
        };
        progress.line("done");
        progress.line(format_args!("Found {} images.", urls.len()));

        Ok(self.download_list(client, urls, &mut progress).await)
    }

    /// Downloads every URL in `urls`, in order.
    ///
    /// Returns once the list is empty. With the default unlimited retry
    /// policy a URL that never succeeds keeps this from returning.
    pub async fn download_all<W: Write>(
        &self,
        client: &HttpClient,
        urls: Vec<String>,
        out: W,
    ) -> DownloadStats {
        let mut progress = Progress::new(out);
        self.download_list(client, urls, &mut progress).await
    }

    async fn download_list<W: Write>(
        &self,
        client: &HttpClient,
        urls: Vec<String>,
        progress: &mut Progress<W>,
    ) -> DownloadStats {
        let mut remaining: VecDeque<String> = urls.into();
        let mut stats = DownloadStats::new();
        let mut attempt = 0u32;

        info!(count = remaining.len(), "starting downloads");

        while let Some(url) = remaining.front().cloned() {
            attempt = attempt.saturating_add(1);
            debug!(url = %url, attempt, remaining = remaining.len(), "attempting download");
            progress.partial(format_args!("Downloading {url}..."));

            match client.download_to_file(&url, &self.config.output_dir).await {
                Ok(file) => {
                    progress.line("done");
                    info!(url = %url, path = %file.path.display(), attempt, "download completed");
                    stats.completed += 1;
                    remaining.pop_front();
                    attempt = 0;
                }
                Err(e) => {
                    progress.line(&e);
                    warn!(url = %url, attempt, kind = %e.kind(), error = %e, "download failed");
                    match self.config.retry_policy.should_retry(attempt) {
                        RetryDecision::Retry { attempt: next } => {
                            debug!(url = %url, next_attempt = next, "retrying download");
                            progress.line("Retry...");
                            stats.retried += 1;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            progress.line(format_args!("Giving up on {url}: {reason}"));
                            warn!(url = %url, %reason, "abandoning download");
                            stats.abandoned += 1;
                            remaining.pop_front();
                            attempt = 0;
                        }
                    }
                }
            }

            self.pace(progress).await;
        }

        info!(
            completed = stats.completed(),
            retried = stats.retried(),
            abandoned = stats.abandoned(),
            "downloads finished"
        );

        stats
    }

    async fn pace<W: Write>(&self, progress: &mut Progress<W>) {
        let pacing = &self.config.pacing;
        if pacing.is_disabled() {
            return;
        }
        progress.partial(format_args!(
            "Waiting for {:.6} seconds...",
            pacing.interval_secs()
        ));
        pacing.wait().await;
        progress.line("OK.");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn config_in(dir: &TempDir) -> LoopConfig {
        LoopConfig {
            pacing: Pacing::disabled(),
            retry_policy: RetryPolicy::unlimited(),
            output_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_loop_config_default() {
        let config = LoopConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.retry_policy.is_unlimited());
        assert_eq!(config.pacing, Pacing::from_secs(1.0));
    }

    #[test]
    fn test_download_stats_counts() {
        let stats = DownloadStats {
            completed: 3,
            retried: 2,
            abandoned: 1,
        };
        assert_eq!(stats.failed_attempts(), 3);
        assert_eq!(stats.attempts(), 6);
    }

    #[tokio::test]
    async fn test_download_all_empty_list_returns_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let download_loop = DownloadLoop::new(config_in(&temp_dir));
        let stats = download_loop
            .download_all(&HttpClient::new(), Vec::new(), std::io::sink())
            .await;
        assert_eq!(stats, DownloadStats::new());
    }

    #[tokio::test]
    async fn test_download_all_retries_same_item_until_success() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/1.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"one".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2.jpg"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"three".to_vec()))
            .mount(&mock_server)
            .await;

        let urls: Vec<String> = ["1.jpg", "2.jpg", "3.jpg"]
            .iter()
            .map(|name| format!("{}/{name}", mock_server.uri()))
            .collect();

        let download_loop = DownloadLoop::new(config_in(&temp_dir));
        let mut out = Vec::new();
        let stats = download_loop
            .download_all(&HttpClient::new(), urls.clone(), &mut out)
            .await;

        assert_eq!(stats.completed(), 3);
        assert_eq!(stats.retried(), 1);
        assert_eq!(stats.abandoned(), 0);

        let requests = mock_server.received_requests().await.unwrap();
        let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
        assert_eq!(paths, vec!["/1.jpg", "/2.jpg", "/2.jpg", "/3.jpg"]);

        assert_eq!(std::fs::read(temp_dir.path().join("2.jpg")).unwrap(), b"two");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Downloading {}...HTTP 503", urls[1])));
        assert!(text.contains("Retry...\n"));
        assert_eq!(text.matches("...done").count(), 3);
    }

    #[tokio::test]
    async fn test_bounded_policy_abandons_and_moves_on() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ok.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = LoopConfig {
            retry_policy: RetryPolicy::with_max_attempts(2),
            ..config_in(&temp_dir)
        };
        let urls = vec![
            format!("{}/missing.jpg", mock_server.uri()),
            format!("{}/ok.jpg", mock_server.uri()),
        ];

        let stats = DownloadLoop::new(config)
            .download_all(&HttpClient::new(), urls, std::io::sink())
            .await;

        assert_eq!(stats.completed(), 1);
        assert_eq!(stats.retried(), 1);
        assert_eq!(stats.abandoned(), 1);
        assert_eq!(stats.attempts(), 3);
    }

    #[tokio::test]
    async fn test_unparseable_url_retries_like_any_other_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoopConfig {
            retry_policy: RetryPolicy::with_max_attempts(3),
            ..config_in(&temp_dir)
        };

        let mut out = Vec::new();
        let stats = DownloadLoop::new(config)
            .download_all(
                &HttpClient::new(),
                vec!["http://example.com/gallery/".to_string()],
                &mut out,
            )
            .await;

        assert_eq!(stats.retried(), 2);
        assert_eq!(stats.abandoned(), 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Filename not found").count(), 3);
    }

    #[tokio::test]
    async fn test_run_reports_fetch_error_without_downloading() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/entry.html", mock_server.uri());
        let mut out = Vec::new();
        let result = DownloadLoop::new(config_in(&temp_dir))
            .run(&HttpClient::new(), &url, &mut out)
            .await;

        assert!(matches!(result, Err(DownloadError::HttpStatus { status: 500, .. })));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!("Scraping {url}...HTTP 500")));
        assert!(!text.contains("Found"));
    }

    #[tokio::test]
    async fn test_pacing_lines_written_after_each_attempt() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoopConfig {
            pacing: Pacing::from_secs(0.5),
            retry_policy: RetryPolicy::with_max_attempts(2),
            ..config_in(&temp_dir)
        };

        let mut out = Vec::new();
        DownloadLoop::new(config)
            .download_all(&HttpClient::new(), vec!["not a url".to_string()], &mut out)
            .await;

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Waiting for 0.500000 seconds...OK.\n").count(), 2);
    }
}
