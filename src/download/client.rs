//! HTTP client wrapper for fetching pages and downloading files.
//!
//! This module provides the `HttpClient` struct which performs plain GETs
//! (no custom timeouts, no internal retry, default redirect policy) and
//! streams download bodies to disk.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use super::filename::filename_from_url;
use crate::user_agent;

/// HTTP client shared by the list extractor and the download loop.
///
/// Created once and passed by reference; reqwest pools connections
/// underneath, so reusing one instance across sequential calls is cheap.
///
/// # Example
///
/// ```no_run
/// use gallery_grab::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let file = client
///     .download_to_file("https://example.com/gallery/photo.jpg", Path::new("."))
///     .await?;
/// println!("Downloaded {} bytes to {}", file.bytes, file.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Final output path.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::try_new().expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client, returning the builder error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error (e.g. the TLS backend failed to load).
    pub fn try_new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a page and returns its body decoded as text.
    ///
    /// The charset comes from the response `Content-Type`, UTF-8 otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] on transport or body-read failure
    /// and [`DownloadError::HttpStatus`] on a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = self.send_get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }

    /// Downloads a URL into `output_dir`, named by the URL's last path segment.
    ///
    /// The body is streamed into a hidden `.<name>.part` sibling and renamed
    /// over `<name>` once fully written, so the final file never keeps stale
    /// bytes from an earlier, longer download. On failure the partial file is
    /// removed and any existing `<name>` is left as it was.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] / [`DownloadError::FilenameNotFound`]
    ///   if no filename can be derived (checked before any request is sent)
    /// - [`DownloadError::Network`] / [`DownloadError::HttpStatus`] on fetch failure
    /// - [`DownloadError::Io`] if creating, writing, or renaming the file fails
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self), fields(url = %url))]
    pub async fn download_to_file(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadedFile, DownloadError> {
        let filename = filename_from_url(url)?;
        let final_path = output_dir.join(&filename);
        let part_path = output_dir.join(format!(".{filename}.part"));
        debug!(path = %final_path.display(), "resolved output path");

        let response = self.send_get(url).await?;

        let mut file = File::create(&part_path)
            .await
            .map_err(|e| DownloadError::io(part_path.clone(), e))?;
        let stream_result = stream_to_file(&mut file, response, url, &part_path).await;
        drop(file);

        let bytes = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %part_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, &final_path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(DownloadError::io(final_path, e));
        }

        info!(path = %final_path.display(), bytes, "download complete");

        Ok(DownloadedFile {
            path: final_path,
            bytes,
        })
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams response body to file, returning bytes written.
///
/// Kept separate so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
