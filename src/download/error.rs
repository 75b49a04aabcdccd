//! Error types for the download module.
//!
//! Every failure the scraper can hit (fetching the index page, reading a
//! gallery link, writing a file) is a [`DownloadError`]. The coarse
//! [`ErrorKind`] is what the download loop and the console output care about.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DownloadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, transport, or HTTP status failure during a GET.
    Fetch,
    /// The index page could not be processed as an HTML document.
    Parse,
    /// A URL string is not a valid URL.
    UrlParse,
    /// A URL has no usable trailing path segment.
    FilenameNotFound,
    /// Local filesystem failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Parse => "parse",
            Self::UrlParse => "url-parse",
            Self::FilenameNotFound => "filename-not-found",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while scraping or downloading.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The index page (or the selector used on it) could not be parsed.
    #[error("could not parse {input}: {reason}")]
    Parse {
        /// What was being parsed (a URL or a selector).
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The provided URL is malformed.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// The URL path has no trailing segment to use as a filename.
    #[error("Filename not found: {url}")]
    FilenameNotFound {
        /// The offending URL.
        url: String,
    },

    /// File system error while writing a download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a filename-not-found error.
    pub fn filename_not_found(url: impl Into<String>) -> Self {
        Self::FilenameNotFound { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => ErrorKind::Fetch,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidUrl { .. } => ErrorKind::UrlParse,
            Self::FilenameNotFound { .. } => ErrorKind::FilenameNotFound,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the url
// or path, which the source errors don't carry.
