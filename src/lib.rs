//! Gallery Grab Library
//!
//! Scrapes a single index page for gallery links and downloads each one,
//! sequentially, into a local directory.
//!
//! # Architecture
//!
//! - [`scrape`] - Index page fetch, HTML parsing and link extraction
//! - [`download`] - HTTP client, filename resolution, retry policy, pacing
//!   and the sequential download loop
//! - [`output`] - Plain-text console progress

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod output;
pub mod scrape;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    DownloadError, DownloadLoop, DownloadStats, ErrorKind, HttpClient, LoopConfig, Pacing,
    RetryPolicy, filename_from_url,
};
pub use scrape::{GALLERY_SELECTOR, LinkExtractor, SelectorExtractor, fetch_link_list};
