//! Download side of the scraper: fetching, naming, retrying and pacing.
//!
//! # Features
//!
//! - Streaming downloads written through a temporary file and renamed into place
//! - Filenames taken verbatim from the last URL path segment
//! - Explicit retry policy (unlimited by default)
//! - Whole-second pacing between attempts
//!
//! # Example
//!
//! ```no_run
//! use gallery_grab::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let file = client
//!     .download_to_file("https://example.com/gallery/photo123.jpg", Path::new("."))
//!     .await?;
//! println!("Downloaded: {}", file.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod pacing;
mod retry;

pub use client::{DownloadedFile, HttpClient};
pub use constants::{DEFAULT_INTERVAL_SECS, DEFAULT_OUTPUT_DIR};
pub use engine::{DownloadLoop, DownloadStats, LoopConfig};
pub use error::{DownloadError, ErrorKind};
pub use filename::filename_from_url;
pub use pacing::Pacing;
pub use retry::{RetryDecision, RetryPolicy};
