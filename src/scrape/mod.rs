//! Index page scraping.
//!
//! Fetches the index page once, parses it as HTML and hands the document to
//! a [`LinkExtractor`], which decides which links are gallery items.
//!
//! # Example
//!
//! ```no_run
//! use gallery_grab::download::HttpClient;
//! use gallery_grab::scrape::{SelectorExtractor, fetch_link_list};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let links = fetch_link_list(&client, "https://example.com/blog/entry-1.html", &SelectorExtractor::gallery()).await?;
//! println!("Found {} images", links.len());
//! # Ok(())
//! # }
//! ```

mod extractor;

pub use extractor::{GALLERY_SELECTOR, LinkExtractor, SelectorExtractor};

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::download::{DownloadError, HttpClient};

/// Fetches `index_url` and returns the links `extractor` finds on it.
///
/// # Errors
///
/// Returns a fetch-kind [`DownloadError`] if the page cannot be retrieved.
/// An empty result is not an error.
#[instrument(skip(client, extractor), fields(url = %index_url))]
pub async fn fetch_link_list(
    client: &HttpClient,
    index_url: &str,
    extractor: &dyn LinkExtractor,
) -> Result<Vec<String>, DownloadError> {
    let body = client.fetch_text(index_url).await?;
    let links = extract_links(&body, extractor);
    info!(count = links.len(), "extracted links from index page");
    Ok(links)
}

/// Parses `html` and runs `extractor` over it.
#[must_use]
pub fn extract_links(html: &str, extractor: &dyn LinkExtractor) -> Vec<String> {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(
            parse_errors = document.errors.len(),
            "index page has recoverable HTML errors"
        );
    }
    extractor.extract(&document)
}
