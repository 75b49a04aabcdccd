//! Link extraction strategies.

use std::fmt;

use scraper::{Html, Selector};

use crate::download::DownloadError;

/// Selector for gallery links: anchors opening in a new tab inside a
/// `div.ently_text` entry body.
pub const GALLERY_SELECTOR: &str = r#"div.ently_text a[target="_blank"]"#;

/// Given a parsed document, returns the ordered list of candidate URLs.
pub trait LinkExtractor: fmt::Debug + Send + Sync {
    /// Extracts raw link targets in document order.
    fn extract(&self, document: &Html) -> Vec<String>;
}

/// Extracts the `href` of every element matching a CSS selector.
///
/// Elements without an `href` are skipped. Values are returned verbatim:
/// relative links stay relative and empty values stay empty.
pub struct SelectorExtractor {
    source: String,
    selector: Selector,
}

impl SelectorExtractor {
    /// Compiles an extractor for `css`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Parse`] if the selector does not compile.
    pub fn new(css: &str) -> Result<Self, DownloadError> {
        let selector =
            Selector::parse(css).map_err(|e| DownloadError::parse(css, e.to_string()))?;
        Ok(Self {
            source: css.to_string(),
            selector,
        })
    }

    /// The gallery extractor ([`GALLERY_SELECTOR`]).
    ///
    /// # Panics
    ///
    /// Panics if the static selector fails to compile, which would be a
    /// programming error caught by the unit tests.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn gallery() -> Self {
        Self::new(GALLERY_SELECTOR).expect("gallery selector is valid CSS")
    }

    /// Returns the selector text this extractor was compiled from.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.source
    }
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::gallery()
    }
}

impl fmt::Debug for SelectorExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorExtractor")
            .field("selector", &self.source)
            .finish()
    }
}

impl LinkExtractor for SelectorExtractor {
    fn extract(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}
