//! Filename resolution for downloads.
//!
//! The local filename is the last segment of the href's own path, taken
//! exactly as written in the page. There is no sanitization, no collision
//! handling and no percent-encoding or decoding: `photo%201.jpg` stays
//! `photo%201.jpg` and `写真01.jpg` stays `写真01.jpg`.
//!
//! Relative references are accepted here; a scheme-less href resolves to a
//! filename and then fails at the HTTP request instead.

use url::Url;

use super::DownloadError;

/// Derives the local filename for a download URL.
///
/// # Errors
///
/// - [`DownloadError::InvalidUrl`] if the string contains a control
///   character or a bad `%` escape, or is an absolute URL the parser rejects
/// - [`DownloadError::FilenameNotFound`] if the path has no non-empty
///   trailing segment (empty href, empty path, or a path ending in `/`)
///
/// # Example
///
/// ```
/// use gallery_grab::download::filename_from_url;
///
/// let name = filename_from_url("http://example.com/gallery/photo123.jpg").unwrap();
/// assert_eq!(name, "photo123.jpg");
/// ```
pub fn filename_from_url(raw: &str) -> Result<String, DownloadError> {
    validate(raw)?;
    trailing_segment(raw_path(raw))
        .map(str::to_string)
        .ok_or_else(|| DownloadError::filename_not_found(raw))
}

/// Rejects input the WHATWG parser would silently repair or refuse.
///
/// The `url` crate strips tabs and newlines and accepts stray `%` signs.
/// Hrefs scraped from a page should never contain either, so they are
/// treated as malformed here. Relative references pass.
fn validate(raw: &str) -> Result<(), DownloadError> {
    if let Some(c) = raw.chars().find(char::is_ascii_control) {
        return Err(DownloadError::invalid_url(
            raw,
            format!("invalid control character {c:?} in URL"),
        ));
    }
    if let Some(offset) = invalid_percent_escape(raw) {
        return Err(DownloadError::invalid_url(
            raw,
            format!("invalid percent-escape at byte {offset}"),
        ));
    }
    match Url::parse(raw) {
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(e) => Err(DownloadError::invalid_url(raw, e.to_string())),
    }
}

/// The path component of `raw` as written: no query, fragment, scheme or
/// authority.
fn raw_path(raw: &str) -> &str {
    let without_suffix = raw.find(['?', '#']).map_or(raw, |i| &raw[..i]);
    let hier = match without_suffix.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => without_suffix,
    };
    match hier.strip_prefix("//") {
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map_or("", |i| &authority_and_path[i..]),
        None => hier,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Returns the byte offset of the first `%` not followed by two hex digits.
fn invalid_percent_escape(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .map(|(i, _)| i)
        .find(|&i| {
            !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
            )
        })
}

/// Longest trailing run of the path containing no `/`, if non-empty.
fn trailing_segment(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}
