//! Fallback file-name derivation from a URL path.

use super::clean_file_name;

/// Extracts the last path segment of a URL as a file-name candidate,
/// transliterated for hand-off to the secondary tool.
///
/// Returns `None` when the URL cannot be parsed or has no usable segment, in
/// which case the caller has no path to wait on and must submit without
/// waiting.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(clean_file_name(segment))
}
