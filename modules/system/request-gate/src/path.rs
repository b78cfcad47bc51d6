//! Path normalization used before classification.
//!
//! Classification runs on a canonical form so that `/admin`, `/admin/`,
//! `//admin` and `/%61dmin` all land in the same area. The forwarded request
//! keeps its original URI.

use crate::error::PathError;

/// Normalize a request path into its canonical, decoded form.
///
/// Empty segments are dropped, so repeated and trailing slashes collapse.
/// Each segment is percent-decoded.
///
/// # Errors
///
/// Returns a [`PathError`] when the path is relative, contains `.`/`..`
/// segments, decodes to invalid UTF-8, hides a separator behind an escape, or
/// contains control characters.
pub fn normalize_path(raw: &str) -> Result<String, PathError> {
    if !raw.starts_with('/') {
        return Err(PathError::NotAbsolute);
    }

    let mut normalized = String::with_capacity(raw.len());
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        let decoded = urlencoding::decode(segment).map_err(|_| PathError::InvalidEncoding)?;
        if decoded.chars().any(char::is_control) {
            return Err(PathError::ControlCharacter);
        }
        if decoded.contains(['/', '\\']) {
            return Err(PathError::EncodedSeparator);
        }
        if decoded == "." || decoded == ".." {
            return Err(PathError::DotSegment);
        }
        normalized.push('/');
        normalized.push_str(&decoded);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    Ok(normalized)
}
