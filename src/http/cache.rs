//! HTTP cache validation module
//!
//! Weak validators derived from file metadata, so a file never has to be
//! read just to answer a conditional request.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Weak `ETag` of the form `W/"<size>-<mtime millis>"` (both hex)
pub fn weak_etag(len: u64, modified: SystemTime) -> String {
    let millis = modified
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("W/\"{len:x}-{millis:x}\"")
}

/// `Last-Modified` header value
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Decide whether a 304 can be sent
///
/// `If-None-Match` wins when present (weak comparison, `*` matches anything);
/// otherwise `If-Modified-Since` is compared at one-second resolution.
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: SystemTime,
) -> bool {
    if let Some(tags) = if_none_match {
        let ours = strip_weak(etag);
        return tags
            .split(',')
            .map(str::trim)
            .any(|t| t == "*" || strip_weak(t) == ours);
    }

    let Some(since) = if_modified_since.and_then(|s| DateTime::parse_from_rfc2822(s).ok()) else {
        return false;
    };
    let modified = DateTime::<Utc>::from(modified).timestamp();
    modified <= since.timestamp()
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
