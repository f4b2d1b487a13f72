//! Local filenames for downloaded assets.
//!
//! The server names its files through `Content-Disposition`; when the header
//! is absent the name comes from the tail of the asset URL. Either way the
//! name is kept verbatim apart from replacing characters that are unsafe on
//! common filesystems.

use std::path::{Component, Path};

use url::{Position, Url};

/// Characters replaced with `_` in every filename.
pub const UNSAFE_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Name used when neither header nor URL yields anything.
const FALLBACK_FILENAME: &str = "download.bin";

/// Chooses the local filename for an asset.
///
/// Prefers the `Content-Disposition` header, then the URL tail. The result
/// is always sanitized.
#[must_use]
pub fn resolve_filename(content_disposition: Option<&str>, url: &Url) -> String {
    content_disposition
        .and_then(parse_content_disposition)
        .filter(|name| !name.trim().is_empty())
        .map_or_else(|| filename_from_url(url), |name| sanitize_filename(&name))
}

/// Parses Content-Disposition header to extract filename.
///
/// Handles:
/// - `attachment; filename="example.cr2"`
/// - `attachment; filename=example.cr2`
/// - `attachment; filename*=UTF-8''example.cr2` (RFC 5987, preferred when present)
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some((_, rest)) = header.split_once("filename*=")
        && let Some((_charset_and_lang, encoded)) = rest.trim().split_once("''")
    {
        let encoded = encoded.split(';').next().unwrap_or_default().trim();
        if let Ok(decoded) = urlencoding::decode(encoded) {
            return Some(decoded.into_owned());
        }
    }

    let (_, value) = header.split_once("filename=")?;
    let value = value.trim();
    let name = match value.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => value.split(';').next().unwrap_or_default().trim(),
    };
    (!name.is_empty()).then(|| name.to_string())
}

/// Replaces filesystem-unsafe characters with `_`.
///
/// Besides [`UNSAFE_FILENAME_CHARS`], control characters are replaced, and a
/// name made only of dot segments (`.` or `..`) has its dots replaced so it
/// cannot address the parent directory.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_plain_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_plain_segment(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}

/// Filename derived from the last `/`-separated piece of the URL's path and query.
///
/// Asset URLs look like `/reviews/image-comparison/download-image?s3Key=<key>`;
/// the query is kept so distinct keys produce distinct names.
#[must_use]
pub fn filename_from_url(url: &Url) -> String {
    let path_and_query = &url[Position::BeforePath..Position::AfterQuery];
    let tail = path_and_query.rsplit('/').next().unwrap_or_default();
    if tail.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    let decoded = urlencoding::decode(tail).map_or_else(|_| tail.into(), |name| name);
    sanitize_filename(&decoded)
}
