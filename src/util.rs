use std::path::Path;

use reqwest::Url;

const MAX_BODY_CHARS: usize = 2048;

/// Resolves a server-provided path or absolute URL against the API base.
pub fn api_url(base: &Url, path_or_url: &str) -> Result<Url, url::ParseError> {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        Url::parse(path_or_url)
    } else {
        base.join(path_or_url.trim_start_matches('/'))
    }
}

/// Appends `segments` to the base path, percent-encoding each one as a single segment.
pub fn api_endpoint(base: &Url, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Base URLs need a trailing slash or `join` drops their last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{}/", raw))
    }
}

pub fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.ipa".to_string())
}

/// Trims a response body for inclusion in an error message.
pub fn display_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= MAX_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_BODY_CHARS).collect();
    out.push_str("...");
    out
}
