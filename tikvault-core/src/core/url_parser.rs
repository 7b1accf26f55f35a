use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static TIKTOK_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://(www\.|vm\.|vt\.)?tiktok\.com/.+").unwrap());

pub fn is_tiktok_url(url: &str) -> bool {
    TIKTOK_URL_RE.is_match(url)
}

/// Trims the input and checks it against the accepted TikTok link shapes:
/// `tiktok.com`, `www.tiktok.com` and the `vm.`/`vt.` short-link hosts.
pub fn validate_url(input: &str) -> Result<&str> {
    let url = input.trim();
    if is_tiktok_url(url) {
        Ok(url)
    } else {
        Err(Error::InvalidUrl)
    }
}

/// Numeric post id for canonical `/@user/video/<id>` links.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() >= 3
        && segments[0].starts_with('@')
        && (segments[1] == "video" || segments[1] == "photo")
        && segments[2].chars().all(|c| c.is_ascii_digit())
    {
        return Some(segments[2].to_string());
    }

    None
}
