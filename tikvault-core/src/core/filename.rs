use regex::Regex;
use std::sync::LazyLock;

use crate::models::video::MediaFormat;

static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const FALLBACK_STEM: &str = "tikvault_video";

/// Keeps ASCII letters, digits and whitespace, then turns each whitespace
/// run into a single underscore.
pub fn sanitize_title(title: &str) -> String {
    let kept = DISALLOWED_RE.replace_all(title, "");
    WS_RE.replace_all(&kept, "_").into_owned()
}

pub fn media_filename(title: &str, format: MediaFormat) -> String {
    let stem = sanitize_title(title);
    let stem = if stem.trim_matches('_').is_empty() {
        FALLBACK_STEM
    } else {
        stem.as_str()
    };
    format!("{}.{}", stem, format.extension())
}
