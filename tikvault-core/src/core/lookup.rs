use std::sync::Arc;

use serde_json::Value;

use crate::core::http_client::HttpTransport;
use crate::core::url_parser;
use crate::error::{Error, Result};
use crate::models::settings::LookupSettings;
use crate::models::video::VideoRecord;

const GENERIC_FAILURE: &str = "Failed to fetch video data";

/// Resolves a TikTok link into a [`VideoRecord`] through the tikwm lookup API.
pub struct MetadataFetcher {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
    hd: bool,
}

impl MetadataFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &LookupSettings) -> Self {
        Self {
            transport,
            endpoint: settings.api_endpoint.clone(),
            hd: settings.hd,
        }
    }

    pub async fn fetch(&self, input: &str) -> Result<VideoRecord> {
        let url = url_parser::validate_url(input)?;

        let body = format!(
            "url={}&hd={}",
            urlencoding::encode(url),
            if self.hd { 1 } else { 0 }
        );

        tracing::debug!(
            "lookup: POST {} for {} (video id {:?})",
            self.endpoint,
            url,
            url_parser::video_id(url)
        );

        let response = self
            .transport
            .post_form(&self.endpoint, body)
            .await
            .map_err(|e| {
                tracing::warn!("lookup: request failed: {}", e);
                Error::LookupFailed(e.to_string())
            })?;

        tracing::debug!("lookup: HTTP status {}", response.status);

        let json: Option<Value> = serde_json::from_str(&response.body).ok();
        let api_message = json
            .as_ref()
            .and_then(|j| j.get("msg"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let failure = || {
            Error::LookupFailed(
                api_message
                    .clone()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )
        };

        if !response.is_success() {
            return Err(failure());
        }

        let json = json.ok_or_else(|| {
            tracing::warn!("lookup: response body is not JSON ({} bytes)", response.body.len());
            failure()
        })?;

        let code = json.get("code").and_then(Value::as_f64);
        if code != Some(0.0) {
            tracing::debug!("lookup: API code {:?}, msg {:?}", code, api_message);
            return Err(failure());
        }

        let data = json.get("data").filter(|d| d.is_object()).ok_or_else(|| {
            tracing::warn!("lookup: code 0 without a data object");
            failure()
        })?;

        Ok(self.normalize(data))
    }

    fn normalize(&self, data: &Value) -> VideoRecord {
        let title = text_field(data, "/title");

        VideoRecord {
            description: title.clone(),
            title,
            author: text_field(data, "/author/nickname"),
            thumbnail_url: self.media_url(data, "/cover").unwrap_or_default(),
            video_url: self.media_url(data, "/play"),
            audio_url: self.media_url(data, "/music"),
            like_count: coerce_count(data.get("digg_count")),
            share_count: coerce_count(data.get("share_count")),
            comment_count: coerce_count(data.get("comment_count")),
            view_count: coerce_count(data.get("play_count")),
        }
    }

    /// Root-relative paths are served from the API host.
    fn media_url(&self, data: &Value, pointer: &str) -> Option<String> {
        let raw = data.pointer(pointer).and_then(Value::as_str)?.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with('/') && !raw.starts_with("//") {
            if let Some(joined) = url::Url::parse(&self.endpoint)
                .ok()
                .and_then(|base| base.join(raw).ok())
            {
                return Some(joined.to_string());
            }
        }
        Some(raw.to_string())
    }
}

fn text_field(data: &Value, pointer: &str) -> String {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Non-negative integer from a JSON number or numeric string; anything
/// else counts as zero.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    let as_float = match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return v;
            }
            n.as_f64()
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    as_float
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(|f| f as u64)
        .unwrap_or(0)
}
