use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;
use crate::models::TranscriptSegment;

/// How the provider wants the video identified in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStyle {
    /// `?videoId=<11-char-id>`, the contract this service ships with.
    VideoId,
    /// `?url=<encoded original URL>`, for providers that resolve the id
    /// themselves.
    FullUrl,
}

/// Time-unit convention of the provider's `offset`/`start` fields.
///
/// Providers disagree on this, so it is declared per provider instead of
/// guessed at parse time. `MillisIfOffset` reproduces the convention of the
/// default provider: entries carrying an `offset` field are in milliseconds,
/// everything else is already in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    MillisIfOffset,
    Seconds,
    Milliseconds,
}

/// Mapping from one provider's field names and units to the canonical
/// segment shape. Supporting another provider means building another policy,
/// not touching the normalization code.
#[derive(Debug, Clone)]
pub struct NormalizePolicy {
    /// Envelope keys tried in order; if none is present the payload itself
    /// is expected to be the array.
    pub envelope_keys: Vec<String>,
    pub text_keys: Vec<String>,
    pub start_keys: Vec<String>,
    pub duration_keys: Vec<String>,
    pub time_unit: TimeUnit,
}

impl Default for NormalizePolicy {
    fn default() -> Self {
        NormalizePolicy {
            envelope_keys: vec!["content".into(), "body".into(), "transcript".into()],
            text_keys: vec!["text".into(), "snippet".into()],
            start_keys: vec!["offset".into(), "start".into(), "startTime".into()],
            duration_keys: vec!["duration".into(), "dur".into()],
            time_unit: TimeUnit::MillisIfOffset,
        }
    }
}

/// One upstream transcript provider: where to call it and how to read what
/// it returns.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub host_header: String,
    pub path: String,
    pub request: RequestStyle,
    pub policy: NormalizePolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://youtube-transcripts.p.rapidapi.com".to_string(),
            host_header: "youtube-transcripts.p.rapidapi.com".to_string(),
            path: "/transcript".to_string(),
            request: RequestStyle::VideoId,
            policy: NormalizePolicy::default(),
        }
    }
}

fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com"
        || h == "m.youtube.com"
        || h == "youtu.be"
        || h.ends_with(".youtube.com")
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract the 11-character video id from a YouTube URL, or accept a bare
/// id directly. Recognized URL shapes: `youtu.be/<id>`, `?v=<id>`,
/// `/v/<id>`, `/u/<digit>/<id>`, `/embed/<id>`, `/shorts/<id>`.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let parsed = Url::parse(input).ok()?;
    let host = parsed.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    let candidate = if host.eq_ignore_ascii_case("youtu.be") {
        parsed.path_segments()?.next().map(str::to_string)
    } else if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| k == "v") {
        Some(v.into_owned())
    } else {
        let segments: Vec<&str> = parsed.path_segments()?.collect();
        match segments.as_slice() {
            ["v", id, ..] | ["embed", id, ..] | ["shorts", id, ..] => Some((*id).to_string()),
            ["u", slot, id, ..] if slot.len() == 1 && slot.chars().all(|c| c.is_ascii_digit()) => {
                Some((*id).to_string())
            }
            _ => None,
        }
    }?;

    let candidate = candidate.trim();
    if is_video_id(candidate) {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// One GET to the provider, then normalization. No retries; the shared
/// client carries the request timeout.
pub async fn fetch_transcript(
    http: &Client,
    provider: &ProviderConfig,
    api_key: &str,
    video_id: &str,
    original_url: &str,
) -> Result<Vec<TranscriptSegment>, ApiError> {
    let endpoint = format!("{}{}", provider.base_url, provider.path);
    let query = match provider.request {
        RequestStyle::VideoId => ("videoId", video_id),
        RequestStyle::FullUrl => ("url", original_url),
    };

    let response = http
        .get(&endpoint)
        .query(&[query])
        .header("x-rapidapi-key", api_key)
        .header("x-rapidapi-host", &provider.host_header)
        .send()
        .await
        .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        // Best-effort read of the error body, for the logs only.
        let detail = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), %detail, "upstream transcript request failed");
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let payload: Value = response.json().await.map_err(request_error)?;
    normalize(&payload, &provider.policy)
}

fn request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        tracing::error!(error = %err, "upstream transcript request timed out");
        ApiError::UpstreamTimeout
    } else {
        tracing::error!(error = %err, "upstream transcript request errored");
        ApiError::Request(err)
    }
}

/// Reshape the provider payload into canonical segments, in upstream order.
/// Fails whole-or-nothing: a payload that is not an array under any known
/// envelope key is rejected.
pub fn normalize(payload: &Value, policy: &NormalizePolicy) -> Result<Vec<TranscriptSegment>, ApiError> {
    let raw = policy
        .envelope_keys
        .iter()
        .find_map(|key| payload.get(key))
        .unwrap_or(payload);

    let entries = match raw.as_array() {
        Some(entries) => entries,
        None => {
            tracing::error!(payload = %payload, "upstream payload is not a transcript array");
            return Err(ApiError::UnexpectedFormat);
        }
    };

    Ok(entries
        .iter()
        .map(|entry| normalize_entry(entry, policy))
        .collect())
}

fn normalize_entry(entry: &Value, policy: &NormalizePolicy) -> TranscriptSegment {
    let text = policy
        .text_keys
        .iter()
        .find_map(|key| entry.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or("")
        .to_string();

    let mut start = first_number(entry, &policy.start_keys);
    let mut duration = first_number(entry, &policy.duration_keys);

    let millis = match policy.time_unit {
        TimeUnit::Milliseconds => true,
        TimeUnit::Seconds => false,
        TimeUnit::MillisIfOffset => entry.get("offset").is_some(),
    };
    if millis {
        start /= 1000.0;
        duration /= 1000.0;
    }

    TranscriptSegment {
        text,
        start,
        duration,
    }
}

// First present key wins, even if it parses to 0. Numbers arrive either as
// JSON numbers or as numeric strings depending on the provider.
fn first_number(entry: &Value, keys: &[String]) -> f64 {
    keys.iter()
        .find_map(|key| entry.get(key))
        .map(parse_f64)
        .unwrap_or(0.0)
}

fn parse_f64(value: &Value) -> f64 {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0.0)
}
