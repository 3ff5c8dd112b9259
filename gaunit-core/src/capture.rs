//! Capture extraction
//!
//! Pulls the requests aimed at the tracking endpoint out of a network capture,
//! in the order they were recorded. Three capture shapes are supported:
//!
//! - HAR-like objects (`log.entries[].request`), read strictly: a missing
//!   structural field is a format error
//! - browser performance logs (list of `{"message": "<json envelope>"}`), read
//!   leniently: entries that cannot be decoded are skipped
//! - plain URL logs, one request URL per line

use crate::config::EndpointConfig;
use crate::types::{GaUnitError, Result, Timestamp};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Performance log method announcing an outgoing request
pub const REQUEST_SENT_METHOD: &str = "Network.requestWillBeSent";

/// A request extracted from a capture, before event parsing
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    /// HTTP method (GET, POST, ...)
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Request body text, if any
    pub body: Option<String>,
    /// Time the request was sent, when recorded
    pub timestamp: Option<Timestamp>,
}

impl CapturedRequest {
    /// Create a GET request without body or timestamp
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            body: None,
            timestamp: None,
        }
    }

    /// Create a POST request with a body
    pub fn post(url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: "POST".to_string(),
            url: url.into(),
            body,
            timestamp: None,
        }
    }

    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }
}

/// Where the requests of a test case come from
///
/// Exactly one source is held; `from_options` validates the either/or choice
/// for callers that carry two optional inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureSource {
    /// HAR-like capture already in memory
    Har(Value),
    /// Browser performance log entries already in memory
    PerfLog(Vec<Value>),
    /// Plain text, one request URL per line
    UrlLog(String),
    /// Capture file on disk; format is detected when loaded
    File(PathBuf),
}

impl CaptureSource {
    /// Build a source from an in-memory capture XOR a file path
    pub fn from_options(capture: Option<Value>, path: Option<PathBuf>) -> Result<Self> {
        match (capture, path) {
            (Some(_), Some(_)) => Err(GaUnitError::InputConflictError(
                "both a capture and a capture file were given, only one is allowed".to_string(),
            )),
            (None, None) => Err(GaUnitError::InputConflictError(
                "neither a capture nor a capture file was given".to_string(),
            )),
            (Some(capture), None) => Self::from_value(capture),
            (None, Some(path)) => Ok(CaptureSource::File(path)),
        }
    }

    /// Classify a JSON capture: an object is a HAR, an array a performance log
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(CaptureSource::Har(value)),
            Value::Array(entries) => Ok(CaptureSource::PerfLog(entries)),
            other => Err(GaUnitError::TypeConflictError(format!(
                "capture must be a JSON object (HAR) or array (performance log), got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Extract the tracking requests of this source, in capture order
    pub fn requests(&self, endpoint: &EndpointConfig) -> Result<Vec<CapturedRequest>> {
        match self {
            CaptureSource::Har(har) => requests_from_har(har, endpoint),
            CaptureSource::PerfLog(entries) => Ok(requests_from_perf_log(entries, endpoint)),
            CaptureSource::UrlLog(text) => Ok(requests_from_url_log(text, endpoint)),
            CaptureSource::File(path) => requests_from_file(path, endpoint),
        }
    }
}

/// Extract tracking requests from a capture file
///
/// `.log` and `.txt` files are read as URL logs. Anything else must be JSON:
/// an object is read as a HAR, an array as a performance log.
pub fn requests_from_file(
    path: &Path,
    endpoint: &EndpointConfig,
) -> Result<Vec<CapturedRequest>> {
    log::info!("Loading capture file: {:?}", path);

    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("log") | Some("txt") => {
            log::debug!("Detected URL log capture");
            CaptureSource::UrlLog(content).requests(endpoint)
        }
        _ => {
            let value: Value = serde_json::from_str(&content).map_err(|e| {
                GaUnitError::FormatError(format!(
                    "capture file {:?} is not valid JSON: {}",
                    path, e
                ))
            })?;
            let source = CaptureSource::from_value(value)?;
            log::debug!(
                "Detected {} capture",
                if matches!(source, CaptureSource::Har(_)) { "HAR" } else { "performance log" }
            );
            source.requests(endpoint)
        }
    }
}

#[derive(Deserialize)]
struct Har {
    log: HarLog,
}

#[derive(Deserialize)]
struct HarLog {
    entries: Vec<HarEntry>,
}

#[derive(Deserialize)]
struct HarEntry {
    #[serde(rename = "startedDateTime", default)]
    started_date_time: Option<String>,
    request: HarRequest,
}

#[derive(Deserialize)]
struct HarRequest {
    #[serde(default = "default_method")]
    method: String,
    url: String,
    #[serde(rename = "postData", default)]
    post_data: Option<HarPostData>,
}

#[derive(Deserialize)]
struct HarPostData {
    #[serde(default)]
    text: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Extract tracking requests from a HAR-like capture
///
/// The capture must be an object with `log.entries[].request.url`; anything
/// else is a format error rather than an empty result.
pub fn requests_from_har(
    har: &Value,
    endpoint: &EndpointConfig,
) -> Result<Vec<CapturedRequest>> {
    if !har.is_object() {
        return Err(GaUnitError::TypeConflictError(format!(
            "HAR capture must be a JSON object, got {}",
            json_type_name(har)
        )));
    }

    let parsed = Har::deserialize(har)
        .map_err(|e| GaUnitError::FormatError(format!("HAR capture is not valid: {}", e)))?;

    let total = parsed.log.entries.len();
    let requests: Vec<CapturedRequest> = parsed
        .log
        .entries
        .into_iter()
        .filter(|entry| endpoint.matches(&entry.request.url))
        .map(|entry| {
            let timestamp = entry.started_date_time.as_deref().and_then(parse_rfc3339);
            CapturedRequest {
                method: entry.request.method,
                url: entry.request.url,
                body: entry.request.post_data.and_then(|data| data.text),
                timestamp,
            }
        })
        .collect();

    log::debug!("HAR: {} of {} entries target the tracking endpoint", requests.len(), total);
    Ok(requests)
}

#[derive(Deserialize)]
struct PerfLogEnvelope {
    message: PerfLogMessage,
}

#[derive(Deserialize)]
struct PerfLogMessage {
    method: String,
    #[serde(default)]
    params: Option<PerfLogParams>,
}

#[derive(Deserialize)]
struct PerfLogParams {
    #[serde(default)]
    request: Option<PerfLogRequest>,
}

#[derive(Deserialize)]
struct PerfLogRequest {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(rename = "postData", default)]
    post_data: Option<String>,
}

/// Extract tracking requests from browser performance log entries
///
/// Only request-sent entries are considered. Entries whose envelope cannot be
/// decoded or that carry no URL are skipped.
pub fn requests_from_perf_log(
    entries: &[Value],
    endpoint: &EndpointConfig,
) -> Vec<CapturedRequest> {
    let mut requests = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(request) = perf_log_request(entry) else {
            log::trace!("Skipping performance log entry {}", index);
            continue;
        };
        if endpoint.matches(&request.url) {
            requests.push(request);
        }
    }

    log::debug!(
        "Performance log: {} of {} entries are tracking requests",
        requests.len(),
        entries.len()
    );
    requests
}

fn perf_log_request(entry: &Value) -> Option<CapturedRequest> {
    let raw = entry.get("message")?.as_str()?;
    let envelope: PerfLogEnvelope = serde_json::from_str(raw).ok()?;
    if envelope.message.method != REQUEST_SENT_METHOD {
        return None;
    }
    let request = envelope.message.params?.request?;
    let url = request.url?;

    let timestamp = entry
        .get("timestamp")
        .and_then(Value::as_i64)
        .and_then(DateTime::from_timestamp_millis);

    Some(CapturedRequest {
        method: request.method.unwrap_or_else(default_method),
        url,
        body: request.post_data,
        timestamp,
    })
}

/// Extract tracking requests from a plain URL log (one GET per line)
pub fn requests_from_url_log(text: &str, endpoint: &EndpointConfig) -> Vec<CapturedRequest> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && endpoint.matches(line))
        .map(CapturedRequest::get)
        .collect()
}

fn parse_rfc3339(value: &str) -> Option<Timestamp> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            log::debug!("Ignoring unparsable timestamp {:?}: {}", value, e);
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
