//! URL and POST-body decoding
//!
//! Turns query strings and batched POST bodies into `Event` parameter maps.
//! Values taken from captured requests are kept exactly as they were sent;
//! only tracking plan values go through `decode_value`.

use crate::types::Event;

/// Separator between events in a batched POST body
pub const RECORD_SEPARATOR: &str = "\r\n";

/// Parse the query component of a URL into an event
///
/// The query is everything between the first `?` and the fragment, taken
/// from the raw string so values are never re-encoded. Duplicate keys keep
/// their first occurrence. A URL without a query yields an empty event.
pub fn parse_url_params(url: &str) -> Event {
    match raw_query(url) {
        Some(query) => parse_query(query),
        None => Event::new(),
    }
}

fn raw_query(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    Some(rest.split_once('#').map_or(rest, |(query, _)| query))
}

/// Parse a `key=value&key=value` string into an event
///
/// Empty pairs and empty keys are skipped; a pair without `=` maps to an
/// empty value.
pub fn parse_query(query: &str) -> Event {
    let mut event = Event::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            continue;
        }
        event.insert_if_absent(key, value);
    }
    event
}

/// Parse a batched POST body into one event per record
///
/// Records are separated by CRLF. An empty record, including an empty body
/// or a trailing separator, parses to an empty event.
pub fn parse_batch_body(body: &str) -> Vec<Event> {
    body.split(RECORD_SEPARATOR).map(parse_query).collect()
}

/// Percent-decode a tracking plan value
///
/// `+` is left alone. Invalid UTF-8 after decoding keeps the raw value.
pub fn decode_value(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            log::warn!("Could not percent-decode value {:?}: {}", raw, e);
            raw.to_string()
        }
    }
}

/// Escape a value so that `decode_value` gives it back unchanged
pub fn encode_value(value: &str) -> String {
    value.replace('%', "%25")
}
