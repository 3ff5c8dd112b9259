//! Event parsing
//!
//! Converts captured requests into event records. A GET request carries one
//! event in its query string. A POST request may carry a batch of events in
//! its body; each body record is merged with the URL parameters, which apply
//! to the whole batch.

use crate::capture::CapturedRequest;
use crate::query::{parse_batch_body, parse_url_params};
use crate::types::{ActualEvent, Event};

/// Decode the events carried by one request
///
/// For batched POST bodies, body parameters take precedence over URL
/// parameters with the same key. A POST without body yields the URL event.
/// Never fails: a missing body degrades to the URL-only event.
pub fn events_from_request(request: &CapturedRequest) -> Vec<Event> {
    let url_params = parse_url_params(&request.url);

    if !request.is_post() {
        return vec![url_params];
    }

    match request.body.as_deref() {
        Some(body) => parse_batch_body(body)
            .iter()
            .map(|record| {
                let mut event = url_params.clone();
                event.merge(record);
                event
            })
            .collect(),
        None => {
            log::debug!("POST request without body, using URL parameters: {}", request.url);
            vec![url_params]
        }
    }
}

/// Decode all requests into actual events, keeping capture order
pub fn actual_events(requests: &[CapturedRequest]) -> Vec<ActualEvent> {
    let events: Vec<ActualEvent> = requests
        .iter()
        .flat_map(|request| {
            events_from_request(request).into_iter().map(move |params| {
                ActualEvent::new(params, request.url.clone()).with_timestamp(request.timestamp)
            })
        })
        .collect();

    log::debug!("Decoded {} events from {} requests", events.len(), requests.len());
    events
}
