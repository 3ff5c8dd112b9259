//! End-to-end checks through the public API: tracking plan files, capture
//! files of every supported format, and the reference scenarios.

use gaunit_core::{
    check_capture, check_capture_file, check_perf_log, check_url_log, CaptureSource, Checker, Event,
    GaUnitError, MatchMode, TrackingPlan,
};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const GA_URL: &str = "https://www.google-analytics.com/collect";

// ── Helpers ─────────────────────────────────────────────────────────────

fn plan_abc() -> TrackingPlan {
    let mut plan = TrackingPlan::new();
    plan.upsert_test_case(
        "home_engie",
        vec![
            Event::from_pairs([("dp", "A")]),
            Event::from_pairs([("dp", "B")]),
            Event::from_pairs([("dp", "C")]),
        ],
    );
    plan
}

fn mock_har(dps: &[&str]) -> Value {
    let entries: Vec<Value> = dps
        .iter()
        .map(|dp| json!({"request": {"method": "GET", "url": format!("{GA_URL}?v=1&dp={dp}")}}))
        .collect();
    json!({"log": {"entries": entries}})
}

fn mock_perf_log(dps: &[&str]) -> Vec<Value> {
    dps.iter()
        .map(|dp| {
            let envelope = json!({"message": {
                "method": "Network.requestWillBeSent",
                "params": {"request": {"url": format!("{GA_URL}?v=1&t=pageview&dp={dp}")}}
            }});
            json!({"level": "INFO", "message": envelope.to_string()})
        })
        .collect()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ── Reference scenarios ─────────────────────────────────────────────────

#[test]
fn scenario_all_events_in_order() {
    let result = check_capture("home_engie", &plan_abc(), mock_har(&["A", "B", "C"])).unwrap();
    assert_eq!(result.checklist_expected(), &[true, true, true]);
    assert_eq!(result.checklist_actual(), &[true, true, true]);
    assert!(result.was_successful());
}

#[test]
fn scenario_last_event_missing() {
    let result = check_capture("home_engie", &plan_abc(), mock_har(&["A", "x", "B", "x"])).unwrap();
    assert_eq!(result.checklist_expected(), &[true, true, false]);
    assert_eq!(result.checklist_actual(), &[true, false, true, false]);
    assert!(!result.was_successful());
}

#[test]
fn scenario_unordered_with_missing_event() {
    let result = Checker::new()
        .with_mode(MatchMode::Unordered)
        .check_capture("home_engie", &plan_abc(), mock_har(&["x", "C", "A"]))
        .unwrap();
    assert_eq!(result.checklist_expected(), &[true, false, true]);
    assert_eq!(result.checklist_actual(), &[false, true, true]);
}

#[test]
fn scenario_post_batch_shares_url_params() {
    let har = json!({"log": {"entries": [{"request": {
        "method": "POST",
        "url": "https://www.google-analytics.com/g/collect?v=2",
        "postData": {"text": "en=page_view\r\nen=scroll"}
    }}]}});
    let plan = TrackingPlan::from_events(
        "ga4",
        vec![
            Event::from_pairs([("en", "page_view")]),
            Event::from_pairs([("en", "scroll")]),
        ],
    );

    let result = check_capture("ga4", &plan, har).unwrap();
    let events: Vec<&Event> = result.actual_events().iter().map(|e| &e.params).collect();
    assert_eq!(
        events,
        vec![
            &Event::from_pairs([("v", "2"), ("en", "page_view")]),
            &Event::from_pairs([("v", "2"), ("en", "scroll")]),
        ]
    );
    assert!(result.was_successful());
}

#[test]
fn scenario_plan_values_are_decoded() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "tracking_plan.json",
        r#"{"test_cases": {"home": {"events": [{"dl": "%2F"}]}}}"#,
    );
    let plan = TrackingPlan::load(&path).unwrap();
    assert_eq!(plan.expected_events("home").unwrap(), &[Event::from_pairs([("dl", "/")])]);
}

#[test]
fn captured_values_match_as_sent() {
    let plan = TrackingPlan::from_json_str(
        r#"{"test_cases": {"home": {"events": [{"dt": "Home Page", "dp": "Café", "el": "it%27s"}]}}}"#,
    )
    .unwrap();
    let har = json!({"log": {"entries": [{"request": {
        "method": "GET",
        "url": format!("{GA_URL}?v=1&dt=Home Page&dp=Café&el=it's")
    }}]}});

    let result = check_capture("home", &plan, har).unwrap();
    let captured = &result.actual_events()[0].params;
    assert_eq!(captured.get("dt"), Some("Home Page"));
    assert_eq!(captured.get("el"), Some("it's"));
    assert_eq!(result.checklist_expected(), &[true]);
}

// ── Capture files ───────────────────────────────────────────────────────

#[test]
fn har_file_is_checked() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "session.har", &mock_har(&["A", "B", "C"]).to_string());
    let result = check_capture_file("home_engie", &plan_abc(), &path).unwrap();
    assert!(result.was_successful());
    assert_eq!(result.actual_events()[0].url, format!("{GA_URL}?v=1&dp=A"));
}

#[test]
fn perf_log_file_is_checked() {
    let dir = TempDir::new().unwrap();
    let log = Value::Array(mock_perf_log(&["A", "B", "C"]));
    let path = write_file(&dir, "perf_log.json", &log.to_string());
    let result = check_capture_file("home_engie", &plan_abc(), &path).unwrap();
    assert!(result.was_successful());
}

#[test]
fn url_log_file_is_checked() {
    let dir = TempDir::new().unwrap();
    let content = format!("{GA_URL}?v=1&dp=A\nhttps://domain.com/\n{GA_URL}?v=1&dp=C\n");
    let path = write_file(&dir, "hits.log", &content);
    let result = check_capture_file("home_engie", &plan_abc(), &path).unwrap();
    assert_eq!(result.checklist_expected(), &[true, false, true]);
    assert_eq!(result.actual_events().len(), 2);
}

#[test]
fn missing_capture_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.har");
    let err = check_capture_file("home_engie", &plan_abc(), &path).unwrap_err();
    assert!(matches!(err, GaUnitError::IoError(_)));
}

#[test]
fn malformed_capture_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let not_json = write_file(&dir, "broken.har", "{\"log\": ");
    assert!(matches!(
        check_capture_file("home_engie", &plan_abc(), &not_json),
        Err(GaUnitError::FormatError(_))
    ));

    let wrong_shape = write_file(&dir, "wrong.har", r#"{"log": {"pages": []}}"#);
    assert!(matches!(
        check_capture_file("home_engie", &plan_abc(), &wrong_shape),
        Err(GaUnitError::FormatError(_))
    ));

    let scalar = write_file(&dir, "scalar.json", "42");
    assert!(matches!(
        check_capture_file("home_engie", &plan_abc(), &scalar),
        Err(GaUnitError::TypeConflictError(_))
    ));
}

// ── Entry points and errors ─────────────────────────────────────────────

#[test]
fn perf_log_entry_point() {
    let entries = mock_perf_log(&["A", "B", "C"]);
    let result = check_perf_log("home_engie", &plan_abc(), entries).unwrap();
    assert_eq!(result.checklist_expected(), &[true, true, true]);
}

#[test]
fn url_log_entry_point() {
    let log = format!("{GA_URL}?v=1&dp=A\n{GA_URL}?v=1&dp=C\n");
    let result = check_url_log("home_engie", &plan_abc(), log).unwrap();
    assert_eq!(result.checklist_expected(), &[true, false, true]);
}

#[test]
fn unknown_test_case_is_lookup_error() {
    let err = check_capture("unknown", &plan_abc(), mock_har(&["A"])).unwrap_err();
    assert!(matches!(err, GaUnitError::LookupError(_)));
}

#[test]
fn conflicting_sources_are_rejected() {
    let both = CaptureSource::from_options(Some(mock_har(&["A"])), Some(PathBuf::from("s.har")));
    assert!(matches!(both, Err(GaUnitError::InputConflictError(_))));
    assert!(matches!(
        CaptureSource::from_options(None, None),
        Err(GaUnitError::InputConflictError(_))
    ));
}

#[test]
fn plan_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = write_file(
        &dir,
        "tracking_plan.json",
        r#"{"test_cases": {
            "home": {"events": [{"t": "pageview", "dl": "https%3A%2F%2Fshop.com%2F", "cd1": 12, "el": ""}]},
            "cart": {"events": [{"en": "add_to_cart", "epn.value": 9.5}]}
        }}"#,
    );
    let plan = TrackingPlan::load(&source).unwrap();

    let saved = dir.path().join("saved.json");
    plan.save(&saved).unwrap();
    let reloaded = TrackingPlan::load(&saved).unwrap();

    assert_eq!(reloaded, plan);
    assert_eq!(
        reloaded.expected_events("home").unwrap(),
        &[Event::from_pairs([
            ("t", "pageview"),
            ("dl", "https://shop.com/"),
            ("cd1", "12"),
        ])]
    );
    assert_eq!(reloaded.expected_events("cart").unwrap()[0].get("epn.value"), Some("9.5"));
}

#[test]
fn malformed_plan_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "tracking_plan.json", r#"{"test_cases": {"home": {"hits": []}}}"#);
    assert!(matches!(TrackingPlan::load(&path), Err(GaUnitError::FormatError(_))));
}

#[test]
fn report_lists_missing_events() {
    let result = check_capture("home_engie", &plan_abc(), mock_har(&["A", "x"])).unwrap();
    let mut out = Vec::new();
    result.write_result(&mut out, false).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains(r#"{dp: "B"}"#));
    assert!(text.contains(r#"{dp: "C"}"#));
    assert!(text.contains("2 events captured, 1 matched the tracking plan, 2 of 3 expected events missing"));
    assert!(text.contains("FAILED: home_engie"));
}
