//! Standalone capture inspection tool
//!
//! Lists the analytics events found in a capture file (HAR, performance log
//! or URL log) and, when a tracking plan and test case are given, checks them.
//!
//! Usage:
//!   inspect_capture <capture_file> [<tracking_plan.json> <test_case>]
//!
//! Example:
//!   RUST_LOG=debug inspect_capture session.har tracking_plan.json home

use gaunit_core::{capture, parser, EndpointConfig, TrackingPlan};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("Usage: {} <capture_file> [<tracking_plan.json> <test_case>]", args[0]);
        std::process::exit(2);
    }

    let capture_path = PathBuf::from(&args[1]);
    let endpoint = EndpointConfig::new();

    let requests = match capture::requests_from_file(&capture_path, &endpoint) {
        Ok(requests) => requests,
        Err(e) => {
            eprintln!("Error reading capture: {}", e);
            std::process::exit(1);
        }
    };

    let events = parser::actual_events(&requests);
    println!("=== {} tracking requests, {} events ===", requests.len(), events.len());
    for (i, event) in events.iter().enumerate() {
        match event.timestamp {
            Some(ts) => println!("#{:<3} {} {}", i, ts.to_rfc3339(), event.params),
            None => println!("#{:<3} {}", i, event.params),
        }
    }

    if args.len() == 4 {
        let plan = match TrackingPlan::load(&PathBuf::from(&args[2])) {
            Ok(plan) => plan,
            Err(e) => {
                eprintln!("Error loading tracking plan: {}", e);
                std::process::exit(1);
            }
        };

        match gaunit_core::check_capture_file(&args[3], &plan, &capture_path) {
            Ok(result) => {
                println!();
                if let Err(e) = result.print_result(true) {
                    eprintln!("Error printing result: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Check failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
