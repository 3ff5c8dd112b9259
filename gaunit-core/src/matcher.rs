//! Matching engine
//!
//! Compares the expected events of a test case with the events actually
//! captured and produces two checklists:
//!
//! - `expected[i]` is true if expected event `i` was found among the actual events
//! - `actual[j]` is true if actual event `j` satisfied an expected event
//!
//! An expected event is found at an actual event when every one of its
//! parameters is present there with the same value (subset containment).
//! Each actual event satisfies at most one expected event.

use crate::types::Event;
use serde::{Deserialize, Serialize};

/// Matching policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Actual events must appear in tracking plan order
    #[default]
    Ordered,
    /// Actual events may appear in any order
    Unordered,
}

impl MatchMode {
    pub fn from_ordered(ordered: bool) -> Self {
        if ordered {
            MatchMode::Ordered
        } else {
            MatchMode::Unordered
        }
    }
}

/// Per-position match status of expected and actual events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklists {
    pub expected: Vec<bool>,
    pub actual: Vec<bool>,
}

/// Match expected events against actual events
///
/// In ordered mode a cursor moves forward past each matched actual event;
/// later expectations only look at events after it. A missed expectation
/// leaves the cursor where it was. In unordered mode every expectation may
/// use any actual event not already claimed.
pub fn match_events<A: AsRef<Event>>(
    expected: &[Event],
    actual: &[A],
    mode: MatchMode,
) -> Checklists {
    let mut checklists = Checklists {
        expected: Vec::with_capacity(expected.len()),
        actual: vec![false; actual.len()],
    };

    match mode {
        MatchMode::Ordered => {
            let mut pos = 0;
            for event in expected {
                let hit = actual[pos..]
                    .iter()
                    .position(|candidate| candidate.as_ref().contains(event))
                    .map(|offset| pos + offset);

                match hit {
                    Some(index) => {
                        checklists.actual[index] = true;
                        checklists.expected.push(true);
                        pos = index + 1;
                    }
                    None => checklists.expected.push(false),
                }
            }
        }
        MatchMode::Unordered => {
            for event in expected {
                let hit = actual.iter().enumerate().position(|(index, candidate)| {
                    !checklists.actual[index] && candidate.as_ref().contains(event)
                });

                match hit {
                    Some(index) => {
                        checklists.actual[index] = true;
                        checklists.expected.push(true);
                    }
                    None => checklists.expected.push(false),
                }
            }
        }
    }

    log::debug!(
        "Matched {}/{} expected events against {} actual events ({:?})",
        checklists.expected.iter().filter(|&&found| found).count(),
        expected.len(),
        actual.len(),
        mode
    );
    checklists
}
