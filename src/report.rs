//! Summaries over the current trackables, for a presentation layer.
//!
//! The tracker itself returns nothing; a client reads the store back and
//! renders from there. This module aggregates the fields that matter for
//! display (leak, resolved, assignee) and offers a JSON form.

use crate::models::Trackable;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize, PartialEq, Eq)]
/// Aggregated counts for one file's current trackables.
pub struct FileSummary {
    pub total: usize,
    pub leaks: usize,
    pub resolved: usize,
    pub assigned: usize,
    pub server_linked: usize,
}

/// Aggregate the current set of a file.
pub fn summarize<C>(trackables: &[Trackable<C>]) -> FileSummary {
    FileSummary {
        total: trackables.len(),
        leaks: trackables.iter().filter(|t| t.is_leak()).count(),
        resolved: trackables.iter().filter(|t| t.resolved).count(),
        assigned: trackables.iter().filter(|t| !t.assignee.is_empty()).count(),
        server_linked: trackables
            .iter()
            .filter(|t| t.server_issue_key.is_some())
            .count(),
    }
}

/// JSON rendering of a file's trackables plus their summary.
pub fn compose_file_json<C>(file_id: &str, trackables: &[Trackable<C>]) -> serde_json::Value {
    json!({
        "file": file_id,
        "trackables": serde_json::to_value(trackables).unwrap_or(serde_json::Value::Null),
        "summary": serde_json::to_value(summarize(trackables)).unwrap_or(serde_json::Value::Null),
    })
}
