//! Shared data models: the trackable finding record and its text range.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Epoch milliseconds, the timestamp unit used for leak creation dates.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Precise span of a finding inside a file (1-based lines).
pub struct TextRange {
    pub start_line: u32,
    pub start_offset: u32,
    pub end_line: u32,
    pub end_offset: u32,
}

/// One finding at a point in time, uniquely scoped within a file by its
/// `rule_key`.
///
/// The spatial identity fields (`rule_key`, `line`, the hashes, `message`) are
/// set at creation and never touched by the tracker. Only `creation_date`,
/// `server_issue_key`, `resolved` and `assignee` evolve, and only through
/// [`crate::tracker::Tracker`] reconciliation.
///
/// `C` is an opaque reference back to whatever produced the finding; the
/// tracker carries it along unchanged and never looks at it.
#[derive(Debug, Clone, Serialize)]
pub struct Trackable<C> {
    #[serde(skip)]
    pub client_object: C,
    pub rule_key: String,
    pub severity: String,
    pub kind: String,
    pub message: String,
    pub line: Option<u32>,
    pub line_hash: Option<i64>,
    pub text_range: Option<TextRange>,
    pub text_range_hash: Option<i64>,
    /// `Some` means "detected as newly appeared at this instant" (a leak);
    /// `None` means baseline or carried-over.
    pub creation_date: Option<i64>,
    pub server_issue_key: Option<String>,
    pub resolved: bool,
    pub assignee: String,
}

impl<C> Trackable<C> {
    /// New trackable with the required identity fields; optional fields start
    /// absent and server metadata starts unpopulated.
    pub fn new(client_object: C, rule_key: &str, severity: &str, kind: &str, message: &str) -> Self {
        Trackable {
            client_object,
            rule_key: rule_key.to_string(),
            severity: severity.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
            line: None,
            line_hash: None,
            text_range: None,
            text_range_hash: None,
            creation_date: None,
            server_issue_key: None,
            resolved: false,
            assignee: String::new(),
        }
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_line_hash(mut self, hash: i64) -> Self {
        self.line_hash = Some(hash);
        self
    }

    pub fn with_text_range(mut self, range: TextRange) -> Self {
        self.text_range = Some(range);
        self
    }

    pub fn with_text_range_hash(mut self, hash: i64) -> Self {
        self.text_range_hash = Some(hash);
        self
    }

    pub fn with_creation_date(mut self, epoch_millis: i64) -> Self {
        self.creation_date = Some(epoch_millis);
        self
    }

    pub fn with_server_issue_key(mut self, key: &str) -> Self {
        self.server_issue_key = Some(key.to_string());
        self
    }

    pub fn with_resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    pub fn with_assignee(mut self, assignee: &str) -> Self {
        self.assignee = assignee.to_string();
        self
    }

    /// Whether this trackable was judged newly introduced since the previous
    /// known state.
    pub fn is_leak(&self) -> bool {
        self.creation_date.is_some()
    }
}
