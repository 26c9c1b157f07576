//! Issue loading and open-issue timelines

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

use super::IssuesError;
use crate::indexer::find_files;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

/// The fields of a GitHub issue the statistics use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present only for pull requests.
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl Issue {
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    #[must_use]
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}

/// Open issue count after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    /// `YYYY-MM-DD HH:MM:SS` in UTC
    pub date: String,
    pub count: i64,
}

/// Load every `*.json` issue in `dir`, leaving out pull requests.
///
/// Unreadable files are logged and skipped.
pub fn load_issues(dir: &Path) -> Result<Vec<Issue>, IssuesError> {
    let files = find_files(dir, &["*.json"])?;

    let mut issues = Vec::new();
    for path in files {
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str::<Issue>(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(issue) if issue.is_pull_request() => {}
            Ok(issue) => issues.push(issue),
            Err(e) => tracing::warn!("Failed to load {}: {e}", path.display()),
        }
    }

    tracing::info!("Loaded {} issues (excluding pull requests)", issues.len());
    Ok(issues)
}

/// All label names, sorted and deduplicated.
#[must_use]
pub fn extract_labels(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .flat_map(|issue| issue.labels.iter().map(|label| label.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Running open issue count, optionally restricted to issues with `label`.
///
/// Each creation counts +1 and each closure -1; events at the same instant
/// keep their input order.
#[must_use]
pub fn timeline(issues: &[Issue], label: Option<&str>) -> Vec<TimelinePoint> {
    let mut events: Vec<(DateTime<Utc>, i64)> = Vec::new();
    for issue in issues.iter().filter(|issue| label.is_none_or(|label| issue.has_label(label))) {
        events.push((issue.created_at, 1));
        if let Some(closed_at) = issue.closed_at {
            events.push((closed_at, -1));
        }
    }
    events.sort_by_key(|(at, _)| *at);

    let mut open = 0;
    events
        .into_iter()
        .map(|(at, delta)| {
            open += delta;
            TimelinePoint { date: at.format("%Y-%m-%d %H:%M:%S").to_string(), count: open }
        })
        .collect()
}
