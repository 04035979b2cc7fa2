//! Conversion of loosely typed completion rows into [`HabitCompletion`]s.
//!
//! Collaborators hand over rows as they come out of the remote store.
//! A row with an unusable timestamp or value is dropped on its own; the
//! rest of the log is still analyzed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HabitCompletion;

/// A completion row as stored by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub habit_id: String,
    /// RFC 3339 timestamp or epoch milliseconds
    pub completed_at: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outcome of an ingest pass.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub completions: Vec<HabitCompletion>,
    pub skipped: usize,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Convert rows, skipping the malformed ones.
///
/// A missing value counts as a single unit (`1.0`).
pub fn ingest_completions(records: &[CompletionRecord]) -> IngestReport {
    let mut report = IngestReport::default();

    for record in records {
        let Some(completed_at) = parse_timestamp(&record.completed_at) else {
            tracing::warn!(
                habit_id = %record.habit_id,
                raw = %record.completed_at,
                "skipping completion with unparsable timestamp"
            );
            report.skipped += 1;
            continue;
        };

        let value = record.value.unwrap_or(1.0);
        if !value.is_finite() {
            tracing::warn!(habit_id = %record.habit_id, "skipping completion with non-finite value");
            report.skipped += 1;
            continue;
        }

        report.completions.push(HabitCompletion {
            habit_id: record.habit_id.clone(),
            completed_at,
            value,
            notes: record.notes.clone(),
        });
    }

    report
}
