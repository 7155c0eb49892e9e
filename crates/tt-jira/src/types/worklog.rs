//! Worklog request body and creation result.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use tt_store::Entry;

/// Comment fallback when the entry names no activity.
const NO_ACTIVITY: &str = "no activity specified";

/// Comment fallback when the entry carries no description.
const NO_DESCRIPTION: &str = "no description given";

/// Body of a worklog create/update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorklogRequest {
    /// Worklog comment shown in the tracker.
    pub comment: String,
    /// Start timestamp, `YYYY-MM-DDTHH:MM:SS.000±HHMM` in the server's
    /// local offset. Jira rejects any other rendering with a 400.
    pub started: String,
    /// Time spent in seconds.
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: i64,
}

impl WorklogRequest {
    /// Build the worklog body for a local entry.
    #[must_use]
    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            comment: comment_for(entry),
            started: format_started(entry.day, entry.start),
            time_spent_seconds: entry.duration_seconds(),
        }
    }
}

/// Worklog comment: `#{id}: {activity}: {description}`.
fn comment_for(entry: &Entry) -> String {
    let activity = entry
        .activity
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(NO_ACTIVITY);
    let description = if entry.description.is_empty() {
        NO_DESCRIPTION
    } else {
        &entry.description
    };
    format!("#{}: {}: {}", entry.id, activity, description)
}

/// Render the worklog start timestamp in the server's local offset.
fn format_started(day: NaiveDate, start: NaiveTime) -> String {
    let naive = day.and_time(start);
    // DST gap: a wall time that never existed locally falls back to UTC
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive));
    local.format("%Y-%m-%dT%H:%M:%S.000%z").to_string()
}

/// Result of a worklog create call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedWorklog {
    /// External id of the created worklog.
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry() -> Entry {
        Entry {
            id: 5,
            user: "jdoe".to_owned(),
            tracker: "jira".to_owned(),
            ticket: "ABC-1".to_owned(),
            day: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            start: "09:00:00".parse().unwrap(),
            end: "10:30:00".parse().unwrap(),
            description: "fix bug".to_owned(),
            activity: Some("Dev".to_owned()),
            worklog_id: None,
            synced: false,
        }
    }

    #[test]
    fn test_comment_format() {
        let request = WorklogRequest::for_entry(&entry());
        assert_eq!(request.comment, "#5: Dev: fix bug");
    }

    #[test]
    fn test_comment_defaults() {
        let mut bare = entry();
        bare.activity = None;
        bare.description = String::new();
        let request = WorklogRequest::for_entry(&bare);
        assert_eq!(
            request.comment,
            "#5: no activity specified: no description given"
        );
    }

    #[test]
    fn test_empty_activity_uses_default() {
        let mut bare = entry();
        bare.activity = Some(String::new());
        assert!(
            WorklogRequest::for_entry(&bare)
                .comment
                .contains("no activity specified")
        );
    }

    #[test]
    fn test_duration_in_seconds() {
        assert_eq!(WorklogRequest::for_entry(&entry()).time_spent_seconds, 5400);
    }

    #[test]
    fn test_started_format() {
        let started = format_started(
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            "09:00:00".parse().unwrap(),
        );
        assert!(started.starts_with("2024-03-18T09:00:00.000"));
        // Offset suffix is ±HHMM, no colon
        let offset = &started["2024-03-18T09:00:00.000".len()..];
        assert_eq!(offset.len(), 5);
        assert!(offset.starts_with('+') || offset.starts_with('-'));
        assert!(offset[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_body_field_names() {
        let json = serde_json::to_value(WorklogRequest::for_entry(&entry())).unwrap();
        assert_eq!(json["timeSpentSeconds"], serde_json::json!(5400));
        assert!(json.get("comment").is_some());
        assert!(json.get("started").is_some());
    }

    #[test]
    fn test_created_worklog_id_from_string() {
        let created: CreatedWorklog = serde_json::from_str(r#"{"id": "10042"}"#).unwrap();
        assert_eq!(created.id, 10042);
    }

    #[test]
    fn test_created_worklog_id_from_number() {
        let created: CreatedWorklog = serde_json::from_str(r#"{"id": 10042}"#).unwrap();
        assert_eq!(created.id, 10042);
    }

    #[test]
    fn test_created_worklog_bad_id() {
        assert!(serde_json::from_str::<CreatedWorklog>(r#"{"id": "not-a-number"}"#).is_err());
    }
}
