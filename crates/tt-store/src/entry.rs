//! Local time entry model.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A local time entry.
///
/// Entries are owned by the surrounding application; the synchronization
/// core reads them and mutates only `worklog_id` and `synced`.
///
/// Invariant: `worklog_id` is `Some` only after a remote worklog was
/// confirmed to exist for this entry. It is cleared whenever the remote
/// worklog is confirmed deleted or found missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, immutable.
    pub id: u64,
    /// Owning local user.
    pub user: String,
    /// Tracker this entry books time against.
    pub tracker: String,
    /// External issue key; empty means "never synchronize".
    #[serde(default)]
    pub ticket: String,
    /// Day the work was performed.
    pub day: NaiveDate,
    /// Start of the work interval.
    pub start: NaiveTime,
    /// End of the work interval.
    pub end: NaiveTime,
    /// Free-text description of the work.
    #[serde(default)]
    pub description: String,
    /// Activity name (e.g. "Development").
    #[serde(default)]
    pub activity: Option<String>,
    /// Remembered id of the remote worklog, if one is known to exist.
    #[serde(default)]
    pub worklog_id: Option<u64>,
    /// True once a create/update round trip against the tracker succeeded.
    #[serde(default, rename = "synced_to_ticketsystem")]
    pub synced: bool,
}

impl Entry {
    /// Derived duration in minutes. Negative when `end` precedes `start`.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Derived duration in seconds, the unit Jira worklogs use.
    #[must_use]
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Whether this entry references an external issue.
    #[must_use]
    pub fn has_ticket(&self) -> bool {
        !self.ticket.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(start: &str, end: &str) -> Entry {
        Entry {
            id: 1,
            user: "jdoe".to_owned(),
            tracker: "jira".to_owned(),
            ticket: "ABC-1".to_owned(),
            day: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            description: "fix bug".to_owned(),
            activity: Some("Dev".to_owned()),
            worklog_id: None,
            synced: false,
        }
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(entry("09:00:00", "10:30:00").duration_minutes(), 90);
    }

    #[test]
    fn test_duration_seconds() {
        assert_eq!(entry("09:00:00", "10:30:00").duration_seconds(), 5400);
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(entry("09:00:00", "09:00:00").duration_minutes(), 0);
    }

    #[test]
    fn test_negative_duration() {
        assert!(entry("10:00:00", "09:00:00").duration_minutes() < 0);
    }

    #[test]
    fn test_has_ticket() {
        assert!(entry("09:00:00", "10:00:00").has_ticket());

        let mut no_ticket = entry("09:00:00", "10:00:00");
        no_ticket.ticket = String::new();
        assert!(!no_ticket.has_ticket());
    }

    #[test]
    fn test_serde_round_trip_field_names() {
        let json = serde_json::to_value(entry("09:00:00", "10:00:00")).unwrap();
        assert_eq!(json["synced_to_ticketsystem"], serde_json::json!(false));
        assert_eq!(json["worklog_id"], serde_json::Value::Null);
    }
}
