//! Issue creation and search results.

use serde::Deserialize;

/// Result of an issue create call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    /// Numeric issue id.
    #[serde(deserialize_with = "super::id_from_string_or_number")]
    pub id: u64,
    /// Human-readable issue key (e.g. `ABC-123`).
    pub key: String,
}

/// One issue in a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRef {
    pub key: String,
    /// Requested fields, kept as raw JSON; callers pick what they asked for.
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// Result of a JQL search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub issues: Vec<IssueRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_created_issue() {
        let created: CreatedIssue =
            serde_json::from_str(r#"{"id": "10000", "key": "ABC-24", "self": "..."}"#).unwrap();
        assert_eq!(created.id, 10_000);
        assert_eq!(created.key, "ABC-24");
    }

    #[test]
    fn test_search_result() {
        let result: SearchResult = serde_json::from_str(
            r#"{"startAt": 0, "total": 2, "issues": [
                {"key": "ABC-1", "fields": {"summary": "first"}},
                {"key": "ABC-2"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(result.issues.len(), 2);
        assert_eq!(result.issues[0].key, "ABC-1");
        assert_eq!(result.issues[0].fields["summary"], "first");
        assert!(result.issues[1].fields.is_null());
    }

    #[test]
    fn test_search_result_without_issues() {
        let result: SearchResult = serde_json::from_str("{}").unwrap();
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_strict_decode_rejects_wrong_shape() {
        assert!(serde_json::from_str::<CreatedIssue>(r#"{"key": "ABC-1"}"#).is_err());
    }
}
