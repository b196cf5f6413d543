//! Task and project models.
//!
//! Field names are the snake_case forms produced by response
//! normalization; timestamps arrive already coerced to RFC 3339.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::common::{deserialize_lenient_timestamp, deserialize_string_or_int};
use super::NamedEntity;

/// A task as returned by the task list and card endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Task id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Title.
    #[serde(default)]
    pub name: Option<String>,

    /// Status (`actual`, `done`, ...).
    #[serde(default)]
    pub status: Option<String>,

    /// Deadline as sent by Megaplan.
    #[serde(default)]
    pub deadline: Option<String>,

    /// Who set the task.
    #[serde(default)]
    pub owner: Option<NamedEntity>,

    /// Who is responsible for it.
    #[serde(default)]
    pub responsible: Option<NamedEntity>,

    /// Priority code.
    #[serde(default)]
    pub severity: Option<String>,

    /// Parent task.
    #[serde(default)]
    pub super_task: Option<NamedEntity>,

    /// Project the task belongs to.
    #[serde(default)]
    pub project: Option<NamedEntity>,

    /// Non-zero when the task is in the user's favorites.
    #[serde(default)]
    pub favorite: Option<i64>,

    /// Creation time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_created: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_updated: Option<DateTime<Utc>>,

    /// Last activity time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub activity: Option<DateTime<Utc>>,

    /// Folders the task shows up in.
    #[serde(default)]
    pub folders: Vec<String>,

    /// Attached tags.
    #[serde(default)]
    pub tags: Vec<NamedEntity>,

    /// Actions available to the current user.
    #[serde(default)]
    pub actions: Vec<String>,

    /// Whether the deadline has passed.
    #[serde(default)]
    pub is_overdue: Option<bool>,

    /// Unread comment count.
    #[serde(default)]
    pub comments_unread: Option<u64>,
}

impl Task {
    /// Returns the title or a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(No name)")
    }
}

/// A project card.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Title.
    #[serde(default)]
    pub name: Option<String>,

    /// Status.
    #[serde(default)]
    pub status: Option<String>,

    /// Owner.
    #[serde(default)]
    pub owner: Option<NamedEntity>,

    /// Manager.
    #[serde(default)]
    pub responsible: Option<NamedEntity>,

    /// Parent project.
    #[serde(default)]
    pub super_project: Option<NamedEntity>,

    /// Creation time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_created: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_updated: Option<DateTime<Utc>>,

    /// Last activity time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub activity: Option<DateTime<Utc>>,

    /// Whether the deadline has passed.
    #[serde(default)]
    pub is_overdue: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_task_from_normalized_payload() {
        let task: Task = serde_json::from_value(json!({
            "id": "5",
            "name": "Buy an elephant",
            "time_created": "2020-01-01T00:00:00Z",
            "time_updated": null,
            "responsible": {"id": 1000002, "name": "Ivan"},
            "folders": ["owner", "responsible"]
        }))
        .unwrap();

        assert_eq!(task.id, "5");
        assert_eq!(task.display_name(), "Buy an elephant");
        assert_eq!(
            task.time_created,
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(task.time_updated, None);
        assert_eq!(
            task.responsible.unwrap().id.as_deref(),
            Some("1000002")
        );
        assert_eq!(task.folders, vec!["owner", "responsible"]);
    }

    #[test]
    fn test_task_list_tolerates_bad_dates() {
        let payload = utils::convert_values_to_natives(utils::convert_keys_to_underscore(json!([
            {"Id": 1},
            {"Id": 2, "Activity": "0000-00-00 00:00:00", "TimeCreated": "2020-01-01T00:00:00"}
        ])));
        let tasks: Vec<Task> = serde_json::from_value(payload).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].id, "2");
        assert_eq!(tasks[1].activity, None);
        assert_eq!(
            tasks[1].time_created,
            Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_project_numeric_id() {
        let project: Project =
            serde_json::from_value(json!({"id": 1000010, "name": "Persia"})).unwrap();
        assert_eq!(project.id, "1000010");
    }
}
