//! Employee, department and comment models.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::common::{deserialize_lenient_timestamp, deserialize_string_or_int};
use super::NamedEntity;

/// An employee card.
#[derive(Debug, Clone, Deserialize)]
pub struct Employee {
    /// Employee id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Full name.
    #[serde(default)]
    pub name: Option<String>,

    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,

    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,

    /// Middle name.
    #[serde(default)]
    pub middle_name: Option<String>,

    /// Position.
    #[serde(default)]
    pub position: Option<NamedEntity>,

    /// Department.
    #[serde(default)]
    pub department: Option<NamedEntity>,

    /// E-mail address.
    #[serde(default)]
    pub email: Option<String>,

    /// Login name.
    #[serde(default)]
    pub login: Option<String>,

    /// Avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,

    /// Creation time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_created: Option<DateTime<Utc>>,

    /// Dismissal date.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub fire_day: Option<DateTime<Utc>>,

    /// Birthday.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub birthday: Option<DateTime<Utc>>,
}

impl Employee {
    /// Returns the display name, falling back to the login or id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.login.as_deref())
            .unwrap_or(&self.id)
    }

    /// Returns true if the employee has been dismissed.
    pub fn is_fired(&self) -> bool {
        self.fire_day.is_some()
    }
}

/// A department.
#[derive(Debug, Clone, Deserialize)]
pub struct Department {
    /// Department id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Name.
    #[serde(default)]
    pub name: Option<String>,

    /// Head of the department.
    #[serde(default)]
    pub head: Option<NamedEntity>,

    /// Members.
    #[serde(default)]
    pub employees: Vec<NamedEntity>,

    /// Member count.
    #[serde(default)]
    pub employees_count: Option<u64>,
}

/// A comment on a task, project, contractor or deal.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Comment id.
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Text (may contain HTML).
    #[serde(default)]
    pub text: Option<String>,

    /// Minutes of work logged with the comment.
    #[serde(default)]
    pub work: Option<i64>,

    /// Date the work is booked on.
    #[serde(default)]
    pub work_date: Option<String>,

    /// Creation time.
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub time_created: Option<DateTime<Utc>>,

    /// Author.
    #[serde(default)]
    pub author: Option<NamedEntity>,

    /// Whether the current user has not read it yet.
    #[serde(default)]
    pub is_unread: Option<bool>,

    /// Whether the comment is in the user's favorites.
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl Comment {
    /// Returns the comment text or a placeholder.
    pub fn display_text(&self) -> &str {
        self.text.as_deref().unwrap_or("(No content)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_employee_display_name_fallbacks() {
        let employee: Employee =
            serde_json::from_value(json!({"id": 1000001, "login": "ivan"})).unwrap();
        assert_eq!(employee.display_name(), "ivan");
        assert!(!employee.is_fired());

        let employee: Employee = serde_json::from_value(json!({
            "id": "1000002",
            "fire_day": "2019-12-31T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(employee.display_name(), "1000002");
        assert!(employee.is_fired());
    }

    #[test]
    fn test_department_members() {
        let department: Department = serde_json::from_value(json!({
            "id": 3,
            "name": "Sales",
            "employees": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
            "employees_count": 2
        }))
        .unwrap();
        assert_eq!(department.employees.len(), 2);
        assert_eq!(department.employees_count, Some(2));
    }

    #[test]
    fn test_comment_display_text() {
        let comment: Comment = serde_json::from_value(json!({"id": 9})).unwrap();
        assert_eq!(comment.display_text(), "(No content)");
    }
}
