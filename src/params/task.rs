//! Task list and task creation parameters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{serialize_flag, to_params, Params};
use crate::dicts::{Folder, SortOrder, TaskStatus};
use crate::error::MegaplanError;
use crate::utils::{self, EntityId};

/// Parameters for listing tasks.
///
/// `TaskListParams::new()` sends only what is set.
/// [`TaskListParams::standard`] starts from the defaults Megaplan's own
/// client uses (actual tasks in the incoming folder).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskListParams {
    /// Status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Folder filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<Folder>,

    /// Only favorite tasks; sent as 1/0.
    #[serde(
        serialize_with = "serialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub favorites_only: Option<bool>,

    /// Text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Return full task cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<bool>,

    /// Only tasks that are still relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_actual: Option<bool>,

    /// Saved filter id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,

    /// Return the count only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,

    /// Tasks of this employee; normalized before sending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EntityId>,

    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,

    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    /// Include the available actions per task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_actions: Option<bool>,

    /// Maximum number of tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Tasks to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl TaskListParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters pre-filled with the standard defaults.
    pub fn standard() -> Self {
        Self {
            status: Some(TaskStatus::Actual),
            folder: Some(Folder::Incoming),
            favorites_only: Some(false),
            detailed: Some(false),
            only_actual: Some(true),
            count: Some(false),
            sort_order: Some(SortOrder::Asc),
            show_actions: Some(false),
            ..Self::default()
        }
    }

    /// Filters by status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters by folder.
    pub fn with_folder(mut self, folder: Folder) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Only favorite tasks.
    pub fn with_favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = Some(favorites_only);
        self
    }

    /// Searches by text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Requests full task cards.
    pub fn with_detailed(mut self, detailed: bool) -> Self {
        self.detailed = Some(detailed);
        self
    }

    /// Restricts to relevant tasks.
    pub fn with_only_actual(mut self, only_actual: bool) -> Self {
        self.only_actual = Some(only_actual);
        self
    }

    /// Uses a saved filter.
    pub fn with_filter(mut self, filter_id: impl Into<String>) -> Self {
        self.filter_id = Some(filter_id.into());
        self
    }

    /// Requests the count only.
    pub fn with_count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    /// Lists the tasks of an employee.
    pub fn with_employee(mut self, employee_id: impl Into<EntityId>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Sorts by a field.
    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    /// Includes the available actions.
    pub fn with_show_actions(mut self, show_actions: bool) -> Self {
        self.show_actions = Some(show_actions);
        self
    }

    /// Sets the maximum number of tasks.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the pagination offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds the wire parameters with the employee id normalized.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Serialization` if serialization fails.
    pub fn to_params(&self) -> Result<Params, MegaplanError> {
        let mut normalized = self.clone();
        normalized.employee_id = utils::normalize_id(self.employee_id);
        to_params(&normalized)
    }
}

/// A task deadline: an exact time, a date, or both, plus an optional
/// deadline type understood by Megaplan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deadline {
    /// Exact deadline.
    pub datetime: Option<DateTime<Utc>>,
    /// Deadline day.
    pub date: Option<NaiveDate>,
    /// Deadline type.
    pub kind: Option<String>,
}

impl Deadline {
    /// A deadline at an exact time.
    pub fn at(datetime: DateTime<Utc>) -> Self {
        Self {
            datetime: Some(datetime),
            ..Self::default()
        }
    }

    /// A deadline on a day.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Sets the deadline type.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Parameters for creating a task.
#[derive(Debug, Clone, Default)]
pub struct TaskCreateParams {
    /// Title (required).
    pub name: String,
    /// Description.
    pub statement: Option<String>,
    /// Responsible employee.
    pub responsible: Option<EntityId>,
    /// Parent task, or a `p`-prefixed project.
    pub super_task: Option<EntityId>,
    /// Deadline.
    pub deadline: Option<Deadline>,
    /// Co-executors.
    pub executors: Vec<EntityId>,
    /// Auditors.
    pub auditors: Vec<EntityId>,
    /// Priority code.
    pub severity: Option<String>,
    /// Customer contractor.
    pub customer: Option<EntityId>,
    /// Group task flag.
    pub is_group: bool,
}

#[derive(Serialize)]
struct TaskModel<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    statement: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    responsible: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    super_task: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    executors: Vec<EntityId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    auditors: Vec<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<EntityId>,
    is_group: u8,
}

impl TaskCreateParams {
    /// Starts a task with a title.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Sets the responsible employee.
    pub fn with_responsible(mut self, id: impl Into<EntityId>) -> Self {
        self.responsible = Some(id.into());
        self
    }

    /// Sets the parent task or project.
    pub fn with_super_task(mut self, id: impl Into<EntityId>) -> Self {
        self.super_task = Some(id.into());
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Adds a co-executor.
    pub fn with_executor(mut self, id: impl Into<EntityId>) -> Self {
        self.executors.push(id.into());
        self
    }

    /// Adds an auditor.
    pub fn with_auditor(mut self, id: impl Into<EntityId>) -> Self {
        self.auditors.push(id.into());
        self
    }

    /// Sets the priority code.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Sets the customer.
    pub fn with_customer(mut self, id: impl Into<EntityId>) -> Self {
        self.customer = Some(id.into());
        self
    }

    /// Marks the task as a group task.
    pub fn with_group(mut self, is_group: bool) -> Self {
        self.is_group = is_group;
        self
    }

    /// Builds the `model` mapping: ids normalized, unset fields dropped,
    /// the group flag as 1/0.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Validation` if the name is empty.
    pub fn to_model(&self) -> Result<Value, MegaplanError> {
        if self.name.trim().is_empty() {
            return Err(MegaplanError::validation("task name is required"));
        }

        let deadline = self.deadline.clone().unwrap_or_default();
        let model = TaskModel {
            name: &self.name,
            statement: self.statement.as_deref(),
            responsible: utils::normalize_id(self.responsible),
            super_task: utils::normalize_id(self.super_task),
            deadline: deadline.datetime,
            deadline_date: deadline.date,
            deadline_type: self
                .deadline
                .as_ref()
                .and_then(|d| d.kind.as_deref()),
            executors: self.executors.iter().map(|id| id.normalize()).collect(),
            auditors: self.auditors.iter().map(|id| id.normalize()).collect(),
            severity: self.severity.as_deref(),
            customer: utils::normalize_id(self.customer),
            is_group: u8::from(self.is_group),
        };

        Ok(Value::Object(to_params(&model)?))
    }
}
