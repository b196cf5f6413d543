//! Static dictionaries of the Megaplan API.
//!
//! URI shortcut prefixes, the enumerated value domains the API accepts
//! (task folders, statuses, action types, subject types, sort orders) and
//! the messages of the symbolic request errors. All tables are immutable
//! process-wide constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MegaplanError;

pub mod lang_ru;

/// Namespace prefixes (`:name`) mapped to the literal API path segment.
pub const NAMESPACE_SHORTCUTS: &[(&str, &str)] = &[
    (":notify", "SdfNotify"),
    (":common", "BumsCommonApiV01"),
    (":task", "BumsTaskApiV01"),
    (":project", "BumsProjectApiV01"),
    (":time", "BumsTimeApiV01"),
    (":trade", "BumsTradeApiV01"),
    (":staff", "BumsStaffApiV01"),
    (":crm", "BumsCrmApiV01"),
];

/// Resource prefixes (`::name`) mapped to a namespace-prefixed path.
pub const RESOURCE_SHORTCUTS: &[(&str, &str)] = &[
    ("::user", ":common/User"),
    ("::auth", ":common/User/authorize.api"),
    ("::system", ":common/System"),
    ("::search", ":common/Search"),
    ("::history", ":common/History"),
    ("::tags", ":common/Tags"),
    ("::task", ":task/Task"),
    ("::comment", ":common/Comment"),
    ("::reaction", ":notify/ReactionApi"),
    ("::project", ":project/Project"),
    ("::todo", ":time/TodoList"),
    ("::event", ":time/Event"),
    ("::employee", ":staff/Employee"),
    ("::department", ":staff/Department"),
    ("::contractor", ":crm/Contractor"),
    ("::deal", ":trade/Deal"),
];

/// Symbolic request error codes and their messages.
pub const REQUEST_ERRORS: &[(&str, &str)] = &[
    (":hangup", "connection closed unexpectedly"),
    (":invalidjson", "received invalid json string"),
    (":network", "request dropped"),
];

/// The URI of the authorization endpoint, the only unsigned call.
pub const AUTH_URI: &str = "::auth";

/// Looks up a shortcut prefix (`:task`, `::task`) in both tables.
pub fn shortcut(prefix: &str) -> Option<&'static str> {
    let table = if prefix.starts_with("::") {
        RESOURCE_SHORTCUTS
    } else {
        NAMESPACE_SHORTCUTS
    };
    table
        .iter()
        .find(|(key, _)| *key == prefix)
        .map(|(_, path)| *path)
}

/// Declares a string-valued enumeration of the API with `as_str`,
/// `Display`, `FromStr` and serde support.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in the order the API documents them.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MegaplanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(MegaplanError::validation(format!(
                        "unknown {}: {:?}",
                        $label, other
                    ))),
                }
            }
        }
    };
}

api_enum! {
    /// Task visibility bucket.
    Folder, "folder" {
        /// Tasks assigned to the current user.
        Incoming => "incoming",
        /// Tasks where the user is responsible.
        Responsible => "responsible",
        /// Tasks where the user is a co-executor.
        Executor => "executor",
        /// Tasks the user created.
        Owner => "owner",
        /// Tasks the user audits.
        Auditor => "auditor",
        /// Every visible task.
        All => "all",
    }
}

api_enum! {
    /// Task status filter.
    TaskStatus, "task status" {
        /// Open tasks.
        Actual => "actual",
        /// Tasks in progress.
        InProcess => "inprocess",
        /// New tasks.
        New => "new",
        /// Overdue tasks.
        Overdue => "overdue",
        /// Conditionally finished tasks.
        Done => "done",
        /// Postponed tasks.
        Delayed => "delayed",
        /// Finished tasks.
        Completed => "completed",
        /// Failed tasks.
        Failed => "failed",
        /// Any status.
        Any => "any",
    }
}

api_enum! {
    /// Action that can be applied to a task or project.
    ActionType, "action type" {
        /// Accept the task.
        AcceptTask => "act_accept_task",
        /// Reject the task.
        RejectTask => "act_reject_task",
        /// Accept the finished work.
        AcceptWork => "act_accept_work",
        /// Reject the finished work.
        RejectWork => "act_reject_work",
        /// Mark as done.
        Done => "act_done",
        /// Pause.
        Pause => "act_pause",
        /// Resume.
        Resume => "act_resume",
        /// Cancel.
        Cancel => "act_cancel",
        /// Mark as expired.
        Expire => "act_expire",
        /// Reopen.
        Renew => "act_renew",
    }
}

api_enum! {
    /// Commentable entity kind.
    SubjectType, "subject type" {
        /// A task.
        Task => "task",
        /// A project.
        Project => "project",
        /// A CRM contractor.
        Contractor => "contractor",
        /// A trade deal.
        Deal => "deal",
    }
}

api_enum! {
    /// Sort direction.
    SortOrder, "sort order" {
        /// Ascending.
        Asc => "asc",
        /// Descending.
        Desc => "desc",
    }
}

impl SubjectType {
    /// Returns true for subjects whose ids use the offset addressing scheme.
    pub fn normalizes_ids(&self) -> bool {
        matches!(self, SubjectType::Task | SubjectType::Project)
    }
}

impl SortOrder {
    /// Parses a sort order leniently: anything but `desc` is ascending.
    pub fn lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_lookup() {
        assert_eq!(shortcut(":task"), Some("BumsTaskApiV01"));
        assert_eq!(shortcut("::task"), Some(":task/Task"));
        assert_eq!(shortcut("::auth"), Some(":common/User/authorize.api"));
        assert_eq!(shortcut(":nothing"), None);
        assert_eq!(shortcut("::nothing"), None);
    }

    #[test]
    fn test_every_resource_shortcut_targets_known_namespace() {
        for (_, path) in RESOURCE_SHORTCUTS {
            let namespace = path.split('/').next().unwrap();
            assert!(
                shortcut(namespace).is_some(),
                "{path} points at an unknown namespace"
            );
        }
    }

    #[test]
    fn test_enum_round_trip_through_str() {
        for folder in Folder::ALL {
            assert_eq!(folder.as_str().parse::<Folder>().unwrap(), *folder);
        }
        assert_eq!("inprocess".parse::<TaskStatus>().unwrap(), TaskStatus::InProcess);
        assert_eq!("act_renew".parse::<ActionType>().unwrap(), ActionType::Renew);
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        let err = "archive".parse::<Folder>().unwrap_err();
        assert!(err.to_string().contains("unknown folder"));
    }

    #[test]
    fn test_enum_serializes_wire_value() {
        let json = serde_json::to_value(TaskStatus::InProcess).unwrap();
        assert_eq!(json, "inprocess");
        let json = serde_json::to_value(ActionType::AcceptWork).unwrap();
        assert_eq!(json, "act_accept_work");
    }

    #[test]
    fn test_sort_order_lenient() {
        assert_eq!(SortOrder::lenient("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::lenient(""), SortOrder::Asc);
        assert_eq!(SortOrder::lenient("whatever"), SortOrder::Asc);
    }

    #[test]
    fn test_subject_id_normalization_rule() {
        assert!(SubjectType::Task.normalizes_ids());
        assert!(SubjectType::Project.normalizes_ids());
        assert!(!SubjectType::Contractor.normalizes_ids());
        assert!(!SubjectType::Deal.normalizes_ids());
    }
}
