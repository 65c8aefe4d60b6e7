//! Status filter and the pure projection it selects.

use std::fmt;
use std::str::FromStr;

use crate::types::Todo;

/// Which todos the view shows. Never persisted remotely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    All,
    Active,
    Completed,
}

impl Status {
    pub fn matches(self, completed: bool) -> bool {
        match self {
            Status::All => true,
            Status::Active => !completed,
            Status::Completed => completed,
        }
    }

    /// Resolve a hash-route fragment (`#/`, `#/active`, `#/completed`).
    /// Unknown fragments fall back to `All`.
    pub fn from_fragment(fragment: &str) -> Status {
        match fragment.trim_start_matches('#').trim_start_matches('/') {
            "active" => Status::Active,
            "completed" => Status::Completed,
            _ => Status::All,
        }
    }

    pub fn fragment(self) -> &'static str {
        match self {
            Status::All => "#/",
            Status::Active => "#/active",
            Status::Completed => "#/completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::All => "all",
            Status::Active => "active",
            Status::Completed => "completed",
        })
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Status::All),
            "active" => Ok(Status::Active),
            "completed" => Ok(Status::Completed),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

/// The subset of `todos` admitted by `status`, in the original order.
pub fn apply(todos: &[Todo], status: Status) -> Vec<Todo> {
    todos
        .iter()
        .filter(|todo| status.matches(todo.completed))
        .cloned()
        .collect()
}
