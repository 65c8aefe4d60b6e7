//! Domain DTOs for the todo resource.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Ids are integer newtypes so an owner id can never stand in for a todo id.
//! Integration tests catch any schema drift between the two crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identity of a persisted todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque owner reference. Every request is scoped to one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single persisted todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Copy of this todo with surrounding whitespace removed from the title.
    pub fn trimmed(&self) -> Todo {
        Todo {
            title: self.title.trim().to_string(),
            ..self.clone()
        }
    }
}

/// A todo that has not been persisted yet. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn trimmed(&self) -> NewTodo {
        NewTodo {
            title: self.title.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Partial update body. Only the fields present in the JSON are applied;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl From<&Todo> for TodoPatch {
    fn from(todo: &Todo) -> Self {
        Self {
            title: Some(todo.title.clone()),
            completed: Some(todo.completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_camel_case_owner_field() {
        let todo = Todo {
            id: TodoId(7),
            user_id: UserId(42),
            title: "a".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["userId"], 42);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn new_todo_defaults_completed_to_false() {
        let draft: NewTodo = serde_json::from_str(r#"{"userId":1,"title":"x"}"#).unwrap();
        assert!(!draft.completed);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let patch = TodoPatch {
            title: None,
            completed: Some(true),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }

    #[test]
    fn trimmed_keeps_identity() {
        let todo = Todo {
            id: TodoId(3),
            user_id: UserId(1),
            title: "  walk dog ".to_string(),
            completed: true,
        };
        let trimmed = todo.trimmed();
        assert_eq!(trimmed.title, "walk dog");
        assert_eq!(trimmed.id, todo.id);
        assert!(trimmed.completed);
    }
}
