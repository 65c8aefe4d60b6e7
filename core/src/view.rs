//! Read-only observables for the view layer.
//!
//! The pending creation, if any, is merged into the visible rows here and
//! nowhere else; it has no id and is always rendered busy.

use tokio::time::Instant;

use crate::filter::{self, Status};
use crate::store::TodoStore;
use crate::sync::{State, TodoSync};
use crate::types::{NewTodo, Todo, TodoId};

/// One rendered row. `id` is `None` for a creation awaiting the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Option<TodoId>,
    pub title: String,
    pub completed: bool,
    pub busy: bool,
}

/// Everything a view needs to redraw, taken at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub rows: Vec<Row>,
    pub total: usize,
    pub active_count: usize,
    pub completed: Vec<Todo>,
    pub error_message: String,
    pub loading: bool,
    pub busy: Option<TodoId>,
    pub status: Status,
}

impl ViewState {
    fn capture(state: &State, now: Instant) -> Self {
        let mut rows: Vec<Row> = filter::apply(&state.todos, state.status)
            .into_iter()
            .map(|todo| Row {
                busy: state.busy == Some(todo.id),
                id: Some(todo.id),
                title: todo.title,
                completed: todo.completed,
            })
            .collect();
        if let Some(draft) = state.pending.as_ref().filter(|d| state.status.matches(d.completed)) {
            rows.push(Row {
                id: None,
                title: draft.title.clone(),
                completed: draft.completed,
                busy: true,
            });
        }

        Self {
            rows,
            total: state.todos.len(),
            active_count: state.todos.iter().filter(|t| !t.completed).count(),
            completed: filter::apply(&state.todos, Status::Completed),
            error_message: state.notice.message(now).to_string(),
            loading: state.in_flight > 0,
            busy: state.busy,
            status: state.status,
        }
    }

    /// Footer counter text, e.g. "3 items left".
    pub fn items_left(&self) -> String {
        format!("{} items left", self.active_count)
    }
}

impl<S: TodoStore> TodoSync<S> {
    pub async fn snapshot(&self) -> ViewState {
        ViewState::capture(&*self.state.read().await, Instant::now())
    }

    /// The authoritative list, unfiltered.
    pub async fn todos(&self) -> Vec<Todo> {
        self.state.read().await.todos.clone()
    }

    pub async fn visible(&self) -> Vec<Todo> {
        let state = self.state.read().await;
        filter::apply(&state.todos, state.status)
    }

    pub async fn active_count(&self) -> usize {
        self.state.read().await.todos.iter().filter(|t| !t.completed).count()
    }

    pub async fn completed(&self) -> Vec<Todo> {
        filter::apply(&self.state.read().await.todos, Status::Completed)
    }

    /// The current error message, or an empty string.
    pub async fn error_message(&self) -> String {
        self.state.read().await.notice.message(Instant::now()).to_string()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.in_flight > 0
    }

    pub async fn busy(&self) -> Option<TodoId> {
        self.state.read().await.busy
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status
    }

    pub async fn pending(&self) -> Option<NewTodo> {
        self.state.read().await.pending.clone()
    }
}
