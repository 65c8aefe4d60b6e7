//! The synchronization core: owns the authoritative list and keeps it in
//! step with the remote store.
//!
//! # Design
//! Every mutating operation runs optimistic-apply, remote call, then
//! reconcile or rollback. Each of those steps is one write under the state
//! lock, and the lock is never held across the remote call, so observers
//! see the optimistic state while the call is in flight but never a
//! half-applied step.
//!
//! Rollback restores only the entry the operation touched, by value, so
//! work that settled in the meantime survives. A creation in
//! flight lives in its own `pending` slot rather than inside the list, so
//! it needs no sentinel id and is dropped or promoted when it settles.

use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{Config, UpdateMode};
use crate::error::{ErrorKind, SyncError};
use crate::filter::Status;
use crate::notice::Notice;
use crate::store::TodoStore;
use crate::types::{NewTodo, Todo, TodoId, UserId};

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) todos: Vec<Todo>,
    pub(crate) pending: Option<NewTodo>,
    pub(crate) status: Status,
    pub(crate) busy: Option<TodoId>,
    /// Operations currently holding the global loading flag.
    pub(crate) in_flight: usize,
    pub(crate) notice: Notice,
}

impl State {
    pub(crate) fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Replace the entry with the same id by value. Unknown ids are ignored.
    pub(crate) fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }

    pub(crate) fn start(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn mark_busy(&mut self, id: TodoId) {
        self.busy = Some(id);
    }

    /// Only the operation that set the marker may clear it.
    fn settle_busy(&mut self, id: TodoId) {
        if self.busy == Some(id) {
            self.busy = None;
        }
    }
}

/// Client-side todo list synchronized with a `TodoStore`.
pub struct TodoSync<S> {
    pub(crate) store: S,
    user_id: UserId,
    error_window: Duration,
    update_mode: UpdateMode,
    pub(crate) state: RwLock<State>,
}

impl<S: TodoStore> TodoSync<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            user_id: config.user_id,
            error_window: config.error_window,
            update_mode: config.update_mode,
            state: RwLock::new(State::default()),
        }
    }

    /// A draft owned by the configured user.
    pub fn draft(&self, title: impl Into<String>) -> NewTodo {
        NewTodo::new(self.user_id, title)
    }

    pub(crate) fn raise(&self, state: &mut State, kind: ErrorKind) {
        state.notice.raise(kind, Instant::now(), self.error_window);
    }

    /// Replace the authoritative list with the store's contents.
    pub async fn load(&self) -> Result<(), SyncError> {
        {
            let mut state = self.state.write().await;
            state.notice.clear();
            state.start();
        }

        let result = self.store.list().await;

        let mut state = self.state.write().await;
        state.finish();
        match result {
            Ok(todos) => {
                debug!(count = todos.len(), "loaded todos");
                state.todos = todos;
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "failed to load todos");
                state.todos.clear();
                self.raise(&mut state, ErrorKind::LoadFailed);
                Err(SyncError::remote(ErrorKind::LoadFailed, source))
            }
        }
    }

    /// Persist a new todo. The trimmed draft is shown as pending until the
    /// server answers, then promoted to the end of the list or dropped.
    ///
    /// Creations are serialized: while one is pending, another returns
    /// `SyncError::CreateInFlight` without touching state.
    pub async fn create(&self, draft: NewTodo) -> Result<Todo, SyncError> {
        let draft = draft.trimmed();
        {
            let mut state = self.state.write().await;
            if state.pending.is_some() {
                return Err(SyncError::CreateInFlight);
            }
            state.notice.clear();
            if draft.title.is_empty() {
                self.raise(&mut state, ErrorKind::EmptyTitle);
                return Err(SyncError::EmptyTitle);
            }
            state.pending = Some(draft.clone());
            state.start();
        }
        debug!(title = %draft.title, "creating todo");

        let result = self.store.create(&draft).await;

        let mut state = self.state.write().await;
        state.pending = None;
        state.finish();
        match result {
            Ok(todo) => {
                debug!(id = %todo.id, "created todo");
                state.todos.push(todo.clone());
                Ok(todo)
            }
            Err(source) => {
                warn!(error = %source, "failed to create todo");
                self.raise(&mut state, ErrorKind::CreateFailed);
                Err(SyncError::remote(ErrorKind::CreateFailed, source))
            }
        }
    }

    /// Save a whole record. On success the server's copy replaces the
    /// entry; on failure the entry is restored to its value at entry.
    pub async fn update(&self, todo: Todo) -> Result<Todo, SyncError> {
        let todo = todo.trimmed();
        let previous = {
            let mut state = self.state.write().await;
            state.notice.clear();
            if todo.title.is_empty() {
                self.raise(&mut state, ErrorKind::EmptyTitle);
                return Err(SyncError::EmptyTitle);
            }
            let previous = state.find(todo.id).cloned();
            if self.update_mode == UpdateMode::Optimistic {
                state.replace(todo.clone());
            }
            state.mark_busy(todo.id);
            state.start();
            previous
        };
        debug!(id = %todo.id, "updating todo");

        let result = self.store.update(&todo).await;

        let mut state = self.state.write().await;
        state.settle_busy(todo.id);
        state.finish();
        match result {
            Ok(saved) => {
                state.replace(saved.clone());
                Ok(saved)
            }
            Err(source) => {
                warn!(id = %todo.id, error = %source, "failed to update todo, rolling back");
                if let Some(previous) = previous {
                    state.replace(previous);
                }
                self.raise(&mut state, ErrorKind::UpdateFailed);
                Err(SyncError::remote(ErrorKind::UpdateFailed, source))
            }
        }
    }

    /// Remove a todo once the store confirms. On failure it stays listed.
    pub async fn delete(&self, id: TodoId) -> Result<(), SyncError> {
        {
            let mut state = self.state.write().await;
            state.notice.clear();
            state.mark_busy(id);
        }
        debug!(%id, "deleting todo");

        let result = self.store.delete(id).await;

        let mut state = self.state.write().await;
        state.settle_busy(id);
        match result {
            Ok(()) => {
                state.todos.retain(|todo| todo.id != id);
                Ok(())
            }
            Err(source) => {
                warn!(%id, error = %source, "failed to delete todo");
                self.raise(&mut state, ErrorKind::DeleteFailed);
                Err(SyncError::remote(ErrorKind::DeleteFailed, source))
            }
        }
    }

    /// Commit an edited title.
    ///
    /// Returns the todo as it stands afterwards, or `None` if an empty title
    /// deleted it. A title equal to the current one makes no remote call.
    pub async fn rename(&self, id: TodoId, title: &str) -> Result<Option<Todo>, SyncError> {
        let current = self.existing(id).await?;
        let title = title.trim();

        if title.is_empty() {
            return self.delete(id).await.map(|()| None);
        }
        if title == current.title {
            return Ok(Some(current));
        }

        let renamed = Todo {
            title: title.to_string(),
            ..current
        };
        self.update(renamed).await.map(Some)
    }

    /// Flip one todo's completion flag.
    pub async fn toggle(&self, id: TodoId) -> Result<Todo, SyncError> {
        let current = self.existing(id).await?;
        let toggled = Todo {
            completed: !current.completed,
            ..current
        };
        self.update(toggled).await
    }

    pub async fn set_status_filter(&self, status: Status) {
        self.state.write().await.status = status;
    }

    /// Close the error message before its window runs out.
    pub async fn dismiss_error(&self) {
        self.state.write().await.notice.clear();
    }

    async fn existing(&self, id: TodoId) -> Result<Todo, SyncError> {
        self.state
            .read()
            .await
            .find(id)
            .cloned()
            .ok_or(SyncError::UnknownTodo(id))
    }
}
