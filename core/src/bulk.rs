//! Multi-item operations layered on the synchronization core.
//!
//! # Design
//! Each batch fans out one independent remote call per target and joins on
//! all of them before touching the list, so one failure never aborts the
//! rest. Only confirmed items change; failures are coalesced into a single
//! displayed error per batch.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorKind};
use crate::filter::{self, Status};
use crate::store::TodoStore;
use crate::sync::TodoSync;
use crate::types::{Todo, TodoId};

/// Per-item results of a batch, in target order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub applied: Vec<TodoId>,
    pub failed: Vec<(TodoId, ApiError)>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<TodoId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

impl<S: TodoStore> TodoSync<S> {
    /// Mark every active todo completed, or every todo if none is active.
    pub async fn toggle_all(&self) -> BatchOutcome {
        let targets: Vec<Todo> = {
            let mut state = self.state.write().await;
            state.notice.clear();
            state.start();
            let active = filter::apply(&state.todos, Status::Active);
            let targets = if active.is_empty() { state.todos.clone() } else { active };
            targets
                .into_iter()
                .map(|todo| Todo {
                    completed: true,
                    ..todo
                })
                .collect()
        };
        debug!(count = targets.len(), "toggling all");

        let store = &self.store;
        let results = join_all(targets.iter().map(|todo| store.update(todo))).await;

        let mut state = self.state.write().await;
        state.finish();
        let mut outcome = BatchOutcome::default();
        for (target, result) in targets.iter().zip(results) {
            match result {
                Ok(saved) => {
                    outcome.applied.push(saved.id);
                    state.replace(saved);
                }
                Err(source) => {
                    warn!(id = %target.id, error = %source, "failed to toggle todo");
                    outcome.failed.push((target.id, source));
                }
            }
        }
        if !outcome.is_success() {
            self.raise(&mut state, ErrorKind::UpdateFailed);
        }
        outcome
    }

    /// Delete every todo that is completed when the call starts.
    pub async fn clear_completed(&self) -> BatchOutcome {
        let targets: Vec<TodoId> = {
            let mut state = self.state.write().await;
            state.notice.clear();
            state.start();
            filter::apply(&state.todos, Status::Completed)
                .into_iter()
                .map(|todo| todo.id)
                .collect()
        };
        debug!(count = targets.len(), "clearing completed");

        let store = &self.store;
        let results = join_all(targets.iter().map(|id| store.delete(*id))).await;

        let mut state = self.state.write().await;
        state.finish();
        let mut outcome = BatchOutcome::default();
        for (id, result) in targets.into_iter().zip(results) {
            match result {
                Ok(()) => outcome.applied.push(id),
                Err(source) => {
                    warn!(%id, error = %source, "failed to delete completed todo");
                    outcome.failed.push((id, source));
                }
            }
        }
        state.todos.retain(|todo| !outcome.applied.contains(&todo.id));
        if !outcome.is_success() {
            self.raise(&mut state, ErrorKind::DeleteFailed);
        }
        outcome
    }
}
