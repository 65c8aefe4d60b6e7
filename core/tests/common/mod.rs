//! In-memory `TodoStore` with scripted failures, a call log, and a gate
//! that, once armed with `hold`, parks every call until the test releases it.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use todo_sync::{ApiError, Config, NewTodo, Todo, TodoId, TodoStore, TodoSync, UserId};

pub const OWNER: UserId = UserId(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(String),
    Update(TodoId),
    Delete(TodoId),
}

#[derive(Default)]
pub struct Faults {
    pub list: bool,
    pub create: bool,
    pub update: HashSet<TodoId>,
    pub delete: HashSet<TodoId>,
}

#[derive(Default)]
struct Remote {
    todos: Vec<Todo>,
    next_id: i64,
}

pub struct FakeStore {
    remote: Mutex<Remote>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<Call>>,
    gated: AtomicBool,
    gate: Semaphore,
    entered: Notify,
}

impl FakeStore {
    pub fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let next_id = todos.iter().map(|t| t.id.0).max().unwrap_or(0);
        Arc::new(Self {
            remote: Mutex::new(Remote { todos, next_id }),
            faults: Mutex::new(Faults::default()),
            calls: Mutex::new(Vec::new()),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            entered: Notify::new(),
        })
    }

    /// From now on every call blocks until `release` hands out a permit.
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn fail(&self, configure: impl FnOnce(&mut Faults)) {
        configure(&mut self.faults.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remote_todos(&self) -> Vec<Todo> {
        self.remote.lock().unwrap().todos.clone()
    }

    /// Resolves once a call has reached the store.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    async fn enter(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if self.gated.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.gate.acquire().await.unwrap().forget();
        }
    }

    fn refused() -> ApiError {
        ApiError::Http {
            status: 500,
            body: "scripted failure".to_string(),
        }
    }
}

#[async_trait]
impl TodoStore for FakeStore {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.enter(Call::List).await;
        if self.faults.lock().unwrap().list {
            return Err(Self::refused());
        }
        Ok(self.remote_todos())
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        self.enter(Call::Create(draft.title.clone())).await;
        if self.faults.lock().unwrap().create {
            return Err(Self::refused());
        }
        let mut remote = self.remote.lock().unwrap();
        remote.next_id += 1;
        let todo = Todo {
            id: TodoId(remote.next_id),
            user_id: draft.user_id,
            title: draft.title.clone(),
            completed: draft.completed,
        };
        remote.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        self.enter(Call::Update(todo.id)).await;
        if self.faults.lock().unwrap().update.contains(&todo.id) {
            return Err(Self::refused());
        }
        let mut remote = self.remote.lock().unwrap();
        let slot = remote
            .todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or(ApiError::NotFound)?;
        *slot = todo.clone();
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        self.enter(Call::Delete(id)).await;
        if self.faults.lock().unwrap().delete.contains(&id) {
            return Err(Self::refused());
        }
        self.remote.lock().unwrap().todos.retain(|t| t.id != id);
        Ok(())
    }
}

pub fn todo(id: i64, title: &str, completed: bool) -> Todo {
    Todo {
        id: TodoId(id),
        user_id: OWNER,
        title: title.to_string(),
        completed,
    }
}

pub fn config() -> Config {
    Config::new("http://unused", OWNER)
}

/// A core already loaded with the store's contents.
pub async fn loaded(store: &Arc<FakeStore>) -> TodoSync<Arc<FakeStore>> {
    let sync = TodoSync::new(Arc::clone(store), &config());
    sync.load().await.unwrap();
    sync
}

pub fn ids(todos: &[Todo]) -> Vec<i64> {
    todos.iter().map(|t| t.id.0).collect()
}
