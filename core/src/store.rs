//! Remote store: the four operations the synchronization core depends on.
//!
//! # Design
//! `TodoStore` is the seam between the core and the network. `HttpStore`
//! implements it by pairing the sans-IO `TodoClient` with a `Transport`
//! that executes one request. No retries and no timeouts beyond the
//! transport's own: failures surface to the caller immediately.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};

/// Remote persistence for one owner's todos.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    /// Persist a draft. The returned todo carries the server-assigned id.
    async fn create(&self, draft: &NewTodo) -> Result<Todo, ApiError>;

    async fn update(&self, todo: &Todo) -> Result<Todo, ApiError>;

    async fn delete(&self, id: TodoId) -> Result<(), ApiError>;
}

#[async_trait]
impl<S: TodoStore + ?Sized> TodoStore for Arc<S> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        (**self).list().await
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        (**self).create(draft).await
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        (**self).update(todo).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        (**self).delete(id).await
    }
}

/// Executes a single HTTP round-trip.
///
/// Non-2xx statuses must come back as `Ok(HttpResponse)` so that
/// `TodoClient` stays the only place that interprets status codes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking ureq agent driven from tokio's blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let body = request.body.unwrap_or_default();
    let url = request.url.as_str();
    let headers = request.headers.as_slice();

    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(url), headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url), headers).call(),
        HttpMethod::Post => with_headers(agent.post(url), headers).send(body.as_bytes()),
        HttpMethod::Patch => with_headers(agent.patch(url), headers).send(body.as_bytes()),
    };
    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// Headers come from the codec only; the transport adds none of its own.
fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// `TodoStore` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> HttpStore<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

impl HttpStore<UreqTransport> {
    pub fn over_ureq(client: TodoClient) -> Self {
        Self::new(client, UreqTransport::new())
    }
}

#[async_trait]
impl<T: Transport> TodoStore for HttpStore<T> {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.round_trip(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(draft)?;
        let response = self.round_trip(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(todo.id, &TodoPatch::from(todo))?;
        let response = self.round_trip(request).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        let response = self.round_trip(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::UserId;

    /// Replays canned responses and records every request it sees.
    struct Canned {
        responses: Mutex<Vec<HttpResponse>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn store(responses: Vec<HttpResponse>) -> HttpStore<Canned> {
        HttpStore::new(TodoClient::new("http://api", UserId(3)), Canned::new(responses))
    }

    #[tokio::test]
    async fn update_sends_full_record_as_patch() {
        let store = store(vec![ok(200, r#"{"id":2,"userId":3,"title":"b","completed":true}"#)]);
        let todo = Todo {
            id: TodoId(2),
            user_id: UserId(3),
            title: "b".to_string(),
            completed: true,
        };
        let saved = store.update(&todo).await.unwrap();
        assert_eq!(saved, todo);

        let seen = store.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Patch);
        assert_eq!(seen[0].url, "http://api/todos/2");
        let body: serde_json::Value = serde_json::from_str(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "b", "completed": true}));
    }

    #[tokio::test]
    async fn transport_failure_surfaces_without_retry() {
        let store = store(Vec::new());
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(store.transport.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_status_becomes_http_error() {
        let store = store(vec![ok(503, "busy")]);
        let err = store.delete(TodoId(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
    }
}
