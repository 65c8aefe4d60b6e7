//! Client-side todo list kept in sync with a remote store.
//!
//! # Overview
//! `TodoSync` owns the authoritative list, applies mutations optimistically,
//! calls the store, and reconciles or rolls back on the outcome. The view
//! layer reads a filtered `ViewState` and never mutates the list itself.
//!
//! # Design
//! - `TodoClient` is a stateless codec: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse` (host-does-IO pattern).
//! - `HttpStore` pairs the codec with a `Transport`; tests substitute any
//!   `TodoStore` implementation for the network.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod bulk;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod notice;
pub mod store;
pub mod sync;
pub mod types;
pub mod view;

pub use bulk::BatchOutcome;
pub use client::TodoClient;
pub use config::{Config, ConfigError, UpdateMode};
pub use error::{ApiError, ErrorKind, SyncError};
pub use filter::Status;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{HttpStore, TodoStore, Transport, UreqTransport};
pub use sync::TodoSync;
pub use types::{NewTodo, Todo, TodoId, TodoPatch, UserId};
pub use view::{Row, ViewState};
