//! Error types for the todo store client and the synchronization core.
//!
//! # Design
//! `ApiError` describes why a single remote call failed. `NotFound` gets a
//! dedicated variant because callers frequently distinguish "the resource
//! does not exist" from "the server returned an unexpected status."
//!
//! `ErrorKind` is the closed table of user-facing failures; each kind maps
//! to one fixed message. `SyncError` is what the core's operations return.

use std::fmt;

use thiserror::Error;

use crate::types::TodoId;

/// Errors produced by the remote store: transport, status, or codec failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// User-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    LoadFailed,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
    EmptyTitle,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::LoadFailed => "Unable to load todos",
            ErrorKind::CreateFailed => "Unable to add a todo",
            ErrorKind::UpdateFailed => "Unable to update a todo",
            ErrorKind::DeleteFailed => "Unable to delete a todo",
            ErrorKind::EmptyTitle => "Title should not be empty",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Failure of a single core operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The trimmed title was empty; no remote call was made.
    #[error("{}", ErrorKind::EmptyTitle)]
    EmptyTitle,

    /// A creation is still waiting for the server; creations are serialized.
    #[error("a todo is already being created")]
    CreateInFlight,

    /// The id is not in the local list, so there is nothing to edit.
    #[error("no todo with id {0}")]
    UnknownTodo(TodoId),

    /// The remote call failed and the local change was rolled back.
    #[error("{kind}: {source}")]
    Remote {
        kind: ErrorKind,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    pub(crate) fn remote(kind: ErrorKind, source: ApiError) -> Self {
        SyncError::Remote { kind, source }
    }

    /// The user-facing kind, if this failure is one the view should display.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            SyncError::EmptyTitle => Some(ErrorKind::EmptyTitle),
            SyncError::CreateInFlight | SyncError::UnknownTodo(_) => None,
            SyncError::Remote { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_message() {
        let kinds = [
            ErrorKind::LoadFailed,
            ErrorKind::CreateFailed,
            ErrorKind::UpdateFailed,
            ErrorKind::DeleteFailed,
            ErrorKind::EmptyTitle,
        ];
        let mut messages: Vec<_> = kinds.iter().map(|k| k.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn remote_error_reports_kind_and_cause() {
        let err = SyncError::remote(ErrorKind::DeleteFailed, ApiError::NotFound);
        assert_eq!(err.kind(), Some(ErrorKind::DeleteFailed));
        assert_eq!(err.to_string(), "Unable to delete a todo: resource not found");
    }

    #[test]
    fn create_in_flight_is_not_displayed() {
        assert_eq!(SyncError::CreateInFlight.kind(), None);
    }
}
