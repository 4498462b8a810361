//! Error kinds surfaced by the store, the repositories and the views, and
//! their mapping onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notes_types::ErrorResponse;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Username already exists")]
    AlreadyExists,

    #[error("Note with this name already exists. Please choose a unique name.")]
    DuplicateName,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("failed to render view")]
    Template(#[from] std::fmt::Error),
}

pub type NotesResult<T> = Result<T, NotesError>;

impl NotesError {
    pub fn status(&self) -> StatusCode {
        match self {
            NotesError::AlreadyExists
            | NotesError::DuplicateName
            | NotesError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            NotesError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            NotesError::Io { .. } | NotesError::Format { .. } | NotesError::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show a client. Storage details stay in the log.
    fn public_message(&self) -> String {
        match self {
            NotesError::Io { .. } | NotesError::Format { .. } => "Error accessing data".to_string(),
            NotesError::Template(_) => "Error rendering page".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}
