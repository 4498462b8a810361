//! Shared types for the notes service: persisted records, form payloads and
//! JSON response bodies.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A registered account. `password` holds the hex digest, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// A named note owned by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub content: String,
}

impl Note {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

// =====================================================
// Form Payloads
// =====================================================

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `POST /edit`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditNoteForm {
    #[serde(default)]
    pub old_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// `?name=` query on `/edit` and `/delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteNameQuery {
    #[serde(default)]
    pub name: String,
}

// =====================================================
// Responses
// =====================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    pub total_users: usize,
    pub active_sessions: usize,
}
