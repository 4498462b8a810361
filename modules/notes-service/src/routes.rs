//! Axum route handlers for the notes web UI.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderName, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use notes_types::*;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::NotesResult;
use crate::notes::NoteRepository;
use crate::session::{self, SessionStore};
use crate::users::UserRepository;
use crate::views;

pub struct AppState {
    pub users: UserRepository,
    pub notes: NoteRepository,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
    pub start_time: Instant,
}

const NO_CACHE: [(HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, max-age=0"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

pub fn router(state: Arc<AppState>) -> axum::Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    axum::Router::new()
        .route("/", axum::routing::get(index))
        .route("/register", axum::routing::get(register_page).post(register))
        .route("/login", axum::routing::get(login_page).post(login))
        .route("/logout", axum::routing::post(logout))
        .route("/notes", axum::routing::get(list_notes).post(add_note))
        .route("/edit", axum::routing::get(edit_page).post(edit_note))
        .route("/delete", axum::routing::get(delete_note).post(delete_note))
        .route("/status", axum::routing::get(status))
        .nest_service("/static", static_files)
        .with_state(state)
}

// GET /
pub async fn index() -> NotesResult<Html<String>> {
    Ok(Html(views::index()?))
}

// GET /register
pub async fn register_page() -> NotesResult<Html<String>> {
    Ok(Html(views::register()?))
}

// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> NotesResult<Redirect> {
    state
        .users
        .register(&form.username, &form.password)
        .inspect_err(|e| log::warn!("Registration of {:?} rejected: {}", form.username, e))?;
    Ok(Redirect::to("/"))
}

// GET /login
pub async fn login_page() -> NotesResult<Html<String>> {
    Ok(Html(views::login()?))
}

// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> NotesResult<Response> {
    let user = state
        .users
        .authenticate(&form.username, &form.password)
        .inspect_err(|_| log::warn!("Failed login for {:?}", form.username))?;

    let session = state.sessions.login(&user.username);
    log::info!("User {} logged in", user.username);

    let cookie = session::session_cookie(&session, state.config.session_ttl());
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/notes")).into_response())
}

// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session::token_from_headers(&headers) {
        if let Some(ended) = state.sessions.logout(&token) {
            log::info!(
                "User {} logged out (session started {})",
                ended.username,
                ended.created_at.to_rfc3339()
            );
        }
    }
    (
        [(header::SET_COOKIE, session::expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

// GET /notes
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> NotesResult<Response> {
    let Some(session) = state.sessions.for_request(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };

    let notes = state.notes.load(&session.username)?;
    let page = views::notes(&session.username, &notes)?;
    Ok((NO_CACHE, Html(page)).into_response())
}

// POST /notes
pub async fn add_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<NoteForm>, FormRejection>,
) -> NotesResult<Response> {
    let Some(session) = state.sessions.for_request(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    state
        .notes
        .add(&session.username, &form.name, &form.content)
        .inspect_err(|e| log::warn!("Note {:?} for {} rejected: {}", form.name, session.username, e))?;
    Ok(Redirect::to("/notes").into_response())
}

// GET /edit?name=
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NoteNameQuery>,
) -> NotesResult<Response> {
    let Some(session) = state.sessions.for_request(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };

    let note = state
        .notes
        .find(&session.username, &query.name)?
        .unwrap_or_default();
    let page = views::edit_note(&note)?;
    Ok((NO_CACHE, Html(page)).into_response())
}

// POST /edit
pub async fn edit_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<EditNoteForm>, FormRejection>,
) -> NotesResult<Response> {
    let Some(session) = state.sessions.for_request(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    state
        .notes
        .edit(&session.username, &form.old_name, &form.name, &form.content)?;
    Ok(Redirect::to("/notes").into_response())
}

// GET|POST /delete?name=
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NoteNameQuery>,
) -> NotesResult<Response> {
    let Some(session) = state.sessions.for_request(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };

    state.notes.delete(&session.username, &query.name)?;
    Ok(Redirect::to("/notes").into_response())
}

// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    let total_users = state.users.count().unwrap_or_else(|e| {
        log::error!("Failed to count users: {}", e);
        0
    });
    state.sessions.purge_expired();
    Json(ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_users,
        active_sessions: state.sessions.len(),
    })
}
