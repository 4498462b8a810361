//! Notes Service — standalone binary for registering users and keeping
//! per-user notes in flat JSON files.
//!
//! Default: http://127.0.0.1:8080/

mod config;
mod error;
mod notes;
mod routes;
mod session;
mod store;
mod users;
mod views;
mod worker;

use config::Config;
use notes::NoteRepository;
use routes::AppState;
use session::SessionStore;
use std::sync::Arc;
use std::time::Instant;
use store::FileStore;
use users::UserRepository;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Using data directory: {}", config.data_dir.display());
    let store = FileStore::new(&config.data_dir);
    if let Err(e) = store.ensure_dir() {
        log::error!("Cannot create data directory: {}", e);
        std::process::exit(1);
    }

    let sessions = Arc::new(SessionStore::new(config.session_ttl()));
    let sweep_interval = std::time::Duration::from_secs(config.session_sweep_secs);
    tokio::spawn(worker::run_session_sweeper(sessions.clone(), sweep_interval));

    let state = Arc::new(AppState {
        users: UserRepository::new(store.clone()),
        notes: NoteRepository::new(store),
        sessions,
        config: config.clone(),
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = config.bind_addr();
    log::info!("Notes Service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
