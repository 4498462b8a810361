//! Background worker that drops expired login sessions.
//!
//! Sessions are otherwise only removed when their token is presented again,
//! so abandoned logins would accumulate without this sweep.

use crate::session::SessionStore;
use std::sync::Arc;
use std::time::Duration;

pub async fn run_session_sweeper(sessions: Arc<SessionStore>, interval: Duration) {
    log::info!("[SESSIONS] Sweeper started (interval: {}s)", interval.as_secs());

    let mut ticker = tokio::time::interval(interval);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let removed = sessions.purge_expired();
        if removed > 0 {
            log::info!(
                "[SESSIONS] Purged {} expired sessions ({} active)",
                removed,
                sessions.len()
            );
        }
    }
}
