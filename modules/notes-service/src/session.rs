//! Server-side login sessions keyed by a random cookie token.

use axum::http::HeaderMap;
use axum::http::header;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::RngCore;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn login(&self, username: &str) -> Session {
        let created_at = Utc::now();
        let session = Session {
            token: Self::generate_token(),
            username: username.to_string(),
            created_at,
            expires_at: created_at
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    pub fn current(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired(Utc::now()) {
            self.sessions.remove(token);
            return None;
        }
        Some(session)
    }

    pub fn logout(&self, token: &str) -> Option<Session> {
        self.sessions.remove(token).map(|(_, s)| s)
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut removed = 0;
        self.sessions.retain(|_, s| {
            let keep = !s.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Resolve the session named by the request's `session` cookie.
    pub fn for_request(&self, headers: &HeaderMap) -> Option<Session> {
        token_from_headers(headers).and_then(|token| self.current(&token))
    }
}

/// Read the `session` cookie value out of every `Cookie` header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(session: &Session, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        ttl.num_seconds()
    )
}

pub fn expired_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_login_current_logout() {
        let store = SessionStore::new(Duration::hours(24));
        let session = store.login("alice");
        assert_eq!(session.token.len(), 64);

        let current = store.current(&session.token).unwrap();
        assert_eq!(current.username, "alice");

        assert!(store.logout(&session.token).is_some());
        assert!(store.current(&session.token).is_none());
        assert!(store.logout(&session.token).is_none());
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new(Duration::hours(24));
        let alice = store.login("alice");
        let bob = store.login("bob");
        assert_ne!(alice.token, bob.token);

        store.logout(&alice.token);
        assert_eq!(store.current(&bob.token).unwrap().username, "bob");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_session_rejected() {
        let store = SessionStore::new(Duration::seconds(-1));
        let session = store.login("alice");
        assert!(store.current(&session.token).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_purge_expired() {
        let store = SessionStore::new(Duration::seconds(-1));
        store.login("alice");
        store.login("bob");
        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_purge_during_concurrent_logins() {
        let store = std::sync::Arc::new(SessionStore::new(Duration::hours(1)));

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..20_000 {
                    store.login("alice");
                }
            })
        };
        let mut purged = 0;
        for _ in 0..20_000 {
            purged += store.purge_expired();
        }
        writer.join().unwrap();

        assert_eq!(purged, 0);
        assert_eq!(store.len(), 20_000);
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let store = SessionStore::new(Duration::hours(10_000_000_000));
        let session = store.login("alice");
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert_eq!(store.current(&session.token).unwrap().username, "alice");
        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn test_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc123"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));

        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("sessionx=abc"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_for_request_resolves_session() {
        let store = SessionStore::new(Duration::hours(1));
        let session = store.login("alice");

        let mut headers = HeaderMap::new();
        let cookie = format!("{}={}", SESSION_COOKIE, session.token);
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        assert_eq!(store.for_request(&headers).unwrap().username, "alice");
    }

    #[test]
    fn test_cookie_strings() {
        let store = SessionStore::new(Duration::hours(24));
        let session = store.login("alice");
        let cookie = session_cookie(&session, Duration::hours(24));
        assert!(cookie.starts_with(&format!("session={};", session.token)));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(expired_session_cookie().contains("Max-Age=0"));
    }
}
