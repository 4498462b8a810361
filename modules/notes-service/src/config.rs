use std::env;
use std::path::PathBuf;

/// Upper bound for `NOTES_SESSION_TTL_HOURS` (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub session_ttl_hours: i64,
    pub session_sweep_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            session_ttl_hours: 24,
            session_sweep_secs: 300,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("NOTES_HOST").unwrap_or(defaults.host),
            port: env::var("NOTES_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: env::var("NOTES_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            static_dir: env::var("NOTES_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            session_ttl_hours: env::var("NOTES_SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h: &i64| *h > 0)
                .map(|h| h.min(MAX_SESSION_TTL_HOURS))
                .unwrap_or(defaults.session_ttl_hours),
            session_sweep_secs: env::var("NOTES_SESSION_SWEEP_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s: &u64| *s > 0)
                .unwrap_or(defaults.session_sweep_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
