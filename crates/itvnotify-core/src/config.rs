use std::time::Duration;

/// Process configuration, loaded once at startup from environment variables.
///
/// The schedule file (CC/BCC/triggers) is deliberately *not* part of this
/// struct: it is re-read from disk on every scheduling decision so it can be
/// edited without a restart. Everything here is fixed for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Path of the JSON schedule file (`config.json` by convention).
    pub schedule_path: String,
    /// MySQL connection URL for the CRM database.
    pub database_url: String,
    pub smtp: SmtpConfig,
    /// Supervisor-reload marker: only the active worker instance may start
    /// the scheduler loop. Supplied by the environment so the core stays
    /// decoupled from any particular host-reload mechanism.
    pub active_worker: bool,
    /// Enables the in-memory per-day duplicate-suppression ledger.
    pub dedup_per_day: bool,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    /// When set, deliveries are logged and reported as sent without any
    /// network dispatch. Used in tests and air-gapped deployments.
    pub noop: bool,
    pub timeout_seconds: u64,
}

impl SmtpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| {
            let trimmed = v.trim();
            trimmed.eq_ignore_ascii_case("1")
                || trimmed.eq_ignore_ascii_case("true")
                || trimmed.eq_ignore_ascii_case("yes")
        })
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("ITVNOTIFY_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            schedule_path: std::env::var("ITVNOTIFY_SCHEDULE_PATH")
                .unwrap_or_else(|_| "./config.json".to_string()),
            database_url: std::env::var("ITVNOTIFY_DATABASE_URL")
                .map_err(|_| "ITVNOTIFY_DATABASE_URL is required".to_string())?,
            smtp: SmtpConfig {
                host: std::env::var("ITVNOTIFY_SMTP_HOST")
                    .unwrap_or_else(|_| "smtp.office365.com".to_string()),
                port: std::env::var("ITVNOTIFY_SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(587),
                username: std::env::var("ITVNOTIFY_SMTP_USERNAME").ok(),
                password: std::env::var("ITVNOTIFY_SMTP_PASSWORD").ok(),
                from: std::env::var("ITVNOTIFY_SMTP_FROM")
                    .unwrap_or_else(|_| "notificaciones@localhost".to_string()),
                noop: env_flag("ITVNOTIFY_SMTP_NOOP", false),
                timeout_seconds: std::env::var("ITVNOTIFY_SMTP_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
            active_worker: env_flag("ITVNOTIFY_ACTIVE_WORKER", true),
            dedup_per_day: env_flag("ITVNOTIFY_DEDUP_PER_DAY", false),
        })
    }
}
