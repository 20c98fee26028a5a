use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Tracing filter used when neither `RUST_LOG` nor `JOBALERT_LOG_LEVEL`
    /// is set.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test => "warn",
            Environment::Production => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where posting descriptions are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSourceKind {
    /// Reuse the rendering session that harvested the search page.
    Browser,
    /// Plain HTTP GET of the posting URL.
    Http,
}

impl std::fmt::Display for DetailSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailSourceKind::Browser => write!(f, "browser"),
            DetailSourceKind::Http => write!(f, "http"),
        }
    }
}

/// Sender identity and password for the SMTP relay.
#[derive(Clone)]
pub struct SmtpCredentials {
    pub sender_email: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("sender_email", &self.sender_email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub ledger_path: PathBuf,
    pub skills_path: Option<PathBuf>,
    pub webdriver_url: String,
    pub search_base_url: String,
    pub max_postings: usize,
    pub page_settle_secs: u64,
    pub scroll_pause_secs: u64,
    pub scroll_max_attempts: u32,
    pub detail_settle_secs: u64,
    pub detail_source: DetailSourceKind,
    pub subscriber_delay_secs: u64,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub http_max_retries: u32,
    pub http_retry_backoff_base_secs: u64,
    pub smtp: Option<SmtpCredentials>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub schedule: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("ledger_path", &self.ledger_path)
            .field("skills_path", &self.skills_path)
            .field("webdriver_url", &self.webdriver_url)
            .field("search_base_url", &self.search_base_url)
            .field("max_postings", &self.max_postings)
            .field("page_settle_secs", &self.page_settle_secs)
            .field("scroll_pause_secs", &self.scroll_pause_secs)
            .field("scroll_max_attempts", &self.scroll_max_attempts)
            .field("detail_settle_secs", &self.detail_settle_secs)
            .field("detail_source", &self.detail_source)
            .field("subscriber_delay_secs", &self.subscriber_delay_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("http_max_retries", &self.http_max_retries)
            .field(
                "http_retry_backoff_base_secs",
                &self.http_retry_backoff_base_secs,
            )
            .field("smtp", &self.smtp)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("schedule", &self.schedule)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
