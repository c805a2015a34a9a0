use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Navigation timeout for a single SERP load.
    pub crawl_nav_timeout_secs: u64,
    /// Pause between consecutive crawls in a batch run. This throttle is a
    /// deliberate rate-limit against anti-scraping defenses, not a tunable
    /// performance knob.
    pub crawl_delay_secs: u64,
    /// Number of exposures (non-null ranks) in a session before the
    /// tracking rotates to the next session.
    pub session_rotation_threshold: i64,
    /// Six-field cron expression for the nightly batch run.
    pub batch_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("crawl_nav_timeout_secs", &self.crawl_nav_timeout_secs)
            .field("crawl_delay_secs", &self.crawl_delay_secs)
            .field(
                "session_rotation_threshold",
                &self.session_rotation_threshold,
            )
            .field("batch_cron", &self.batch_cron)
            .finish()
    }
}
